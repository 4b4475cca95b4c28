//! Agdex: a daemonless indexer for agent decision records.
//!
//! Agdex keeps a project's AGD knowledge base navigable. One run scans
//! `.agents/decisions/`, regenerates two grep-friendly index
//! artifacts, and folds freshly discovered reverse references
//! (`obsoleted_by`, `updated_by`) back into the records they point at.
//!
//! # Pipeline
//!
//! 1. **Collect**: parse every record's frontmatter into a tag table,
//!    a relation table, and a reverse-reference accumulator.
//! 2. **Write**: regenerate `INDEX-TAGS.md` and
//!    `INDEX-AGD-RELATIONS.md`, fully overwriting both.
//! 3. **Sync**: merge accumulated reverse references into target
//!    records, additively, with temp-file-then-rename persistence.
//!
//! Records stay human-authoritative: the sync step only ever adds ids
//! to the two reverse fields and never removes one. Unreadable records
//! and unresolvable references are skipped for the run — the indexes
//! are best-effort projections over whatever is currently readable.
//!
//! # Examples
//!
//! ```bash
//! # Index the current project
//! agdex index
//!
//! # Index a specific project root, machine-readable report
//! agdex index /path/to/project --format json
//! ```
//!
//! # Crate structure
//!
//! - [`core::frontmatter`]: restricted YAML frontmatter codec
//! - [`core::record`]: record ids, numeric ordering, file lookup
//! - [`core::collect`]: single-pass relation collector
//! - [`core::index`]: index artifact writers
//! - [`core::sync`]: reverse-reference synchronizer
//! - [`core::workspace`]: directory layout and root resolution

pub mod cli;
pub mod core;

use crate::cli::{Cli, Command};
use crate::core::error::AgdexError;
use crate::core::{collect, index, sync, workspace};

use clap::Parser;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Summary of one indexing run.
#[derive(Debug, Serialize)]
pub struct IndexReport {
    pub tag_entries: usize,
    pub relation_entries: usize,
    pub records_modified: usize,
}

/// Run the full collect → write → sync pipeline for one project root.
///
/// A project without a decisions directory yields an empty report, not
/// an error.
pub fn generate_indexes(project_root: &Path) -> Result<IndexReport, AgdexError> {
    let agents_dir = workspace::agents_dir(project_root);
    let decisions_dir = workspace::decisions_dir(project_root);

    if !decisions_dir.exists() {
        return Ok(IndexReport {
            tag_entries: 0,
            relation_entries: 0,
            records_modified: 0,
        });
    }

    let collected = collect::collect_records(&decisions_dir)?;
    index::write_tags_index(&agents_dir, &collected.tags)?;
    index::write_relations_index(&agents_dir, &collected.relations)?;
    let records_modified = sync::sync_reverse_references(&collected.reverse_refs)?;

    Ok(IndexReport {
        tag_entries: collected.tags.len(),
        relation_entries: collected.relations.len(),
        records_modified,
    })
}

pub fn run() -> Result<(), AgdexError> {
    let cli = Cli::parse();

    match cli.command {
        Command::Version => {
            println!("v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Command::Index(args) => {
            let cwd = std::env::current_dir().map_err(AgdexError::IoError)?;
            let env_root = std::env::var_os(workspace::PROJECT_DIR_ENV).map(PathBuf::from);
            let project_root = workspace::resolve_project_root(args.dir, env_root, cwd);

            let report = generate_indexes(&project_root)?;

            if args.format == "json" {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&report)
                        .map_err(|e| AgdexError::SerializeError(e.to_string()))?
                );
            } else if report.records_modified > 0 {
                use colored::Colorize;
                println!(
                    "{} Updated {} AGD file(s) with reverse references",
                    "✓".bright_green(),
                    report.records_modified
                );
            }
            Ok(())
        }
    }
}
