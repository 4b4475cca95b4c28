//! Relation collector: one pass over the decisions directory.
//!
//! Derives three things from record frontmatter, all recomputed fresh
//! each run: the tag table, the relation table, and the
//! reverse-reference accumulator consumed by the synchronizer.

use crate::core::error::AgdexError;
use crate::core::frontmatter::{self, Value};
use crate::core::record;
use crate::core::workspace::DECISIONS_DIR;
use rustc_hash::FxHashSet;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Direction of a record-to-record edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationKind {
    Obsoletes,
    Updates,
}

impl RelationKind {
    /// Single-letter code used in the relations index.
    pub fn code(self) -> char {
        match self {
            RelationKind::Obsoletes => 'o',
            RelationKind::Updates => 'u',
        }
    }

    /// Forward frontmatter field carrying this relation.
    pub fn field(self) -> &'static str {
        match self {
            RelationKind::Obsoletes => "obsoletes",
            RelationKind::Updates => "updates",
        }
    }
}

/// One `path: #tags` line of the tags index.
#[derive(Debug, Clone)]
pub struct TagEntry {
    pub path: String,
    pub tags: Vec<String>,
}

/// One directed edge of the relations index.
#[derive(Debug, Clone)]
pub struct RelationEntry {
    pub source: String,
    pub target: String,
    pub kind: RelationKind,
}

/// Reverse references accumulated for one target record.
#[derive(Debug, Clone, Default)]
pub struct ReverseRefs {
    pub updated_by: FxHashSet<String>,
    pub obsoleted_by: FxHashSet<String>,
}

impl ReverseRefs {
    pub fn is_empty(&self) -> bool {
        self.updated_by.is_empty() && self.obsoleted_by.is_empty()
    }
}

/// Accumulator keyed by target file, ordered for deterministic sync.
pub type ReverseRefMap = BTreeMap<PathBuf, ReverseRefs>;

/// Everything one scan derives from the decisions directory.
#[derive(Debug, Default)]
pub struct CollectedRelations {
    pub tags: Vec<TagEntry>,
    pub relations: Vec<RelationEntry>,
    pub reverse_refs: ReverseRefMap,
}

/// Read a record, treating any I/O failure as "absent for this run".
///
/// The index is best-effort over whatever records are currently
/// readable, so callers skip on `None` instead of aborting.
pub fn read_record(path: &Path) -> Option<String> {
    fs::read_to_string(path).ok()
}

/// Split a comma-separated field value: trim segments, drop empties.
fn split_list(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',').map(str::trim).filter(|s| !s.is_empty())
}

/// Scan every `AGD-*.md` under `decisions_dir`, ascending by record id.
pub fn collect_records(decisions_dir: &Path) -> Result<CollectedRelations, AgdexError> {
    let mut files: Vec<(u64, String, PathBuf)> = Vec::new();
    for entry in fs::read_dir(decisions_dir).map_err(AgdexError::IoError)? {
        let entry = entry.map_err(AgdexError::IoError)?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        if record::is_record_file(name) {
            files.push((record::sort_key(name), name.to_string(), entry.path()));
        }
    }
    files.sort_by_key(|(key, _, _)| *key);

    let mut collected = CollectedRelations::default();

    for (_, name, path) in files {
        let Some(content) = read_record(&path) else {
            continue;
        };
        let (fm, _) = frontmatter::parse(&content);
        let relative_path = format!("{}/{}", DECISIONS_DIR, name);

        if let Some(Value::Str(raw)) = fm.get("tags") {
            let tags: Vec<String> = split_list(raw).map(|t| format!("#{}", t)).collect();
            if !tags.is_empty() {
                collected.tags.push(TagEntry {
                    path: relative_path.clone(),
                    tags,
                });
            }
        }

        for kind in [RelationKind::Obsoletes, RelationKind::Updates] {
            let Some(Value::Str(raw)) = fm.get(kind.field()) else {
                continue;
            };
            for reference in split_list(raw) {
                let Some(target) = record::find_record(decisions_dir, reference) else {
                    continue;
                };
                let target_name = target
                    .file_name()
                    .and_then(|n| n.to_str())
                    .unwrap_or_default()
                    .to_string();
                collected.relations.push(RelationEntry {
                    source: relative_path.clone(),
                    target: format!("{}/{}", DECISIONS_DIR, target_name),
                    kind,
                });

                if let Some(source_id) = record::record_id(&name) {
                    let refs = collected.reverse_refs.entry(target).or_default();
                    let set = match kind {
                        RelationKind::Obsoletes => &mut refs.obsoleted_by,
                        RelationKind::Updates => &mut refs.updated_by,
                    };
                    set.insert(source_id.to_string());
                }
            }
        }
    }

    Ok(collected)
}
