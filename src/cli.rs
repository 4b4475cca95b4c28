//! CLI struct definitions for the agdex command-line interface.
//!
//! All clap-derived types live here. Dispatch logic lives in `lib.rs`.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(
    name = "agdex",
    version = env!("CARGO_PKG_VERSION"),
    about = "Agdex is the daemonless, local-first indexer that keeps agent decision records (AGDs) greppable and their cross-references bidirectional. 🦀",
    disable_version_flag = true
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(clap::Args, Debug)]
pub struct IndexCli {
    /// Project root holding `.agents/decisions/` (defaults to
    /// $AGDEX_PROJECT_DIR, then the current working directory).
    pub dir: Option<PathBuf>,
    /// Output format: 'text' or 'json'.
    #[clap(long, default_value = "text")]
    pub format: String,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Regenerate both indexes and sync reverse references
    #[clap(name = "index", visible_alias = "i")]
    Index(IndexCli),

    /// Show version information
    #[clap(name = "version")]
    Version,
}
