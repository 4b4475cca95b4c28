//! Workspace layout and project-root resolution.

use std::path::{Path, PathBuf};

/// Directory holding agent metadata and the generated indexes.
pub const AGENTS_DIR: &str = ".agents";
/// Subdirectory of [`AGENTS_DIR`] holding decision records.
pub const DECISIONS_DIR: &str = "decisions";
/// Environment variable consulted when no project root is given.
pub const PROJECT_DIR_ENV: &str = "AGDEX_PROJECT_DIR";

pub fn agents_dir(project_root: &Path) -> PathBuf {
    project_root.join(AGENTS_DIR)
}

pub fn decisions_dir(project_root: &Path) -> PathBuf {
    agents_dir(project_root).join(DECISIONS_DIR)
}

/// Resolve the project root: explicit argument, then environment
/// override, then the current working directory.
///
/// Pure over its inputs; the caller passes the environment snapshot so
/// the policy stays testable without touching process state.
pub fn resolve_project_root(
    arg: Option<PathBuf>,
    env_root: Option<PathBuf>,
    cwd: PathBuf,
) -> PathBuf {
    arg.or(env_root).unwrap_or(cwd)
}
