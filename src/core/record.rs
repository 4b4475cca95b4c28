//! AGD record identity: id extraction, numeric ordering, file lookup.

use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

fn id_at_start() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^AGD-\d+").unwrap())
}

fn id_anywhere() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"AGD-(\d+)").unwrap())
}

/// Extract the record id from a filename or reference (`AGD-001` from
/// `AGD-001_use_sqlite.md`). The id must sit at the start.
pub fn record_id(name: &str) -> Option<&str> {
    id_at_start().find(name).map(|m| m.as_str())
}

/// Numeric ordering key for record paths and references.
///
/// Text without an id sorts first (key 0), so non-conforming names
/// lead any listing.
pub fn sort_key(text: &str) -> u64 {
    id_anywhere()
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<u64>().ok())
        .unwrap_or(0)
}

/// Whether a filename looks like a decision record (`AGD-*.md`).
pub fn is_record_file(name: &str) -> bool {
    name.starts_with("AGD-") && name.ends_with(".md")
}

/// Locate a record file by reference.
///
/// Returns the first `<id>_*.md` match in filesystem enumeration
/// order; when several files share an id prefix the winner is
/// enumeration-order-dependent. References without an id, and
/// unreadable directories, resolve to `None`.
pub fn find_record(decisions_dir: &Path, reference: &str) -> Option<PathBuf> {
    let id = record_id(reference)?;
    let prefix = format!("{}_", id);

    for entry in fs::read_dir(decisions_dir).ok()?.flatten() {
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        if name.starts_with(&prefix) && name.ends_with(".md") {
            return Some(entry.path());
        }
    }
    None
}
