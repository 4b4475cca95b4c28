//! Reverse-reference synchronizer.
//!
//! Folds the accumulated `updated_by` / `obsoleted_by` ids back into
//! the records they target. Merging is strictly additive: an id a
//! human wrote by hand is never removed. A record is rewritten only
//! when the merged set actually differs, and the rewrite goes through
//! a same-directory temp file swapped into place so no reader ever
//! observes a partially-written record.

use crate::core::collect::{ReverseRefMap, ReverseRefs, read_record};
use crate::core::error::AgdexError;
use crate::core::frontmatter::{self, Frontmatter, Value};
use crate::core::record;
use rustc_hash::FxHashSet;
use std::fs;
use std::path::Path;

/// Merge accumulated reverse references into each target record.
///
/// Returns the number of records modified; zero is a normal outcome.
/// Unreadable targets are skipped for this run. Serialization and
/// write failures propagate.
pub fn sync_reverse_references(reverse_refs: &ReverseRefMap) -> Result<usize, AgdexError> {
    let mut modified = 0;

    for (target, refs) in reverse_refs {
        if refs.is_empty() {
            continue;
        }
        let Some(content) = read_record(target) else {
            continue;
        };
        let (mut fm, body) = frontmatter::parse(&content);

        if !merge_fields(&mut fm, refs) {
            continue;
        }

        let new_content = frontmatter::serialize(&fm, &body)?;
        write_atomic(target, &new_content)?;
        modified += 1;
    }

    Ok(modified)
}

/// Fold both reverse fields into the mapping. Returns whether anything
/// changed.
fn merge_fields(fm: &mut Frontmatter, refs: &ReverseRefs) -> bool {
    let mut dirty = false;

    for (field, computed) in [
        ("updated_by", &refs.updated_by),
        ("obsoleted_by", &refs.obsoleted_by),
    ] {
        if computed.is_empty() {
            continue;
        }
        let existing = existing_refs(fm, field);
        let merged: FxHashSet<String> = existing.union(computed).cloned().collect();
        if merged != existing {
            fm.set(field, Value::Str(join_sorted(&merged)));
            dirty = true;
        }
    }

    dirty
}

/// Current comma-separated reference list of `field`, as a set.
fn existing_refs(fm: &Frontmatter, field: &str) -> FxHashSet<String> {
    match fm.get(field).and_then(Value::as_str) {
        Some(raw) => raw
            .split(',')
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(str::to_string)
            .collect(),
        None => FxHashSet::default(),
    }
}

/// Comma-join ids in ascending numeric order. Ties (ids without a
/// number) fall back to lexicographic order so output is deterministic.
fn join_sorted(refs: &FxHashSet<String>) -> String {
    let mut ids: Vec<&str> = refs.iter().map(String::as_str).collect();
    ids.sort_by(|a, b| {
        record::sort_key(a)
            .cmp(&record::sort_key(b))
            .then_with(|| a.cmp(b))
    });
    ids.join(", ")
}

/// Write the full new content next to the target, then swap it into
/// place.
fn write_atomic(target: &Path, content: &str) -> Result<(), AgdexError> {
    let parent = target.parent().unwrap_or_else(|| Path::new("."));
    let name = target
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("record.md");
    let tmp = parent.join(format!(".{}.tmp", name));

    fs::write(&tmp, content).map_err(AgdexError::IoError)?;
    fs::rename(&tmp, target).map_err(AgdexError::IoError)
}
