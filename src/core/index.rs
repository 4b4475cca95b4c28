//! Index artifact writers.
//!
//! Both files are pure projections of current record state and are
//! fully overwritten on every run. Each opens with a comment header
//! documenting how to grep it.

use crate::core::collect::{RelationEntry, TagEntry};
use crate::core::error::AgdexError;
use crate::core::record;
use std::fs;
use std::path::Path;

/// Tags index filename inside the agents directory.
pub const TAGS_INDEX: &str = "INDEX-TAGS.md";
/// Relations index filename inside the agents directory.
pub const RELATIONS_INDEX: &str = "INDEX-AGD-RELATIONS.md";

pub fn write_tags_index(agents_dir: &Path, tags: &[TagEntry]) -> Result<(), AgdexError> {
    let mut entries: Vec<&TagEntry> = tags.iter().collect();
    entries.sort_by_key(|entry| record::sort_key(&entry.path));

    let mut content = String::from("# Tags Index\n\n");
    content.push_str("<!-- AUTO-GENERATED - DO NOT EDIT -->\n");
    content.push_str("<!-- Search with: grep \"#tagname\" INDEX-TAGS.md -->\n\n");
    for entry in entries {
        content.push_str(&format!("{}: {}\n", entry.path, entry.tags.join(", ")));
    }

    fs::write(agents_dir.join(TAGS_INDEX), content).map_err(AgdexError::IoError)
}

pub fn write_relations_index(
    agents_dir: &Path,
    relations: &[RelationEntry],
) -> Result<(), AgdexError> {
    let mut entries: Vec<&RelationEntry> = relations.iter().collect();
    entries.sort_by_key(|entry| record::sort_key(&entry.source));

    let mut content = String::from("# AGD Relations Index\n\n");
    content.push_str("<!-- AUTO-GENERATED - DO NOT EDIT -->\n");
    content.push_str("<!-- -(o)-> : obsoletes, -(u)-> : updates -->\n");
    content.push_str("<!-- Search with: grep \"AGD-001\" INDEX-AGD-RELATIONS.md -->\n\n");
    for entry in entries {
        content.push_str(&format!(
            "{} -({})-> {}\n",
            entry.source,
            entry.kind.code(),
            entry.target
        ));
    }

    fs::write(agents_dir.join(RELATIONS_INDEX), content).map_err(AgdexError::IoError)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::collect::RelationKind;
    use tempfile::tempdir;

    #[test]
    fn test_tags_index_header_and_ordering() {
        let tmp = tempdir().unwrap();
        let tags = vec![
            TagEntry {
                path: "decisions/AGD-10_later.md".to_string(),
                tags: vec!["#b".to_string()],
            },
            TagEntry {
                path: "decisions/AGD-2_early.md".to_string(),
                tags: vec!["#a".to_string(), "#c".to_string()],
            },
        ];

        write_tags_index(tmp.path(), &tags).unwrap();
        let content = fs::read_to_string(tmp.path().join(TAGS_INDEX)).unwrap();

        assert!(content.starts_with("# Tags Index\n"));
        assert!(content.contains("<!-- AUTO-GENERATED - DO NOT EDIT -->"));
        assert!(content.contains("<!-- Search with: grep \"#tagname\" INDEX-TAGS.md -->"));
        assert!(content.contains("decisions/AGD-2_early.md: #a, #c\n"));

        // AGD-2 sorts before AGD-10 despite lexicographic order.
        let two = content.find("AGD-2_early").unwrap();
        let ten = content.find("AGD-10_later").unwrap();
        assert!(two < ten);
    }

    #[test]
    fn test_relations_index_format() {
        let tmp = tempdir().unwrap();
        let relations = vec![
            RelationEntry {
                source: "decisions/AGD-3_c.md".to_string(),
                target: "decisions/AGD-1_a.md".to_string(),
                kind: RelationKind::Updates,
            },
            RelationEntry {
                source: "decisions/AGD-2_b.md".to_string(),
                target: "decisions/AGD-1_a.md".to_string(),
                kind: RelationKind::Obsoletes,
            },
        ];

        write_relations_index(tmp.path(), &relations).unwrap();
        let content = fs::read_to_string(tmp.path().join(RELATIONS_INDEX)).unwrap();

        assert!(content.starts_with("# AGD Relations Index\n"));
        assert!(content.contains("<!-- -(o)-> : obsoletes, -(u)-> : updates -->"));
        let lines: Vec<&str> = content
            .lines()
            .filter(|l| l.starts_with("decisions/"))
            .collect();
        assert_eq!(
            lines,
            [
                "decisions/AGD-2_b.md -(o)-> decisions/AGD-1_a.md",
                "decisions/AGD-3_c.md -(u)-> decisions/AGD-1_a.md",
            ]
        );
    }

    #[test]
    fn test_indexes_are_overwritten_not_appended() {
        let tmp = tempdir().unwrap();
        let tags = vec![TagEntry {
            path: "decisions/AGD-1_a.md".to_string(),
            tags: vec!["#x".to_string()],
        }];

        write_tags_index(tmp.path(), &tags).unwrap();
        write_tags_index(tmp.path(), &[]).unwrap();

        let content = fs::read_to_string(tmp.path().join(TAGS_INDEX)).unwrap();
        assert!(!content.contains("AGD-1_a"));
    }
}
