use agdex::core::frontmatter::{self, Value};
use agdex::core::index::{RELATIONS_INDEX, TAGS_INDEX};
use agdex::core::workspace;
use agdex::generate_indexes;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn setup_project(root: &Path) {
    fs::create_dir_all(workspace::decisions_dir(root)).unwrap();
}

fn write_record(root: &Path, name: &str, frontmatter: &str, body: &str) {
    let content = format!("---\n{}\n---\n\n{}\n", frontmatter, body);
    fs::write(workspace::decisions_dir(root).join(name), content).unwrap();
}

fn read_record(root: &Path, name: &str) -> String {
    fs::read_to_string(workspace::decisions_dir(root).join(name)).unwrap()
}

fn read_index(root: &Path, name: &str) -> String {
    fs::read_to_string(workspace::agents_dir(root).join(name)).unwrap()
}

#[test]
fn full_pipeline_generates_indexes_and_syncs_reverse_refs() {
    let tmp = tempdir().unwrap();
    let root = tmp.path();
    setup_project(root);

    write_record(root, "AGD-001_use_sqlite.md", "tags: storage, db", "# Use SQLite");
    write_record(
        root,
        "AGD-002_drop_orm.md",
        "tags: storage\nobsoletes: AGD-001",
        "# Drop the ORM",
    );
    write_record(
        root,
        "AGD-003_add_wal.md",
        "updates: AGD-001, AGD-002",
        "# Enable WAL",
    );

    let report = generate_indexes(root).unwrap();
    assert_eq!(report.tag_entries, 2);
    assert_eq!(report.relation_entries, 3);
    assert_eq!(report.records_modified, 2);

    let tags = read_index(root, TAGS_INDEX);
    assert!(tags.contains("decisions/AGD-001_use_sqlite.md: #storage, #db\n"));
    assert!(tags.contains("decisions/AGD-002_drop_orm.md: #storage\n"));

    let relations = read_index(root, RELATIONS_INDEX);
    assert!(relations.contains(
        "decisions/AGD-002_drop_orm.md -(o)-> decisions/AGD-001_use_sqlite.md\n"
    ));
    assert!(relations.contains(
        "decisions/AGD-003_add_wal.md -(u)-> decisions/AGD-001_use_sqlite.md\n"
    ));
    assert!(relations.contains(
        "decisions/AGD-003_add_wal.md -(u)-> decisions/AGD-002_drop_orm.md\n"
    ));

    let record_one = read_record(root, "AGD-001_use_sqlite.md");
    assert!(record_one.contains("obsoleted_by: AGD-002"));
    assert!(record_one.contains("updated_by: AGD-003"));
    assert!(record_one.contains("# Use SQLite"));

    let record_two = read_record(root, "AGD-002_drop_orm.md");
    assert!(record_two.contains("updated_by: AGD-003"));
}

#[test]
fn second_run_is_idempotent() {
    let tmp = tempdir().unwrap();
    let root = tmp.path();
    setup_project(root);

    write_record(root, "AGD-001_a.md", "status: accepted", "# A");
    write_record(root, "AGD-002_b.md", "obsoletes: AGD-001", "# B");

    let first = generate_indexes(root).unwrap();
    assert_eq!(first.records_modified, 1);
    let snapshot = read_record(root, "AGD-001_a.md");

    let second = generate_indexes(root).unwrap();
    assert_eq!(second.records_modified, 0);
    assert_eq!(read_record(root, "AGD-001_a.md"), snapshot);
}

#[test]
fn manual_reverse_refs_are_merged_not_replaced() {
    let tmp = tempdir().unwrap();
    let root = tmp.path();
    setup_project(root);

    write_record(root, "AGD-001_a.md", "updated_by: AGD-5", "# A");
    write_record(root, "AGD-005_e.md", "status: accepted", "# E");
    write_record(root, "AGD-007_g.md", "updates: AGD-001", "# G");

    let report = generate_indexes(root).unwrap();
    assert_eq!(report.records_modified, 1);

    let content = read_record(root, "AGD-001_a.md");
    assert!(content.contains("updated_by: AGD-5, AGD-007"));
}

#[test]
fn dangling_references_do_not_abort_the_run() {
    let tmp = tempdir().unwrap();
    let root = tmp.path();
    setup_project(root);

    write_record(root, "AGD-001_a.md", "obsoletes: AGD-999", "# A");
    write_record(root, "AGD-002_b.md", "tags: kept", "# B");

    let report = generate_indexes(root).unwrap();
    assert_eq!(report.relation_entries, 0);
    assert_eq!(report.records_modified, 0);
    assert_eq!(report.tag_entries, 1);

    let relations = read_index(root, RELATIONS_INDEX);
    assert!(!relations.contains("AGD-999"));
}

#[test]
fn indexes_order_records_numerically() {
    let tmp = tempdir().unwrap();
    let root = tmp.path();
    setup_project(root);

    for n in 1..=10 {
        write_record(
            root,
            &format!("AGD-{}_r.md", n),
            &format!("tags: t{}", n),
            "# R",
        );
    }

    generate_indexes(root).unwrap();
    let tags = read_index(root, TAGS_INDEX);

    let two = tags.find("decisions/AGD-2_r.md").unwrap();
    let ten = tags.find("decisions/AGD-10_r.md").unwrap();
    assert!(two < ten, "AGD-2 should list before AGD-10");
}

#[test]
fn missing_decisions_dir_yields_empty_report() {
    let tmp = tempdir().unwrap();

    let report = generate_indexes(tmp.path()).unwrap();
    assert_eq!(report.tag_entries, 0);
    assert_eq!(report.relation_entries, 0);
    assert_eq!(report.records_modified, 0);
    assert!(!workspace::agents_dir(tmp.path()).join(TAGS_INDEX).exists());
}

#[test]
fn indexes_are_fully_regenerated_each_run() {
    let tmp = tempdir().unwrap();
    let root = tmp.path();
    setup_project(root);

    write_record(root, "AGD-001_a.md", "tags: old", "# A");
    generate_indexes(root).unwrap();
    assert!(read_index(root, TAGS_INDEX).contains("#old"));

    fs::remove_file(workspace::decisions_dir(root).join("AGD-001_a.md")).unwrap();
    write_record(root, "AGD-002_b.md", "tags: new", "# B");
    generate_indexes(root).unwrap();

    let tags = read_index(root, TAGS_INDEX);
    assert!(!tags.contains("#old"));
    assert!(tags.contains("#new"));
}

#[test]
fn synced_record_round_trips_through_the_codec() {
    let tmp = tempdir().unwrap();
    let root = tmp.path();
    setup_project(root);

    write_record(
        root,
        "AGD-001_a.md",
        "title: \"Storage: the plan\"\ntags: storage\nrevision: 2",
        "# A",
    );
    write_record(root, "AGD-002_b.md", "obsoletes: AGD-001", "# B");

    generate_indexes(root).unwrap();

    let content = read_record(root, "AGD-001_a.md");
    let (fm, body) = frontmatter::parse(&content);
    assert_eq!(fm.get("title"), Some(&Value::Str("Storage: the plan".into())));
    assert_eq!(fm.get("revision"), Some(&Value::Int(2)));
    assert_eq!(fm.get("obsoleted_by"), Some(&Value::Str("AGD-002".into())));
    assert!(body.contains("# A"));
}
