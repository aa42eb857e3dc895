use changeset_diff::DiffOptions;
use changeset_editor::{
    apply, apply_snapshot, apply_with_report, diff_changes, optimize, optimize_with_report, parse_changes,
    to_source_changes, BoundaryCondition, Change, ChangeRequest, EditorError, Field, Snapshot,
};
use changeset_sourcemap::PositionMapping;

#[test]
fn inserted_word_is_one_insert() {
    let changes = diff_changes("Hello world", "Hello there world", Field::Content, &DiffOptions::default());

    assert_eq!(changes, vec![Change::insert(Field::Content, 5, " there")]);
    assert_eq!(apply("Hello world", &changes), "Hello there world");
}

#[test]
fn plain_offset_lands_inside_markup() {
    let content = "<p>Hello world</p>";
    let mapping = PositionMapping::build(content);
    assert_eq!(mapping.plain_text(), "Hello world");
    assert_eq!(mapping.plain_to_source(5), 8);

    let changes = to_source_changes(&[Change::insert(Field::Content, 5, " there")], &mapping);
    assert_eq!(apply(content, &changes), "<p>Hello there world</p>");
}

#[test]
fn far_insert_appends() {
    let content = "a twenty char string";
    assert_eq!(content.chars().count(), 20);

    let applied = apply_with_report(content, &[Change::insert(Field::Content, 1000, "!")]);
    assert_eq!(applied.text, "a twenty char string!");
    assert!(matches!(
        applied.boundaries[..],
        [BoundaryCondition::Appended { applied: 20, .. }]
    ));
}

#[test]
fn delete_then_insert_becomes_replace() {
    let changes = vec![
        Change::delete(Field::Content, 0, 5),
        Change::insert(Field::Content, 0, "X"),
    ];

    let (optimized, report) = optimize_with_report(&changes);
    assert_eq!(optimized, vec![Change::replace(Field::Content, 0, 5, "X")]);
    assert_eq!((report.raw, report.optimized), (2, 1));
    assert_eq!(apply("Hello world", &optimized), apply("Hello world", &changes));
}

#[test]
fn request_body_round_trip() {
    let original = Snapshot::new("Weekly notes", "<p>Hello world</p>");
    let body = r#"{
        "changes": [
            {"type": "replace", "position": 0, "length": 6, "text": "Daily", "field": "title"},
            {"type": "insert", "position": 8, "text": " there", "field": "content"}
        ],
        "metadata": {"description": "2 edits", "timestamp": "2026-01-05T10:00:00Z"}
    }"#;

    let request: ChangeRequest = serde_json::from_str(body).unwrap();
    let changes = parse_changes(&original, &request.changes).unwrap();
    let patched = apply_snapshot(&original, &changes);

    assert_eq!(patched, Snapshot::new("Daily notes", "<p>Hello there world</p>"));
}

#[test]
fn malformed_request_is_rejected_whole() {
    let original = Snapshot::new("Title", "Body");
    let body = r#"{
        "changes": [
            {"type": "insert", "position": 0, "text": "fine", "field": "content"},
            {"type": "delete", "position": -2, "field": "summary"},
            {"type": "replace", "position": 99, "length": 1, "field": "title"}
        ]
    }"#;

    let request: ChangeRequest = serde_json::from_str(body).unwrap();
    let Err(EditorError::Validation(issues)) = parse_changes(&original, &request.changes) else {
        panic!("expected a validation error");
    };

    // negative position, missing length, bad field, missing text, out of bounds
    assert_eq!(issues.len(), 5);
    assert!(issues.iter().all(|issue| issue.index > 0));
}

#[test]
fn diff_then_optimize_for_a_whole_snapshot() {
    let old = Snapshot::new("Draft", "the quick brown fox");
    let new = Snapshot::new("Final draft", "the slow brown fox jumps");

    let mut changes = Vec::new();
    for field in Field::ALL {
        changes.extend(diff_changes(old.get(field), new.get(field), field, &DiffOptions::default()));
    }

    let optimized = optimize(&changes);
    assert!(optimized.len() <= changes.len());
    assert_eq!(apply_snapshot(&old, &optimized), new);
}
