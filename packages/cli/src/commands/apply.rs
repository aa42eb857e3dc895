use crate::commands::{read_request, read_text};
use anyhow::Result;
use changeset_editor::{
    apply_with_report, parse_changes, to_source_changes, BoundaryCondition, Change, ChangeRequest, EditorError, Field,
    Snapshot,
};
use changeset_sourcemap::PositionMapping;
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ApplyArgs {
    /// Content to patch
    pub original: PathBuf,

    /// Change request or change list (JSON)
    pub changes: PathBuf,

    /// Title the title-field changes apply to
    #[arg(long, default_value = "")]
    pub title: String,

    /// Content positions are offsets into the visible text, not the source
    #[arg(long)]
    pub plain_offsets: bool,

    /// Print the patched title and content as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn apply(args: ApplyArgs, _cwd: &str) -> Result<()> {
    let original = Snapshot::new(args.title.clone(), read_text(&args.original)?);
    let request = read_request(&args.changes)?;

    let (patched, boundaries) = patch(&original, &request, args.plain_offsets)?;
    for (field, boundary) in &boundaries {
        eprintln!("{} {}: {}", "⚠️".yellow(), field, boundary);
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&patched)?);
    } else {
        if patched.title != original.title {
            eprintln!("{} {}", "Title:".bright_blue().bold(), patched.title);
        }
        print!("{}", patched.content);
    }

    Ok(())
}

/// Validate and apply a request, field by field
///
/// With `plain_offsets`, content positions address the visible text: they
/// are validated against its length and mapped into the source before
/// applying.
fn patch(
    original: &Snapshot,
    request: &ChangeRequest,
    plain_offsets: bool,
) -> Result<(Snapshot, Vec<(Field, BoundaryCondition)>), EditorError> {
    let mapping = plain_offsets.then(|| PositionMapping::build(&original.content));
    let addressed = match &mapping {
        Some(mapping) => Snapshot::new(original.title.clone(), mapping.plain_text()),
        None => original.clone(),
    };
    let changes = parse_changes(&addressed, &request.changes)?;

    let mut patched = original.clone();
    let mut boundaries = Vec::new();
    for field in Field::ALL {
        let mut field_changes: Vec<Change> = changes.iter().filter(|c| c.field() == field).cloned().collect();
        if field_changes.is_empty() {
            continue;
        }
        if let (Field::Content, Some(mapping)) = (field, &mapping) {
            field_changes = to_source_changes(&field_changes, mapping);
        }

        let applied = apply_with_report(original.get(field), &field_changes);
        boundaries.extend(applied.boundaries.into_iter().map(|boundary| (field, boundary)));
        patched.set(field, applied.text);
    }

    Ok((patched, boundaries))
}

#[cfg(test)]
mod tests {
    use super::*;
    use changeset_editor::ChangeKind;

    fn request(changes: &[Change]) -> ChangeRequest {
        ChangeRequest::from_changes(changes)
    }

    #[test]
    fn test_plain_offsets_map_into_source() {
        let original = Snapshot::new("Notes", "<p>Hello world</p>");
        let changes = [Change::insert(Field::Content, 11, "!"), Change::replace(Field::Title, 0, 5, "Memo")];

        let (patched, boundaries) = patch(&original, &request(&changes), true).unwrap();
        assert_eq!(patched, Snapshot::new("Memo", "<p>Hello world!</p>"));
        assert!(boundaries.is_empty());
    }

    #[test]
    fn test_plain_offsets_are_validated_against_visible_text() {
        let original = Snapshot::new("", "<p>Hello world</p>");
        // Inside the source, but past the 11 visible chars
        let changes = [Change::delete(Field::Content, 14, 2)];

        assert!(patch(&original, &request(&changes), false).is_ok());
        match patch(&original, &request(&changes), true) {
            Err(EditorError::Validation(issues)) => assert_eq!(issues.len(), 1),
            other => panic!("expected a validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_boundaries_are_reported_per_field() {
        let original = Snapshot::new("ab", "text");
        let changes = [Change::insert(Field::Title, 2, "c"), Change::delete(Field::Content, 2, 10)];

        let (patched, boundaries) = patch(&original, &request(&changes), false).unwrap();
        assert_eq!(patched, Snapshot::new("abc", "te"));
        assert_eq!(
            boundaries,
            vec![(
                Field::Content,
                BoundaryCondition::LengthTruncated {
                    index: 0,
                    kind: ChangeKind::Delete,
                    requested: 10,
                    applied: 2,
                }
            )]
        );
    }
}
