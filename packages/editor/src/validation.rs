//! Change list validation
//!
//! Every record is checked against every rule and all violations are
//! reported together. Nothing is mutated; a list with any violation is
//! rejected as a whole by [`parse_changes`].

use crate::change::{Change, ChangeKind, ChangeRecord, Field, Snapshot};
use crate::errors::EditorError;
use changeset_sourcemap::char_len;
use serde::Serialize;
use thiserror::Error;

/// A broken rule on one record
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Violation {
    #[error("position {0} is negative")]
    NegativePosition(i64),

    #[error("{kind} position {position} is beyond the end of the text (length {len})")]
    PositionOutOfBounds {
        kind: ChangeKind,
        position: i64,
        len: usize,
    },

    #[error("{0} requires a length")]
    MissingLength(ChangeKind),

    #[error("length {0} is negative")]
    NegativeLength(i64),

    #[error("{0} requires text")]
    MissingText(ChangeKind),

    #[error("field {0:?} is not one of title, content")]
    InvalidField(String),
}

/// A violation together with the index of the offending record
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("change {index}: {violation}")]
pub struct ValidationIssue {
    pub index: usize,
    pub violation: Violation,
}

/// Check one record; `text_len` enables the bounds rule
pub(crate) fn check_record(record: &ChangeRecord, text_len: Option<usize>) -> Vec<Violation> {
    let mut violations = Vec::new();

    if record.position < 0 {
        violations.push(Violation::NegativePosition(record.position));
    }

    if Field::parse(&record.field).is_none() {
        violations.push(Violation::InvalidField(record.field.clone()));
    }

    let removes = matches!(record.kind, ChangeKind::Delete | ChangeKind::Replace);
    let writes = matches!(record.kind, ChangeKind::Insert | ChangeKind::Replace);

    if removes {
        match record.length {
            None => violations.push(Violation::MissingLength(record.kind)),
            Some(length) if length < 0 => violations.push(Violation::NegativeLength(length)),
            Some(_) => {}
        }
    }

    if writes && record.text.is_none() {
        violations.push(Violation::MissingText(record.kind));
    }

    // Inserts past the end degrade to an append
    if let Some(len) = text_len {
        if removes && record.position > len as i64 {
            violations.push(Violation::PositionOutOfBounds {
                kind: record.kind,
                position: record.position,
                len,
            });
        }
    }

    violations
}

/// Collect every violated rule across `records`
///
/// Each record is bounds-checked against the text of its own field in
/// `original`.
pub fn validate(original: &Snapshot, records: &[ChangeRecord]) -> Vec<ValidationIssue> {
    records
        .iter()
        .enumerate()
        .flat_map(|(index, record)| {
            let text_len = Field::parse(&record.field).map(|field| char_len(original.get(field)));
            check_record(record, text_len)
                .into_iter()
                .map(move |violation| ValidationIssue { index, violation })
        })
        .collect()
}

/// Validate `records` and convert them to typed changes
///
/// Rejects the whole list if any record violates a rule.
pub fn parse_changes(original: &Snapshot, records: &[ChangeRecord]) -> Result<Vec<Change>, EditorError> {
    let issues = validate(original, records);
    if !issues.is_empty() {
        tracing::debug!(count = issues.len(), "rejected change list");
        return Err(EditorError::Validation(issues));
    }

    records
        .iter()
        .cloned()
        .enumerate()
        .map(|(index, record)| {
            Change::try_from(record)
                .map_err(|violation| EditorError::Validation(vec![ValidationIssue { index, violation }]))
        })
        .collect()
}
