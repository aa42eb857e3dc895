//! # Patch Applier
//!
//! Replays a change list against a string. Every position is expressed in
//! the coordinates of the original text, so changes are replayed in
//! ascending position order (ties keep their input order) while a running
//! delta tracks how far the text has already shifted.
//!
//! ## Clamping
//!
//! Applying never fails. Offsets are clamped into the current text:
//!
//! - an insert past the end appends
//! - a delete or replace past the end is truncated to what remains
//! - an operation anchored inside a span an earlier operation already
//!   removed lands at the start of that span, and only removes what has
//!   not been removed yet
//!
//! Each clamp is reported as a [`BoundaryCondition`] by
//! [`apply_with_report`].

use crate::change::{Change, ChangeKind, Field, Snapshot};
use changeset_sourcemap::PositionMapping;
use serde::Serialize;
use std::fmt;

/// A clamp the applier had to make
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "condition", rename_all = "camelCase")]
pub enum BoundaryCondition {
    /// Insert past the end, appended instead
    #[serde(rename_all = "camelCase")]
    Appended {
        index: usize,
        requested: usize,
        applied: usize,
    },
    /// Delete or replace starting past the end
    #[serde(rename_all = "camelCase")]
    StartClamped {
        index: usize,
        kind: ChangeKind,
        requested: usize,
        applied: usize,
    },
    /// Delete or replace reaching past the end, or into removed text
    #[serde(rename_all = "camelCase")]
    LengthTruncated {
        index: usize,
        kind: ChangeKind,
        requested: usize,
        applied: usize,
    },
}

impl fmt::Display for BoundaryCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryCondition::Appended {
                index,
                requested,
                applied,
            } => write!(f, "change {}: insert at {} appended at {}", index, requested, applied),
            BoundaryCondition::StartClamped {
                index,
                kind,
                requested,
                applied,
            } => write!(f, "change {}: {} at {} clamped to {}", index, kind, requested, applied),
            BoundaryCondition::LengthTruncated {
                index,
                kind,
                requested,
                applied,
            } => write!(
                f,
                "change {}: {} of {} chars truncated to {}",
                index, kind, requested, applied
            ),
        }
    }
}

/// Patched text plus the clamps made along the way
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Applied {
    pub text: String,
    pub boundaries: Vec<BoundaryCondition>,
}

/// Apply `changes` to `original`
///
/// The field of each change is ignored; use [`apply_snapshot`] for a mixed
/// list.
pub fn apply(original: &str, changes: &[Change]) -> String {
    apply_with_report(original, changes).text
}

/// Apply `changes` to `original`, reporting every clamp
pub fn apply_with_report(original: &str, changes: &[Change]) -> Applied {
    let mut text: Vec<char> = original.chars().collect();
    let mut boundaries = Vec::new();

    let mut order: Vec<usize> = (0..changes.len()).collect();
    order.sort_by_key(|&i| changes[i].position());

    // Shift between original and current coordinates
    let mut delta: i128 = 0;
    // End of the previous edit, in current coordinates
    let mut floor: usize = 0;
    // End of the furthest removed span, in original coordinates
    let mut removed_to: usize = 0;

    for index in order {
        let change = &changes[index];
        let mut position = change.position();
        let mut length = change.length();

        if change.kind() != ChangeKind::Insert && position < removed_to {
            let overlap = length.min(removed_to - position);
            if overlap > 0 {
                boundaries.push(BoundaryCondition::LengthTruncated {
                    index,
                    kind: change.kind(),
                    requested: length,
                    applied: length - overlap,
                });
            }
            length -= overlap;
            position = removed_to;
        }

        let shifted = (position as i128 + delta).clamp(0, usize::MAX as i128) as usize;
        let target = shifted.max(floor);
        let start = target.min(text.len());

        match change {
            Change::Insert { text: inserted, .. } => {
                if target > text.len() {
                    boundaries.push(BoundaryCondition::Appended {
                        index,
                        requested: change.position(),
                        applied: start,
                    });
                }
                let inserted: Vec<char> = inserted.chars().collect();
                let inserted_len = inserted.len();
                text.splice(start..start, inserted);

                delta += inserted_len as i128;
                floor = start + inserted_len;
            }
            Change::Delete { .. } | Change::Replace { .. } => {
                if target > text.len() {
                    boundaries.push(BoundaryCondition::StartClamped {
                        index,
                        kind: change.kind(),
                        requested: change.position(),
                        applied: start,
                    });
                }

                let removed = length.min(text.len() - start);
                if removed < length {
                    boundaries.push(BoundaryCondition::LengthTruncated {
                        index,
                        kind: change.kind(),
                        requested: length,
                        applied: removed,
                    });
                }

                let replacement: Vec<char> = change.text().unwrap_or_default().chars().collect();
                let replacement_len = replacement.len();
                text.splice(start..start + removed, replacement);

                delta += replacement_len as i128 - removed as i128;
                floor = start + replacement_len;
                removed_to = removed_to.max(position.saturating_add(length));
            }
        }
    }

    for boundary in &boundaries {
        tracing::debug!(%boundary, "clamped change");
    }

    Applied {
        text: text.into_iter().collect(),
        boundaries,
    }
}

/// Apply a mixed-field list to a snapshot, routing each change by field
pub fn apply_snapshot(original: &Snapshot, changes: &[Change]) -> Snapshot {
    let mut result = original.clone();

    for field in Field::ALL {
        let field_changes: Vec<Change> = changes.iter().filter(|c| c.field() == field).cloned().collect();
        if !field_changes.is_empty() {
            result.set(field, apply(original.get(field), &field_changes));
        }
    }

    result
}

/// Convert changes in plain-text offsets to offsets in the mapped source
///
/// Delimiters are never removed: a delete or replace whose plain span
/// crosses a delimited run is split into one change per visible stretch,
/// with any replacement text going into the first. Inserts attach to the
/// visible char before them, so text typed at the end of an element stays
/// inside it.
pub fn to_source_changes(changes: &[Change], mapping: &PositionMapping) -> Vec<Change> {
    let mut mapped = Vec::with_capacity(changes.len());

    for change in changes {
        let position = change.position();
        match change {
            Change::Insert { .. } => mapped.push(change.clone().with_position(insert_point(mapping, position))),
            Change::Delete { field, length, .. } | Change::Replace { field, length, .. } => {
                let runs = mapping.source_runs(position..position.saturating_add(*length));
                let Some((first, rest)) = runs.split_first() else {
                    let start = insert_point(mapping, position);
                    mapped.push(change.clone().with_position(start).with_length(0));
                    continue;
                };

                mapped.push(change.clone().with_position(first.start).with_length(first.len()));
                mapped.extend(rest.iter().map(|run| Change::delete(*field, run.start, run.len())));
            }
        }
    }

    mapped
}

/// Source offset for text inserted at a plain offset
pub(crate) fn insert_point(mapping: &PositionMapping, plain: usize) -> usize {
    if plain == 0 || plain > mapping.plain_len() {
        mapping.plain_to_source(plain)
    } else {
        mapping.plain_to_source(plain - 1) + 1
    }
}
