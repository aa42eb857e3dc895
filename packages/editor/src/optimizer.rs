//! Change list consolidation
//!
//! Two merges, both preserving what [`crate::apply`] produces:
//!
//! - consecutive inserts anchored at the same original position become one
//!   insert with the concatenated text
//! - a delete directly followed by an insert at the same position becomes
//!   a replace
//!
//! Changes are grouped per field (title first) and ordered by position;
//! ties keep their input order.

use crate::change::Change;
use serde::{Deserialize, Serialize};

/// How many changes went in and how many came out
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizeReport {
    pub raw: usize,
    pub optimized: usize,
}

impl OptimizeReport {
    /// Number of changes folded away
    pub fn saved(&self) -> usize {
        self.raw.saturating_sub(self.optimized)
    }
}

pub fn optimize(changes: &[Change]) -> Vec<Change> {
    let mut sorted: Vec<&Change> = changes.iter().collect();
    sorted.sort_by_key(|change| (change.field(), change.position()));

    let mut optimized: Vec<Change> = Vec::with_capacity(sorted.len());

    for change in sorted {
        match optimized.last().and_then(|last| merge(last, change)) {
            Some(merged) => {
                if let Some(last) = optimized.last_mut() {
                    *last = merged;
                }
            }
            None => optimized.push(change.clone()),
        }
    }

    optimized
}

fn merge(last: &Change, next: &Change) -> Option<Change> {
    if last.field() != next.field() {
        return None;
    }

    match (last, next) {
        (
            Change::Insert {
                field,
                position,
                text: first,
            },
            Change::Insert {
                position: next_position,
                text: second,
                ..
            },
        ) if position == next_position => Some(Change::insert(*field, *position, format!("{}{}", first, second))),
        (
            Change::Delete {
                field,
                position,
                length,
            },
            Change::Insert {
                position: next_position,
                text,
                ..
            },
        ) if position == next_position => Some(Change::replace(*field, *position, *length, text.clone())),
        _ => None,
    }
}

/// [`optimize`] plus the raw and optimized counts
pub fn optimize_with_report(changes: &[Change]) -> (Vec<Change>, OptimizeReport) {
    let optimized = optimize(changes);
    let report = OptimizeReport {
        raw: changes.len(),
        optimized: optimized.len(),
    };

    tracing::debug!(raw = report.raw, optimized = report.optimized, "optimized changes");
    (optimized, report)
}
