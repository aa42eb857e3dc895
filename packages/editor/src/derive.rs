use crate::change::{Change, Field};
use changeset_diff::{EditOp, OpKind};

/// Turn an edit script into changes against the script's old text
///
/// Positions are old-text offsets. An insert that directly follows a delete
/// is anchored at the start of the deleted span, which applies identically
/// and lets the optimizer fold the pair into a replace.
pub fn changes_from_script(ops: &[EditOp], field: Field) -> Vec<Change> {
    let mut changes = Vec::new();
    let mut previous: Option<&EditOp> = None;

    for op in ops {
        match op.kind {
            OpKind::Equal => {}
            OpKind::Delete => changes.push(Change::delete(field, op.old_start, op.len)),
            OpKind::Insert => {
                let position = match previous {
                    Some(prev) if prev.kind == OpKind::Delete => prev.old_start,
                    _ => op.old_start,
                };
                changes.push(Change::insert(field, position, op.text.clone()));
            }
        }
        previous = Some(op);
    }

    changes
}
