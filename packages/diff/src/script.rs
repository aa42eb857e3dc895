//! Text edit scripts: ordered equal/delete/insert operations with char
//! offsets, plus the consolidation passes that keep one contiguous user
//! edit from fragmenting into many tiny operations.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpKind {
    Equal,
    Delete,
    Insert,
}

/// One operation of a text edit script
///
/// `old_start` and `new_start` are char offsets into the old and new text.
/// For a delete `text` is the removed old text, for an insert the added new
/// text, for an equal run the shared text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditOp {
    pub kind: OpKind,
    pub old_start: usize,
    pub new_start: usize,
    pub text: String,
    /// Length of `text` in chars
    pub len: usize,
}

impl EditOp {
    pub fn new(kind: OpKind, text: impl Into<String>) -> Self {
        let text = text.into();
        let len = text.chars().count();
        Self {
            kind,
            old_start: 0,
            new_start: 0,
            text,
            len,
        }
    }

    pub fn equal(text: impl Into<String>) -> Self {
        Self::new(OpKind::Equal, text)
    }

    pub fn delete(text: impl Into<String>) -> Self {
        Self::new(OpKind::Delete, text)
    }

    pub fn insert(text: impl Into<String>) -> Self {
        Self::new(OpKind::Insert, text)
    }

    pub fn is_equal(&self) -> bool {
        self.kind == OpKind::Equal
    }

    fn push_str(&mut self, text: &str) {
        self.text.push_str(text);
        self.len += text.chars().count();
    }
}

/// Counts over a script
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptStats {
    /// Number of non-equal operations
    pub operations: usize,
    pub inserted_chars: usize,
    pub deleted_chars: usize,
    pub equal_chars: usize,
}

pub fn script_stats(ops: &[EditOp]) -> ScriptStats {
    ops.iter().fold(ScriptStats::default(), |mut stats, op| {
        match op.kind {
            OpKind::Equal => stats.equal_chars += op.len,
            OpKind::Delete => {
                stats.operations += 1;
                stats.deleted_chars += op.len;
            }
            OpKind::Insert => {
                stats.operations += 1;
                stats.inserted_chars += op.len;
            }
        }
        stats
    })
}

/// Recompute `old_start` / `new_start` from the op lengths
pub fn reindex(ops: &mut [EditOp]) {
    let mut old_cursor = 0;
    let mut new_cursor = 0;

    for op in ops.iter_mut() {
        op.old_start = old_cursor;
        op.new_start = new_cursor;
        match op.kind {
            OpKind::Equal => {
                old_cursor += op.len;
                new_cursor += op.len;
            }
            OpKind::Delete => old_cursor += op.len,
            OpKind::Insert => new_cursor += op.len,
        }
    }
}

/// Merge consecutive equal runs, and consecutive same-kind edits, into one
///
/// Empty ops are dropped and offsets are recomputed.
pub fn consolidate(ops: Vec<EditOp>) -> Vec<EditOp> {
    let mut merged: Vec<EditOp> = Vec::with_capacity(ops.len());

    for op in ops.into_iter().filter(|op| op.len > 0) {
        match merged.last_mut() {
            Some(last) if last.kind == op.kind => last.push_str(&op.text),
            _ => merged.push(op),
        }
    }

    reindex(&mut merged);
    merged
}

/// Slide isolated inserts and deletes to their earliest equivalent position
///
/// An edit sitting between two equal runs can be moved one char to the left
/// whenever the preceding equal text ends with the same char the edit ends
/// with; the result replays to the same text. Sliding all the way left
/// makes ambiguous edits deterministic: inserting " there" into
/// "Hello world" is reported at offset 5, not as "there " at offset 6.
pub fn normalize(ops: Vec<EditOp>) -> Vec<EditOp> {
    let mut ops = consolidate(ops);
    let mut i = 1;

    while i < ops.len() {
        let isolated = !ops[i].is_equal()
            && ops[i - 1].is_equal()
            && ops.get(i + 1).map(EditOp::is_equal).unwrap_or(true);

        if isolated {
            slide_left(&mut ops, i);
        }
        i += 1;
    }

    consolidate(ops)
}

fn slide_left(ops: &mut Vec<EditOp>, i: usize) {
    let mut moved = String::new();

    loop {
        let (Some(prev_last), Some(edit_last)) =
            (ops[i - 1].text.chars().last(), ops[i].text.chars().last())
        else {
            break;
        };
        if prev_last != edit_last {
            break;
        }

        pop_last(&mut ops[i - 1]);
        pop_last(&mut ops[i]);
        ops[i].text.insert(0, prev_last);
        ops[i].len += 1;
        moved.insert(0, prev_last);
    }

    if moved.is_empty() {
        return;
    }

    match ops.get_mut(i + 1) {
        Some(next) => {
            next.text.insert_str(0, &moved);
            next.len += moved.chars().count();
        }
        None => ops.push(EditOp::equal(moved)),
    }
}

fn pop_last(op: &mut EditOp) {
    if op.text.pop().is_some() {
        op.len -= 1;
    }
}

/// Replay a script against `old`, producing the new text
///
/// Equal runs are copied from `old` at their offsets, so a script that does
/// not belong to `old` produces a visibly different result.
pub fn apply_script(old: &str, ops: &[EditOp]) -> String {
    let old_chars: Vec<char> = old.chars().collect();
    let mut out = String::with_capacity(old.len());

    for op in ops {
        match op.kind {
            OpKind::Equal => {
                let start = op.old_start.min(old_chars.len());
                let end = (op.old_start + op.len).min(old_chars.len());
                out.extend(&old_chars[start..end]);
            }
            OpKind::Insert => out.push_str(&op.text),
            OpKind::Delete => {}
        }
    }

    out
}
