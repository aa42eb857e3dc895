use crate::myers::{self, RunKind};
use crate::script::{normalize, EditOp, OpKind};
use serde::{Deserialize, Serialize};

/// Unit of comparison for text diffs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// One unit per char; exact but quadratic in the edit distance
    Char,
    /// Runs of whitespace and runs of non-whitespace
    #[default]
    Word,
    /// Element-aware diff of tag-delimited content
    Markup,
}

/// Split text into alternating runs of whitespace and non-whitespace
pub fn tokenize_words(text: &str) -> Vec<&str> {
    let mut words = Vec::new();
    let mut start = 0;
    let mut in_space: Option<bool> = None;

    for (byte, ch) in text.char_indices() {
        let space = ch.is_whitespace();
        match in_space {
            Some(previous) if previous != space => {
                words.push(&text[start..byte]);
                start = byte;
            }
            _ => {}
        }
        in_space = Some(space);
    }

    if start < text.len() {
        words.push(&text[start..]);
    }

    words
}

/// Diff two plain strings at char or word granularity
///
/// `Granularity::Markup` is treated as `Word` here; use
/// [`crate::diff_markup`] for element-aware diffs.
pub fn diff_text(old: &str, new: &str, granularity: Granularity) -> Vec<EditOp> {
    diff_text_within(old, new, granularity, usize::MAX).unwrap_or_default()
}

/// Like [`diff_text`], but `None` once more than `max_distance` chars or
/// words would have to be inserted or deleted
pub fn diff_text_within(old: &str, new: &str, granularity: Granularity, max_distance: usize) -> Option<Vec<EditOp>> {
    if old.is_empty() && new.is_empty() {
        return Some(Vec::new());
    }

    match granularity {
        Granularity::Char => {
            let old_units: Vec<char> = old.chars().collect();
            let new_units: Vec<char> = new.chars().collect();
            diff_units(&old_units, &new_units, max_distance, |units| units.iter().collect())
        }
        Granularity::Word | Granularity::Markup => {
            let old_units = tokenize_words(old);
            let new_units = tokenize_words(new);
            diff_units(&old_units, &new_units, max_distance, |units| units.concat())
        }
    }
}

fn diff_units<T: PartialEq>(
    old: &[T],
    new: &[T],
    max_distance: usize,
    render: impl Fn(&[T]) -> String,
) -> Option<Vec<EditOp>> {
    let ops = myers::diff_within(old, new, max_distance)?
        .into_iter()
        .map(|run| match run.kind {
            RunKind::Equal => EditOp::new(OpKind::Equal, render(&old[run.old])),
            RunKind::Delete => EditOp::new(OpKind::Delete, render(&old[run.old])),
            RunKind::Insert => EditOp::new(OpKind::Insert, render(&new[run.new])),
        })
        .collect();

    Some(normalize(ops))
}
