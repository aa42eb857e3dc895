//! # Changeset Diff
//!
//! Computes ordered equal/delete/insert edit scripts between two strings.
//!
//! ```text
//! old, new ──► tokenize (chars | words | element tree)
//!                 │
//!                 ▼
//!          shortest edit script (myers)
//!                 │
//!                 ▼
//!          consolidate + left-normalise ──► Vec<EditOp>
//! ```
//!
//! Offsets on every [`EditOp`] are char offsets into the old and new text.
//! Replaying a script with [`apply_script`] reconstructs the new text.

pub mod markup;
pub mod myers;
pub mod script;
pub mod text;

pub use markup::{diff_markup, MarkupDiffOptions};
pub use myers::{diff as diff_sequences, diff_within as diff_sequences_within, Run, RunKind};
pub use script::{apply_script, consolidate, normalize, script_stats, EditOp, OpKind, ScriptStats};
pub use text::{diff_text, diff_text_within, tokenize_words, Granularity};

use serde::{Deserialize, Serialize};

/// Diff configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DiffOptions {
    pub granularity: Granularity,
    pub markup: MarkupDiffOptions,
}

impl DiffOptions {
    pub fn with_granularity(granularity: Granularity) -> Self {
        Self {
            granularity,
            ..Self::default()
        }
    }
}

/// Diff two strings with the configured granularity
pub fn diff(old: &str, new: &str, options: &DiffOptions) -> Vec<EditOp> {
    match options.granularity {
        Granularity::Markup => diff_markup(old, new, &options.markup),
        granularity => diff_text(old, new, granularity),
    }
}
