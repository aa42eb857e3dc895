//! # Changeset Editor
//!
//! Turns edits of a document's title and content into compact,
//! position-addressed changes, and replays change lists safely.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ tracker: baseline vs current                │
//! │  - debounced recompute (session)            │
//! │  - safety valves, selection, commit/discard │
//! └─────────────────────────────────────────────┘
//!                     ↓ edit script (changeset-diff)
//! ┌─────────────────────────────────────────────┐
//! │ derive + optimizer: script → changes        │
//! │  - plain offsets mapped into markup         │
//! │  - inserts merged, delete+insert → replace  │
//! └─────────────────────────────────────────────┘
//!                     ↓ ChangeRequest
//! ┌─────────────────────────────────────────────┐
//! │ validation + applier                        │
//! │  - reject malformed lists wholesale         │
//! │  - clamp out-of-range offsets, never fail   │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use changeset_editor::{apply_snapshot, parse_changes, ChangeRequest, Snapshot};
//!
//! let original = Snapshot::new("Greeting", "Hello world");
//! let request: ChangeRequest = serde_json::from_str(body)?;
//!
//! let changes = parse_changes(&original, &request.changes)?;
//! let patched = apply_snapshot(&original, &changes);
//! ```

mod applier;
mod change;
mod config;
mod derive;
mod errors;
mod ids;
mod optimizer;
mod session;
mod tracker;
mod validation;
mod visible;

pub use applier::{apply, apply_snapshot, apply_with_report, to_source_changes, Applied, BoundaryCondition};
pub use change::{Change, ChangeKind, ChangeRecord, ChangeRequest, Field, RequestMetadata, Snapshot, TrackedChange};
pub use config::{CommitMode, ContentMode, TrackerConfig};
pub use derive::changes_from_script;
pub use errors::{EditorError, TransportError};
pub use ids::{document_seed, IdGenerator};
pub use optimizer::{optimize, optimize_with_report, OptimizeReport};
pub use session::{PatchTransport, TrackerHandle, TrackerSession};
pub use tracker::{
    AbandonReason, CommitPlan, CommitReceipt, RecomputeOutcome, Tracker, TrackerState, TrackerStatus,
};
pub use validation::{parse_changes, validate, ValidationIssue, Violation};

use changeset_diff::{diff, DiffOptions};

/// Diff two versions of one field into changes against `old`
///
/// The result is unoptimized; [`apply`]ing it to `old` yields `new`.
pub fn diff_changes(old: &str, new: &str, field: Field, options: &DiffOptions) -> Vec<Change> {
    changes_from_script(&diff(old, new, options), field)
}
