//! # Live Tracking
//!
//! A [`Tracker`] owns one document's baseline (the last committed
//! snapshot), the current field values and the pending change set derived
//! from diffing the two.
//!
//! ```text
//!            edit / recompute
//!   Idle ───────────────────────► Pending ◄──┐
//!    ▲                              │        │ transport error
//!    │ new baseline   begin_commit  ▼        │
//!    ├──────────────────────── Committing ───┘
//!    │
//!    │ baseline restored
//!    └──────────────────────── Discarding ◄── discard
//! ```
//!
//! Recomputing always diffs the current value against the baseline, never
//! against an intermediate value, and replaces that field's pending set.
//! The tracker is synchronous; timing lives in [`crate::TrackerSession`].

use crate::change::{Change, ChangeRequest, Field, Snapshot, TrackedChange};
use crate::config::{CommitMode, ContentMode, TrackerConfig};
use crate::derive::changes_from_script;
use crate::errors::{EditorError, TransportError};
use crate::ids::IdGenerator;
use crate::optimizer::{optimize_with_report, OptimizeReport};
use crate::visible::diff_visible;
use changeset_diff::{diff_markup, diff_text_within, script_stats, EditOp, Granularity};
use changeset_sourcemap::{char_len, PositionMapping};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackerState {
    Idle,
    Pending,
    Committing,
    Discarding,
}

impl fmt::Display for TrackerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TrackerState::Idle => "idle",
            TrackerState::Pending => "pending",
            TrackerState::Committing => "committing",
            TrackerState::Discarding => "discarding",
        })
    }
}

/// Why a recompute was skipped
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum AbandonReason {
    /// Lengths differ by more than the configured share of the longer text
    LengthDelta { baseline: usize, current: usize },
    TooManyOperations { operations: usize, limit: usize },
    TooManyChanges { changes: usize, limit: usize },
    /// More words would have to change than the diff search is allowed
    EditTooLarge { limit: usize },
}

impl fmt::Display for AbandonReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbandonReason::LengthDelta { baseline, current } => {
                write!(f, "length changed from {} to {}", baseline, current)
            }
            AbandonReason::TooManyOperations { operations, limit } => {
                write!(f, "{} edit operations (limit {})", operations, limit)
            }
            AbandonReason::TooManyChanges { changes, limit } => {
                write!(f, "{} changes (limit {})", changes, limit)
            }
            AbandonReason::EditTooLarge { limit } => {
                write!(f, "more than {} units differ", limit)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RecomputeOutcome {
    /// The field's pending set was replaced
    Updated { field: Field, changes: usize },
    /// The previous pending set was left in place
    Abandoned(AbandonReason),
    /// A commit is in flight; the field stays dirty
    Paused(Field),
}

/// A commit that has been started and awaits the transport
#[derive(Debug, Clone, PartialEq)]
pub struct CommitPlan {
    pub request: ChangeRequest,
    pub report: OptimizeReport,
    pub change_ids: Vec<String>,
}

/// Result of a successful commit
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitReceipt {
    pub baseline: Snapshot,
    pub report: OptimizeReport,
    pub committed: Vec<TrackedChange>,
}

/// Point-in-time view of a tracker
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackerStatus {
    pub document_id: String,
    pub state: TrackerState,
    pub baseline: Snapshot,
    pub current: Snapshot,
    pub pending: Vec<TrackedChange>,
}

pub struct Tracker {
    document_id: String,
    config: TrackerConfig,
    baseline: Snapshot,
    current: Snapshot,
    /// Mapping of the baseline content
    mapping: PositionMapping,
    pending: Vec<TrackedChange>,
    ids: IdGenerator,
    state: TrackerState,
    /// Set while a commit is in flight; suppresses recompute
    paused: bool,
    /// Fields edited since their last recompute
    dirty: BTreeSet<Field>,
    in_flight: Option<CommitPlan>,
}

impl Tracker {
    pub fn new(document_id: impl Into<String>, baseline: Snapshot, config: TrackerConfig) -> Self {
        let document_id = document_id.into();
        Self {
            ids: IdGenerator::new(&document_id),
            mapping: PositionMapping::build(&baseline.content),
            current: baseline.clone(),
            baseline,
            document_id,
            config,
            pending: Vec::new(),
            state: TrackerState::Idle,
            paused: false,
            dirty: BTreeSet::new(),
            in_flight: None,
        }
    }

    pub fn document_id(&self) -> &str {
        &self.document_id
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    pub fn state(&self) -> TrackerState {
        self.state
    }

    pub fn baseline(&self) -> &Snapshot {
        &self.baseline
    }

    pub fn current(&self) -> &Snapshot {
        &self.current
    }

    pub fn mapping(&self) -> &PositionMapping {
        &self.mapping
    }

    pub fn pending(&self) -> &[TrackedChange] {
        &self.pending
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn has_dirty_fields(&self) -> bool {
        !self.dirty.is_empty()
    }

    pub fn status(&self) -> TrackerStatus {
        TrackerStatus {
            document_id: self.document_id.clone(),
            state: self.state,
            baseline: self.baseline.clone(),
            current: self.current.clone(),
            pending: self.pending.clone(),
        }
    }

    /// Record a new value for `field`; the field is re-diffed on the next
    /// recompute
    pub fn edit(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();
        if self.current.get(field) == value {
            return;
        }

        self.current.set(field, value);
        self.dirty.insert(field);
    }

    /// Recompute every field edited since its last recompute
    pub fn recompute_dirty(&mut self) -> Vec<RecomputeOutcome> {
        if self.paused {
            return Vec::new();
        }

        let fields: Vec<Field> = std::mem::take(&mut self.dirty).into_iter().collect();
        fields.into_iter().map(|field| self.recompute(field)).collect()
    }

    /// Diff the current value of `field` against the baseline
    pub fn recompute(&mut self, field: Field) -> RecomputeOutcome {
        if self.paused {
            self.dirty.insert(field);
            return RecomputeOutcome::Paused(field);
        }
        self.dirty.remove(&field);

        let plain_content = field == Field::Content && self.config.content_mode == ContentMode::Plain;
        let current_mapping = plain_content.then(|| PositionMapping::build(&self.current.content));

        let (old, new) = match &current_mapping {
            Some(current) => (self.mapping.plain_text(), current.plain_text()),
            None => (self.baseline.get(field), self.current.get(field)),
        };

        if let Some(reason) = self.check_length_delta(old, new) {
            return self.abandon(field, reason);
        }

        let too_large = AbandonReason::EditTooLarge {
            limit: self.config.max_edit_distance,
        };
        let (changes, operations) = match &current_mapping {
            Some(current_mapping) => match diff_visible(
                &self.baseline.content,
                &self.mapping,
                &self.current.content,
                current_mapping,
                field,
                self.config.max_edit_distance,
            ) {
                Some(diff) => (diff.changes, diff.operations),
                None => return self.abandon(field, too_large),
            },
            None => match self.diff_field(field, old, new) {
                Some(ops) => (changes_from_script(&ops, field), script_stats(&ops).operations),
                None => return self.abandon(field, too_large),
            },
        };

        if operations > self.config.max_script_operations {
            let reason = AbandonReason::TooManyOperations {
                operations,
                limit: self.config.max_script_operations,
            };
            return self.abandon(field, reason);
        }

        if changes.len() > self.config.max_changes {
            let reason = AbandonReason::TooManyChanges {
                changes: changes.len(),
                limit: self.config.max_changes,
            };
            return self.abandon(field, reason);
        }

        let count = changes.len();
        self.replace_pending(field, changes);
        self.refresh_state();

        tracing::debug!(document = %self.document_id, %field, changes = count, "recomputed");
        RecomputeOutcome::Updated { field, changes: count }
    }

    fn diff_field(&self, field: Field, old: &str, new: &str) -> Option<Vec<EditOp>> {
        match (field, self.config.content_mode) {
            (Field::Content, ContentMode::Markup) => Some(diff_markup(old, new, &self.config.markup)),
            _ => diff_text_within(old, new, Granularity::Word, self.config.max_edit_distance),
        }
    }

    fn check_length_delta(&self, old: &str, new: &str) -> Option<AbandonReason> {
        let baseline = char_len(old);
        let current = char_len(new);
        let longer = baseline.max(current);
        let delta = baseline.abs_diff(current);

        (delta as f64 > self.config.max_length_delta_ratio * longer as f64)
            .then_some(AbandonReason::LengthDelta { baseline, current })
    }

    fn abandon(&self, field: Field, reason: AbandonReason) -> RecomputeOutcome {
        tracing::warn!(document = %self.document_id, %field, %reason, "recompute abandoned");
        RecomputeOutcome::Abandoned(reason)
    }

    /// Swap in a field's new pending set, keeping the id and selection of
    /// changes that survived unchanged
    fn replace_pending(&mut self, field: Field, changes: Vec<Change>) {
        let (mut previous, kept): (Vec<_>, Vec<_>) =
            std::mem::take(&mut self.pending).into_iter().partition(|t| t.change.field() == field);
        self.pending = kept;

        for change in changes {
            match previous.iter().position(|t| t.change == change) {
                Some(index) => self.pending.push(previous.remove(index)),
                None => self.pending.push(TrackedChange::new(self.ids.next_id(), change)),
            }
        }
    }

    fn refresh_state(&mut self) {
        if matches!(self.state, TrackerState::Idle | TrackerState::Pending) {
            self.state = if self.pending.is_empty() {
                TrackerState::Idle
            } else {
                TrackerState::Pending
            };
        }
    }

    /// Flip the selection of one pending change, returning the new value
    pub fn toggle(&mut self, id: &str) -> Result<bool, EditorError> {
        let tracked = self
            .pending
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| EditorError::UnknownChange(id.to_string()))?;

        tracked.selected = !tracked.selected;
        Ok(tracked.selected)
    }

    pub fn select_all(&mut self, selected: bool) {
        for tracked in &mut self.pending {
            tracked.selected = selected;
        }
    }

    /// Build the request for a commit and enter `Committing`
    ///
    /// Recompute stays paused until [`Tracker::finish_commit`].
    pub fn begin_commit(&mut self, mode: CommitMode) -> Result<CommitPlan, EditorError> {
        match self.state {
            TrackerState::Committing => return Err(EditorError::CommitInFlight),
            TrackerState::Discarding => {
                return Err(EditorError::InvalidState {
                    action: "commit",
                    state: self.state,
                })
            }
            TrackerState::Idle | TrackerState::Pending => {}
        }

        let chosen: Vec<&TrackedChange> = self
            .pending
            .iter()
            .filter(|t| mode == CommitMode::All || t.selected)
            .collect();
        if chosen.is_empty() {
            return Err(EditorError::NothingToCommit);
        }

        let changes: Vec<Change> = chosen.iter().map(|t| t.change.clone()).collect();
        let change_ids = chosen.iter().map(|t| t.id.clone()).collect();
        let (optimized, report) = optimize_with_report(&changes);

        let request = ChangeRequest::from_changes(&optimized).with_description(format!(
            "{} changes consolidated into {}",
            report.raw, report.optimized
        ));

        let plan = CommitPlan {
            request,
            report,
            change_ids,
        };

        self.state = TrackerState::Committing;
        self.paused = true;
        self.in_flight = Some(plan.clone());

        tracing::info!(
            document = %self.document_id,
            raw = report.raw,
            optimized = report.optimized,
            "commit started"
        );
        Ok(plan)
    }

    /// Resolve the in-flight commit with the transport's answer
    ///
    /// On success the applied snapshot becomes the baseline, the mapping is
    /// rebuilt and the pending set cleared; fields whose current value still
    /// differs are marked for recompute. On failure nothing but the state
    /// changes.
    pub fn finish_commit(&mut self, result: Result<Snapshot, TransportError>) -> Result<CommitReceipt, EditorError> {
        let Some(plan) = self.in_flight.take().filter(|_| self.state == TrackerState::Committing) else {
            return Err(EditorError::InvalidState {
                action: "finish a commit",
                state: self.state,
            });
        };
        self.paused = false;

        match result {
            Ok(applied) => {
                let committed = std::mem::take(&mut self.pending)
                    .into_iter()
                    .filter(|t| plan.change_ids.contains(&t.id))
                    .map(|mut t| {
                        t.applied = true;
                        t
                    })
                    .collect();

                self.mapping = PositionMapping::build(&applied.content);
                self.baseline = applied;
                self.state = TrackerState::Idle;

                for field in Field::ALL {
                    if self.current.get(field) != self.baseline.get(field) {
                        self.dirty.insert(field);
                    }
                }

                tracing::info!(document = %self.document_id, "commit applied");
                Ok(CommitReceipt {
                    baseline: self.baseline.clone(),
                    report: plan.report,
                    committed,
                })
            }
            Err(error) => {
                self.state = TrackerState::Pending;
                self.refresh_state();

                tracing::warn!(document = %self.document_id, %error, "commit failed");
                Err(EditorError::Transport(error))
            }
        }
    }

    /// Restore the baseline and drop every pending change
    pub fn discard(&mut self) -> Result<Snapshot, EditorError> {
        if self.state == TrackerState::Committing {
            return Err(EditorError::InvalidState {
                action: "discard",
                state: self.state,
            });
        }

        self.state = TrackerState::Discarding;
        self.current = self.baseline.clone();
        self.pending.clear();
        self.dirty.clear();
        self.state = TrackerState::Idle;

        tracing::info!(document = %self.document_id, "changes discarded");
        Ok(self.current.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::applier::apply_snapshot;

    fn tracker(content: &str) -> Tracker {
        Tracker::new("doc-1", Snapshot::new("Title", content), TrackerConfig::default())
    }

    fn changes(tracker: &Tracker) -> Vec<Change> {
        tracker.pending().iter().map(|t| t.change.clone()).collect()
    }

    fn words(count: usize, replaced: impl Fn(usize) -> bool) -> String {
        (0..count)
            .map(|i| if replaced(i) { format!("x{:02}", i) } else { format!("w{:02}", i) })
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[test]
    fn test_edit_then_recompute() {
        let mut tracker = tracker("Hello world");
        tracker.edit(Field::Content, "Hello there world");

        assert_eq!(tracker.state(), TrackerState::Idle);
        assert_eq!(
            tracker.recompute_dirty(),
            vec![RecomputeOutcome::Updated {
                field: Field::Content,
                changes: 1
            }]
        );
        assert_eq!(tracker.state(), TrackerState::Pending);
        assert_eq!(changes(&tracker), vec![Change::insert(Field::Content, 5, " there")]);
    }

    #[test]
    fn test_recompute_diffs_against_baseline() {
        let mut tracker = tracker("Hello world");
        tracker.edit(Field::Content, "Hello big world");
        tracker.recompute(Field::Content);
        tracker.edit(Field::Content, "Hello world");
        tracker.recompute(Field::Content);

        assert!(tracker.pending().is_empty());
        assert_eq!(tracker.state(), TrackerState::Idle);
    }

    #[test]
    fn test_plain_mode_maps_into_markup() {
        let mut tracker = tracker("<p>Hello world</p>");
        tracker.edit(Field::Content, "<p>Hello there world</p>");
        tracker.recompute(Field::Content);

        assert_eq!(changes(&tracker), vec![Change::insert(Field::Content, 8, " there")]);
    }

    #[test]
    fn test_plain_mode_keeps_tags_around_edited_words() {
        let mut tracker = tracker("<p>Hello world</p><p>Second para</p>");
        tracker.edit(Field::Content, "<p>Hello world!</p><p>Second paragraph</p>");
        tracker.recompute(Field::Content);

        let result = apply_snapshot(tracker.baseline(), &changes(&tracker));
        assert_eq!(result.content, "<p>Hello world!</p><p>Second paragraph</p>");

        let plan = tracker.begin_commit(CommitMode::All).unwrap();
        assert_eq!(plan.report, OptimizeReport { raw: 4, optimized: 2 });
    }

    #[test]
    fn test_plain_mode_ignores_added_formatting() {
        let mut tracker = tracker("<p>Hello world</p>");
        tracker.edit(Field::Content, "<p>Hello <b>world</b>, again</p>");
        tracker.recompute(Field::Content);

        let result = apply_snapshot(tracker.baseline(), &changes(&tracker));
        assert_eq!(result.content, "<p>Hello world, again</p>");
    }

    #[test]
    fn test_large_rewrite_abandons_before_searching_further() {
        let config = TrackerConfig {
            max_edit_distance: 4,
            ..TrackerConfig::default()
        };
        let mut tracker = Tracker::new("doc-1", Snapshot::new("one two three", "<p>one two three</p>"), config);
        tracker.edit(Field::Content, "<p>uno dos tres</p>");
        tracker.edit(Field::Title, "uno dos tres");

        let abandoned = RecomputeOutcome::Abandoned(AbandonReason::EditTooLarge { limit: 4 });
        assert_eq!(tracker.recompute(Field::Content), abandoned);
        assert_eq!(tracker.recompute(Field::Title), abandoned);
        assert!(tracker.pending().is_empty());
    }

    #[test]
    fn test_markup_mode_diffs_source() {
        let config = TrackerConfig {
            content_mode: ContentMode::Markup,
            ..TrackerConfig::default()
        };
        let mut tracker = Tracker::new("doc-1", Snapshot::new("", "<p>Hello world</p>"), config);
        tracker.edit(Field::Content, "<p>Hello there world</p>");
        tracker.recompute(Field::Content);

        let result = apply_snapshot(tracker.baseline(), &changes(&tracker));
        assert_eq!(result.content, "<p>Hello there world</p>");
    }

    #[test]
    fn test_length_delta_abandons() {
        let mut tracker = tracker("");
        tracker.edit(Field::Content, "hello");

        assert_eq!(
            tracker.recompute(Field::Content),
            RecomputeOutcome::Abandoned(AbandonReason::LengthDelta {
                baseline: 0,
                current: 5
            })
        );
        assert!(tracker.pending().is_empty());
    }

    #[test]
    fn test_too_many_operations_abandons() {
        let mut tracker = tracker(&words(60, |_| false));
        tracker.edit(Field::Content, words(60, |i| i % 2 == 0));

        assert_eq!(
            tracker.recompute(Field::Content),
            RecomputeOutcome::Abandoned(AbandonReason::TooManyOperations {
                operations: 60,
                limit: 50
            })
        );
    }

    #[test]
    fn test_too_many_changes_abandons() {
        let mut tracker = tracker(&words(60, |_| false));
        tracker.edit(Field::Content, words(60, |i| i % 2 == 0 && i < 42));

        assert_eq!(
            tracker.recompute(Field::Content),
            RecomputeOutcome::Abandoned(AbandonReason::TooManyChanges {
                changes: 42,
                limit: 20
            })
        );
    }

    #[test]
    fn test_abandon_keeps_previous_pending() {
        let mut tracker = tracker(&words(60, |_| false));
        tracker.edit(Field::Content, words(60, |i| i == 3));
        tracker.recompute(Field::Content);
        assert_eq!(tracker.pending().len(), 2);

        tracker.edit(Field::Content, words(60, |i| i % 2 == 0));
        tracker.recompute(Field::Content);
        assert_eq!(tracker.pending().len(), 2);
    }

    #[test]
    fn test_selection_survives_recompute() {
        let mut tracker = tracker("alpha beta gamma");
        tracker.edit(Field::Content, "alpha BETA gamma");
        tracker.recompute(Field::Content);

        let id = tracker.pending()[0].id.clone();
        assert!(!tracker.toggle(&id).unwrap());

        tracker.edit(Field::Content, "alpha BETA gamma more");
        tracker.recompute(Field::Content);

        assert_eq!(tracker.pending().len(), 3);
        assert_eq!(tracker.pending()[0].id, id);
        assert!(!tracker.pending()[0].selected);
        assert!(tracker.pending()[2].selected);
    }

    #[test]
    fn test_toggle_unknown_change() {
        let mut tracker = tracker("text");
        assert!(matches!(tracker.toggle("nope"), Err(EditorError::UnknownChange(_))));
    }

    #[test]
    fn test_selective_commit() {
        let mut tracker = tracker("alpha beta gamma");
        tracker.edit(Field::Content, "alpha BETA gamma more");
        tracker.recompute(Field::Content);
        assert_eq!(tracker.pending().len(), 3);

        let last = tracker.pending()[2].id.clone();
        tracker.toggle(&last).unwrap();

        let plan = tracker.begin_commit(CommitMode::Selected).unwrap();
        assert_eq!(plan.report, OptimizeReport { raw: 2, optimized: 1 });
        assert_eq!(plan.request.changes, vec![Change::replace(Field::Content, 6, 4, "BETA").to_record()]);
        assert_eq!(tracker.state(), TrackerState::Committing);
        assert!(tracker.is_paused());

        let receipt = tracker
            .finish_commit(Ok(Snapshot::new("Title", "alpha BETA gamma")))
            .unwrap();
        assert_eq!(receipt.committed.len(), 2);
        assert!(receipt.committed.iter().all(|t| t.applied));
        assert_eq!(tracker.state(), TrackerState::Idle);
        assert!(tracker.pending().is_empty());
        assert!(tracker.has_dirty_fields());

        tracker.recompute_dirty();
        assert_eq!(changes(&tracker), vec![Change::insert(Field::Content, 16, " more")]);
    }

    #[test]
    fn test_commit_pauses_recompute() {
        let mut tracker = tracker("Hello world");
        tracker.edit(Field::Content, "Hello there world");
        tracker.recompute(Field::Content);
        tracker.begin_commit(CommitMode::All).unwrap();

        tracker.edit(Field::Title, "New title");
        assert_eq!(tracker.recompute(Field::Title), RecomputeOutcome::Paused(Field::Title));
        assert!(tracker.recompute_dirty().is_empty());

        assert!(matches!(
            tracker.begin_commit(CommitMode::All),
            Err(EditorError::CommitInFlight)
        ));

        tracker
            .finish_commit(Ok(Snapshot::new("Title", "Hello there world")))
            .unwrap();
        let outcomes = tracker.recompute_dirty();
        assert_eq!(
            outcomes,
            vec![RecomputeOutcome::Updated {
                field: Field::Title,
                changes: 2
            }]
        );
    }

    #[test]
    fn test_transport_failure_keeps_state() {
        let mut tracker = tracker("Hello world");
        tracker.edit(Field::Content, "Hello there world");
        tracker.recompute(Field::Content);
        tracker.begin_commit(CommitMode::All).unwrap();

        let result = tracker.finish_commit(Err(TransportError::Request("offline".into())));
        assert!(matches!(result, Err(EditorError::Transport(_))));
        assert_eq!(tracker.state(), TrackerState::Pending);
        assert_eq!(tracker.baseline().content, "Hello world");
        assert_eq!(tracker.pending().len(), 1);
        assert!(!tracker.is_paused());
    }

    #[test]
    fn test_nothing_to_commit() {
        let mut tracker = tracker("Hello world");
        assert!(matches!(
            tracker.begin_commit(CommitMode::All),
            Err(EditorError::NothingToCommit)
        ));

        tracker.edit(Field::Content, "Hello there world");
        tracker.recompute(Field::Content);
        tracker.select_all(false);
        assert!(matches!(
            tracker.begin_commit(CommitMode::Selected),
            Err(EditorError::NothingToCommit)
        ));
    }

    #[test]
    fn test_finish_without_commit() {
        let mut tracker = tracker("Hello world");
        assert!(matches!(
            tracker.finish_commit(Ok(Snapshot::default())),
            Err(EditorError::InvalidState { .. })
        ));
    }

    #[test]
    fn test_discard_restores_baseline() {
        let mut tracker = tracker("Hello world");
        tracker.edit(Field::Content, "Hello there world");
        tracker.edit(Field::Title, "Other");
        tracker.recompute_dirty();

        let restored = tracker.discard().unwrap();
        assert_eq!(restored, Snapshot::new("Title", "Hello world"));
        assert_eq!(tracker.current(), tracker.baseline());
        assert!(tracker.pending().is_empty());
        assert_eq!(tracker.state(), TrackerState::Idle);
    }
}
