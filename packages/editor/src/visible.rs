//! Visible-text diffing of tag-delimited content.
//!
//! Delimited runs that read the same on both sides anchor the diff. The
//! visible text between two anchors is word-diffed on its own, and the
//! result is placed between the same two runs of the baseline source.
//! Runs that were added, removed or rewritten are left alone, so the
//! changes only ever carry visible text and never remove a delimiter.

use crate::applier::{insert_point, to_source_changes};
use crate::change::{Change, Field};
use crate::derive::changes_from_script;
use changeset_diff::{diff_sequences, diff_text_within, script_stats, Granularity, RunKind};
use changeset_sourcemap::PositionMapping;
use std::ops::Range;

/// Changes in baseline source offsets, plus the size of the word scripts
/// they came from
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct VisibleDiff {
    pub changes: Vec<Change>,
    pub operations: usize,
}

/// Stretch between two anchors
#[derive(Debug, Clone, PartialEq)]
struct Region {
    old_plain: Range<usize>,
    old_source: Range<usize>,
    new_plain: Range<usize>,
}

/// Diff the visible text of `current` against `baseline`
///
/// `None` when some region needs more than `max_distance` words inserted
/// or deleted.
pub(crate) fn diff_visible(
    baseline: &str,
    baseline_map: &PositionMapping,
    current: &str,
    current_map: &PositionMapping,
    field: Field,
    max_distance: usize,
) -> Option<VisibleDiff> {
    let old_plain: Vec<char> = baseline_map.plain_text().chars().collect();
    let new_plain: Vec<char> = current_map.plain_text().chars().collect();

    let mut changes = Vec::new();
    let mut operations = 0;

    for region in regions(baseline, baseline_map, current, current_map) {
        let old_text: String = old_plain[region.old_plain.clone()].iter().collect();
        let new_text: String = new_plain[region.new_plain.clone()].iter().collect();
        if old_text == new_text {
            continue;
        }

        let ops = diff_text_within(&old_text, &new_text, Granularity::Word, max_distance)?;
        operations += script_stats(&ops).operations;

        for change in changes_from_script(&ops, field) {
            place(change, &region, baseline_map, &mut changes);
        }
    }

    Some(VisibleDiff { changes, operations })
}

/// Split both sides at the delimited runs they share
fn regions(
    baseline: &str,
    baseline_map: &PositionMapping,
    current: &str,
    current_map: &PositionMapping,
) -> Vec<Region> {
    let old_chars: Vec<char> = baseline.chars().collect();
    let new_chars: Vec<char> = current.chars().collect();
    let old_runs = baseline_map.hidden_runs();
    let new_runs = current_map.hidden_runs();

    let old_tags: Vec<&[char]> = old_runs.iter().map(|(_, run)| &old_chars[run.clone()]).collect();
    let new_tags: Vec<&[char]> = new_runs.iter().map(|(_, run)| &new_chars[run.clone()]).collect();

    let mut regions = Vec::new();
    let mut old_plain_start = 0;
    let mut old_source_start = 0;
    let mut new_plain_start = 0;

    for run in diff_sequences(&old_tags, &new_tags) {
        if run.kind != RunKind::Equal {
            continue;
        }

        for (i, j) in run.old.zip(run.new) {
            let (old_plain, old_source) = &old_runs[i];
            let (new_plain, _) = &new_runs[j];

            regions.push(Region {
                old_plain: old_plain_start..*old_plain,
                old_source: old_source_start..old_source.start,
                new_plain: new_plain_start..*new_plain,
            });

            old_plain_start = *old_plain;
            old_source_start = old_source.end;
            new_plain_start = *new_plain;
        }
    }

    regions.push(Region {
        old_plain: old_plain_start..baseline_map.plain_len(),
        old_source: old_source_start..baseline_map.source_len(),
        new_plain: new_plain_start..current_map.plain_len(),
    });

    regions
}

/// Move a region-local change into baseline source offsets
fn place(change: Change, region: &Region, mapping: &PositionMapping, out: &mut Vec<Change>) {
    let position = region.old_plain.start + change.position();

    match change {
        Change::Insert { field, text, .. } => {
            let source = if position == region.old_plain.start {
                region.old_source.start
            } else {
                insert_point(mapping, position)
            };
            out.push(Change::insert(field, source, text));
        }
        other => out.extend(to_source_changes(&[other.with_position(position)], mapping)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::applier::apply;
    use crate::optimizer::optimize;

    const F: Field = Field::Content;

    fn visible(baseline: &str, current: &str) -> VisibleDiff {
        let baseline_map = PositionMapping::build(baseline);
        let current_map = PositionMapping::build(current);
        diff_visible(baseline, &baseline_map, current, &current_map, F, usize::MAX).unwrap()
    }

    #[test]
    fn test_typing_at_paragraph_end_keeps_close_tag() {
        let baseline = "<p>Hello world</p>";
        let current = "<p>Hello world!</p>";
        let diff = visible(baseline, current);

        assert_eq!(
            diff.changes,
            vec![Change::delete(F, 9, 5), Change::insert(F, 9, "world!")]
        );
        assert_eq!(apply(baseline, &diff.changes), current);
        assert_eq!(optimize(&diff.changes), vec![Change::replace(F, 9, 5, "world!")]);
    }

    #[test]
    fn test_word_edit_keeps_paragraph_boundary() {
        let baseline = "<p>Hello world</p><p>Second para</p>";
        let current = "<p>Hello earth</p><p>Second para</p>";
        let diff = visible(baseline, current);

        assert_eq!(
            diff.changes,
            vec![Change::delete(F, 9, 5), Change::insert(F, 9, "earth")]
        );
        assert_eq!(apply(baseline, &diff.changes), current);
    }

    #[test]
    fn test_text_before_first_tag() {
        let baseline = "<p>x</p>";
        let current = "y <p>x</p>";
        assert_eq!(apply(baseline, &visible(baseline, current).changes), current);
    }

    #[test]
    fn test_edits_in_several_elements() {
        let baseline = "<h1>Title</h1><p>one <b>two</b> three</p>";
        let current = "<h1>New title</h1><p>one <b>2</b> three four</p>";
        let diff = visible(baseline, current);

        assert_eq!(apply(baseline, &diff.changes), current);
        assert_eq!(diff.operations, 5);
    }

    #[test]
    fn test_markup_only_edit_is_ignored() {
        let diff = visible("<p>Hello world</p>", "<p>Hello <b>world</b></p>");
        assert!(diff.changes.is_empty());
        assert_eq!(diff.operations, 0);
    }

    #[test]
    fn test_changed_tags_are_never_deleted() {
        let baseline = "<b>ab</b><i>cd</i>";
        let current = "<u>xy zw</u>";
        let patched = apply(baseline, &visible(baseline, current).changes);

        assert_eq!(PositionMapping::build(&patched).plain_text(), "xy zw");
        for tag in ["<b>", "</b>", "<i>", "</i>"] {
            assert!(patched.contains(tag), "{} missing from {}", tag, patched);
        }
    }

    #[test]
    fn test_gives_up_past_max_distance() {
        let baseline = "<p>one two three</p>";
        let current = "<p>uno dos tres</p>";
        let baseline_map = PositionMapping::build(baseline);
        let current_map = PositionMapping::build(current);

        assert!(diff_visible(baseline, &baseline_map, current, &current_map, F, 3).is_none());
        assert!(diff_visible(baseline, &baseline_map, current, &current_map, F, 6).is_some());
    }
}
