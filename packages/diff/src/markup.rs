//! Element-aware diff of tag-delimited content.
//!
//! Both sides are parsed into element trees. Sibling lists are aligned by
//! similarity rather than position, and each matched pair is diffed in
//! three independent scopes (open tag, inner content, close tag) so an
//! inner-text edit never produces an operation that spans a delimiter.

use crate::script::{consolidate, EditOp};
use crate::text::{diff_text, Granularity};
use changeset_markup::{parse, Node, NodeKind};
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Tuning knobs for element matching
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MarkupDiffOptions {
    /// Minimum similarity for two elements to count as the same element
    pub match_threshold: f64,
    /// Matched pairs whose shorter/longer length ratio falls below this are
    /// replaced wholesale instead of diffed internally
    pub drastic_length_ratio: f64,
    /// Score for same variant and tag; the rest splits evenly between
    /// length overlap and char overlap
    pub kind_weight: f64,
    /// Granularity for text nodes inside matched elements
    pub text_granularity: Granularity,
    /// Above this many sibling pairs the alignment falls back to a plain
    /// word diff of the whole range
    pub max_alignment_cells: usize,
}

impl Default for MarkupDiffOptions {
    fn default() -> Self {
        Self {
            match_threshold: 0.5,
            drastic_length_ratio: 0.3,
            kind_weight: 0.4,
            text_granularity: Granularity::Word,
            max_alignment_cells: 250_000,
        }
    }
}

/// Diff two tag-delimited sources
pub fn diff_markup(old: &str, new: &str, options: &MarkupDiffOptions) -> Vec<EditOp> {
    if old.is_empty() || new.is_empty() {
        return diff_text(old, new, Granularity::Word);
    }

    let old_tree = parse(old);
    let new_tree = parse(new);

    let mut differ = MarkupDiffer {
        old: old.chars().collect(),
        new: new.chars().collect(),
        options,
        ops: Vec::new(),
    };
    differ.diff_siblings(&old_tree.nodes, &new_tree.nodes, 0..old_tree.len, 0..new_tree.len);

    consolidate(differ.ops)
}

struct MarkupDiffer<'a> {
    old: Vec<char>,
    new: Vec<char>,
    options: &'a MarkupDiffOptions,
    ops: Vec<EditOp>,
}

impl MarkupDiffer<'_> {
    fn old_text(&self, range: Range<usize>) -> String {
        self.old[range].iter().collect()
    }

    fn new_text(&self, range: Range<usize>) -> String {
        self.new[range].iter().collect()
    }

    /// Diff two sibling lists that tile `old_range` / `new_range`
    fn diff_siblings(
        &mut self,
        old_nodes: &[Node],
        new_nodes: &[Node],
        old_range: Range<usize>,
        new_range: Range<usize>,
    ) {
        if old_nodes.len().saturating_mul(new_nodes.len()) > self.options.max_alignment_cells {
            tracing::debug!(
                old = old_nodes.len(),
                new = new_nodes.len(),
                "sibling lists too large to align, falling back to word diff"
            );
            self.diff_range(old_range, new_range, Granularity::Word);
            return;
        }

        let pairs = self.align(old_nodes, new_nodes);
        let mut old_cursor = 0;
        let mut new_cursor = 0;

        for (i, j) in pairs {
            self.emit_gap(&old_nodes[old_cursor..i], &new_nodes[new_cursor..j]);
            self.diff_pair(&old_nodes[i], &new_nodes[j]);
            old_cursor = i + 1;
            new_cursor = j + 1;
        }

        self.emit_gap(&old_nodes[old_cursor..], &new_nodes[new_cursor..]);
    }

    /// Unmatched nodes: delete the old ones, then insert the new ones
    fn emit_gap(&mut self, old_nodes: &[Node], new_nodes: &[Node]) {
        for node in old_nodes {
            let text = self.old_text(node.span.clone());
            self.ops.push(EditOp::delete(text));
        }
        for node in new_nodes {
            let text = self.new_text(node.span.clone());
            self.ops.push(EditOp::insert(text));
        }
    }

    /// Order-preserving alignment that maximises total similarity
    fn align(&self, old_nodes: &[Node], new_nodes: &[Node]) -> Vec<(usize, usize)> {
        let n = old_nodes.len();
        let m = new_nodes.len();
        let cols = m + 1;

        let mut scores = vec![0.0f64; n * m];
        for (i, a) in old_nodes.iter().enumerate() {
            for (j, b) in new_nodes.iter().enumerate() {
                scores[i * m + j] = self.similarity(a, b);
            }
        }

        // best[i][j]: best total over old[i..] and new[j..]
        let mut best = vec![0.0f64; (n + 1) * cols];
        for i in (0..n).rev() {
            for j in (0..m).rev() {
                let skip_old = best[(i + 1) * cols + j];
                let skip_new = best[i * cols + j + 1];
                let mut value = skip_old.max(skip_new);

                let score = scores[i * m + j];
                if score >= self.options.match_threshold {
                    value = value.max(best[(i + 1) * cols + j + 1] + score);
                }
                best[i * cols + j] = value;
            }
        }

        let mut pairs = Vec::new();
        let (mut i, mut j) = (0, 0);
        while i < n && j < m {
            let score = scores[i * m + j];
            let here = best[i * cols + j];

            if score >= self.options.match_threshold
                && (here - (best[(i + 1) * cols + j + 1] + score)).abs() < f64::EPSILON
            {
                pairs.push((i, j));
                i += 1;
                j += 1;
            } else if (here - best[(i + 1) * cols + j]).abs() < f64::EPSILON {
                i += 1;
            } else {
                j += 1;
            }
        }

        pairs
    }

    /// Similarity in `[0, 1]`
    ///
    /// Different node variants or tags never match. Otherwise the kind weight
    /// is granted and the remainder is split between length overlap and char
    /// overlap of the element content (the inner span for elements, the whole
    /// node for leaves).
    fn similarity(&self, a: &Node, b: &Node) -> f64 {
        if !a.same_kind(b) {
            return 0.0;
        }
        if self.old[a.span.clone()] == self.new[b.span.clone()] {
            return 1.0;
        }

        let (a_content, b_content) = if a.is_element() {
            (&self.old[a.inner()], &self.new[b.inner()])
        } else {
            (&self.old[a.span.clone()], &self.new[b.span.clone()])
        };

        let longest = a_content.len().max(b_content.len());
        if longest == 0 {
            return 1.0;
        }

        let length_overlap = a_content.len().min(b_content.len()) as f64 / longest as f64;
        let char_overlap = shared_chars(a_content, b_content) as f64 / longest as f64;
        let rest = (1.0 - self.options.kind_weight) / 2.0;

        self.options.kind_weight + rest * length_overlap + rest * char_overlap
    }

    fn diff_pair(&mut self, a: &Node, b: &Node) {
        if self.old[a.span.clone()] == self.new[b.span.clone()] {
            let text = self.old_text(a.span.clone());
            self.ops.push(EditOp::equal(text));
            return;
        }

        let ratio = a.len().min(b.len()) as f64 / a.len().max(b.len()) as f64;
        if ratio < self.options.drastic_length_ratio {
            self.emit_gap(std::slice::from_ref(a), std::slice::from_ref(b));
            return;
        }

        match (&a.kind, &b.kind) {
            (NodeKind::Element { .. }, NodeKind::Element { .. }) => {
                self.diff_range(a.open.clone(), b.open.clone(), Granularity::Char);
                self.diff_siblings(&a.children, &b.children, a.inner(), b.inner());

                match (&a.close, &b.close) {
                    (Some(old_close), Some(new_close)) => {
                        self.diff_range(old_close.clone(), new_close.clone(), Granularity::Char);
                    }
                    (Some(old_close), None) => {
                        let text = self.old_text(old_close.clone());
                        self.ops.push(EditOp::delete(text));
                    }
                    (None, Some(new_close)) => {
                        let text = self.new_text(new_close.clone());
                        self.ops.push(EditOp::insert(text));
                    }
                    (None, None) => {}
                }
            }
            (NodeKind::Text, NodeKind::Text) => {
                self.diff_range(a.span.clone(), b.span.clone(), self.options.text_granularity);
            }
            _ => self.diff_range(a.span.clone(), b.span.clone(), Granularity::Char),
        }
    }

    /// Plain diff scoped to one old range and one new range
    fn diff_range(&mut self, old_range: Range<usize>, new_range: Range<usize>, granularity: Granularity) {
        let old_text = self.old_text(old_range);
        let new_text = self.new_text(new_range);
        self.ops.extend(diff_text(&old_text, &new_text, granularity));
    }
}

/// Size of the multiset intersection of two char slices
fn shared_chars(a: &[char], b: &[char]) -> usize {
    let mut counts = std::collections::HashMap::new();
    for ch in a {
        *counts.entry(*ch).or_insert(0usize) += 1;
    }

    b.iter()
        .filter(|ch| match counts.get_mut(ch) {
            Some(count) if *count > 0 => {
                *count -= 1;
                true
            }
            _ => false,
        })
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::{apply_script, OpKind};

    fn edits(ops: &[EditOp]) -> Vec<(OpKind, usize, &str)> {
        ops.iter()
            .filter(|op| !op.is_equal())
            .map(|op| (op.kind, op.old_start, op.text.as_str()))
            .collect()
    }

    #[test]
    fn test_inner_text_edit_stays_inside_tags() {
        let old = "<p>Hello world</p>";
        let new = "<p>Hello there world</p>";
        let ops = diff_markup(old, new, &MarkupDiffOptions::default());

        assert_eq!(edits(&ops), vec![(OpKind::Insert, 8, " there")]);
        assert_eq!(apply_script(old, &ops), new);
    }

    #[test]
    fn test_attribute_edit_is_scoped_to_open_tag() {
        let old = "<p class=\"a\">Same text</p>";
        let new = "<p class=\"b\">Same text</p>";
        let ops = diff_markup(old, new, &MarkupDiffOptions::default());

        for op in ops.iter().filter(|op| !op.is_equal()) {
            assert!(op.old_start < 13, "edit escaped the open tag: {:?}", op);
        }
        assert_eq!(apply_script(old, &ops), new);
    }

    #[test]
    fn test_inserted_element_is_a_single_insert() {
        let old = "<p>one</p><p>three</p>";
        let new = "<p>one</p><p>two</p><p>three</p>";
        let ops = diff_markup(old, new, &MarkupDiffOptions::default());

        assert_eq!(edits(&ops), vec![(OpKind::Insert, 10, "<p>two</p>")]);
    }

    #[test]
    fn test_drastic_change_replaces_element() {
        let old = "<p>a</p>";
        let new = "<p>a much longer paragraph replacing the original</p>";
        let ops = diff_markup(old, new, &MarkupDiffOptions::default());

        assert_eq!(
            edits(&ops),
            vec![(OpKind::Delete, 0, old), (OpKind::Insert, 8, new)]
        );
    }

    #[test]
    fn test_different_tags_never_match() {
        let old = "<h1>Title</h1>";
        let new = "<h2>Title</h2>";
        let ops = diff_markup(old, new, &MarkupDiffOptions::default());

        assert_eq!(
            edits(&ops),
            vec![(OpKind::Delete, 0, old), (OpKind::Insert, 14, new)]
        );
    }

    #[test]
    fn test_swapped_siblings_keep_one_pair() {
        // An ordered script has no move: one sibling stays, the other is re-inserted
        let old = "<h1>A</h1><p>body</p>";
        let new = "<p>body</p><h1>A</h1>";
        let ops = diff_markup(old, new, &MarkupDiffOptions::default());

        assert_eq!(
            edits(&ops),
            vec![(OpKind::Delete, 0, "<h1>A</h1>"), (OpKind::Insert, 21, "<h1>A</h1>")]
        );
        assert_eq!(apply_script(old, &ops), new);
    }

    #[test]
    fn test_nested_edit_recurses() {
        let old = "<div><p>first</p>\n<p>second line</p></div>";
        let new = "<div><p>first</p>\n<p>second edited line</p></div>";
        let ops = diff_markup(old, new, &MarkupDiffOptions::default());

        assert_eq!(edits(&ops), vec![(OpKind::Insert, 27, " edited")]);
        assert_eq!(apply_script(old, &ops), new);
    }

    #[test]
    fn test_empty_side_short_circuits() {
        let ops = diff_markup("", "<p>x</p>", &MarkupDiffOptions::default());
        assert_eq!(edits(&ops), vec![(OpKind::Insert, 0, "<p>x</p>")]);
    }

    #[test]
    fn test_shared_chars_counts_multiset() {
        let a: Vec<char> = "aab".chars().collect();
        let b: Vec<char> = "abb".chars().collect();
        assert_eq!(shared_chars(&a, &b), 2);
    }
}
