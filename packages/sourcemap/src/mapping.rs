use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::Range;

/// Characters that open and close a markup delimiter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delimiters {
    pub open: char,
    pub close: char,
}

impl Default for Delimiters {
    fn default() -> Self {
        Self {
            open: '<',
            close: '>',
        }
    }
}

/// Bidirectional offset index for one content string
///
/// Every visible character (one outside a delimiter) gets an entry in both
/// tables, plus one boundary entry pairing the plain length with the source
/// length so that append-at-end lookups resolve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionMapping {
    plain_text: String,
    /// Indexed by plain offset; always `plain_len + 1` entries long.
    plain_to_source: Vec<usize>,
    source_to_plain: BTreeMap<usize, usize>,
    source_len: usize,
}

impl PositionMapping {
    /// Build a mapping using the default `<` / `>` delimiters
    pub fn build(source: &str) -> Self {
        Self::build_with(source, Delimiters::default())
    }

    /// Build a mapping with custom delimiters
    ///
    /// A close character seen outside a delimiter is ordinary text, and an
    /// unterminated open delimiter hides the rest of the source.
    pub fn build_with(source: &str, delimiters: Delimiters) -> Self {
        let mut plain_text = String::with_capacity(source.len());
        let mut plain_to_source = Vec::new();
        let mut source_to_plain = BTreeMap::new();
        let mut inside = false;
        let mut source_len = 0;

        for (source_index, ch) in source.chars().enumerate() {
            source_len = source_index + 1;

            if inside {
                if ch == delimiters.close {
                    inside = false;
                }
                continue;
            }

            if ch == delimiters.open {
                inside = true;
                continue;
            }

            let plain_index = plain_to_source.len();
            plain_to_source.push(source_index);
            source_to_plain.insert(source_index, plain_index);
            plain_text.push(ch);
        }

        let plain_len = plain_to_source.len();
        plain_to_source.push(source_len);
        source_to_plain.insert(source_len, plain_len);

        Self {
            plain_text,
            plain_to_source,
            source_to_plain,
            source_len,
        }
    }

    /// The visible text, with every delimited run removed
    pub fn plain_text(&self) -> &str {
        &self.plain_text
    }

    /// Length of the plain text in chars
    pub fn plain_len(&self) -> usize {
        self.plain_to_source.len() - 1
    }

    /// Length of the source in chars
    pub fn source_len(&self) -> usize {
        self.source_len
    }

    /// Resolve a plain offset to a source offset
    ///
    /// Offsets past the plain text extend from the end boundary and are
    /// clamped to the source length.
    pub fn plain_to_source(&self, plain: usize) -> usize {
        if let Some(&source) = self.plain_to_source.get(plain) {
            return source;
        }

        let last = self.plain_len();
        let residual = plain - last;
        (self.plain_to_source[last] + residual).min(self.source_len)
    }

    /// Resolve a source offset to a plain offset
    ///
    /// An offset inside a delimiter resolves to the plain offset of the next
    /// visible character.
    pub fn source_to_plain(&self, source: usize) -> usize {
        if let Some(&plain) = self.source_to_plain.get(&source) {
            return plain;
        }

        let Some((&before_source, &before_plain)) = self.source_to_plain.range(..source).next_back()
        else {
            return 0;
        };

        let candidate = before_plain + (source - before_source);
        let ceiling = self
            .source_to_plain
            .range(source..)
            .next()
            .map(|(_, &plain)| plain)
            .unwrap_or(self.plain_len());

        candidate.min(ceiling).min(self.plain_len())
    }

    /// Resolve a plain `[start, start + len)` span to a source `(start, len)`
    ///
    /// The span ends right after its last visible char, so delimiters that
    /// follow it are left out. Delimiters between its chars are inside.
    pub fn plain_range_to_source(&self, start: usize, len: usize) -> (usize, usize) {
        let source_start = self.plain_to_source(start);
        let plain_len = self.plain_len();
        if len == 0 || start >= plain_len {
            return (source_start, 0);
        }

        let last = start.saturating_add(len - 1).min(plain_len - 1);
        let source_end = self.plain_to_source[last] + 1;
        (source_start, source_end.saturating_sub(source_start))
    }

    /// Source spans holding the visible chars of a plain range, one per
    /// stretch not interrupted by a delimiter
    pub fn source_runs(&self, plain: Range<usize>) -> Vec<Range<usize>> {
        let end = plain.end.min(self.plain_len());
        let mut runs: Vec<Range<usize>> = Vec::new();

        for index in plain.start..end {
            let source = self.plain_to_source[index];
            match runs.last_mut() {
                Some(run) if run.end == source => run.end += 1,
                _ => runs.push(source..source + 1),
            }
        }

        runs
    }

    /// Maximal delimited stretches of the source, each paired with the plain
    /// offset of the visible char that follows it
    pub fn hidden_runs(&self) -> Vec<(usize, Range<usize>)> {
        let mut runs = Vec::new();
        let mut visible_end = 0;

        for (plain, &source) in self.plain_to_source.iter().enumerate() {
            if source > visible_end {
                runs.push((plain, visible_end..source));
            }
            visible_end = source + 1;
        }

        runs
    }

    /// Whether the source contains any delimited runs
    pub fn has_markup(&self) -> bool {
        self.plain_len() != self.source_len
    }
}
