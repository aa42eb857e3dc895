use changeset_diff::MarkupDiffOptions;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How the content field is compared against its baseline
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentMode {
    /// Compare visible text word by word between the delimited runs both
    /// sides share, and map offsets back into the baseline source. Edits
    /// that only touch delimited runs are invisible.
    #[default]
    Plain,
    /// Element-aware diff of the raw source
    Markup,
}

/// Which pending changes a commit sends
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommitMode {
    #[default]
    Selected,
    All,
}

/// Live tracking settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackerConfig {
    /// Quiet period after an edit before the field is re-diffed
    #[serde(default = "default_edit_debounce_ms")]
    pub edit_debounce_ms: u64,

    /// Quiet period for search-style triggers layered on top
    #[serde(default = "default_search_debounce_ms")]
    pub search_debounce_ms: u64,

    /// Abandon a recompute when the length difference exceeds this share
    /// of the longer text
    #[serde(default = "default_max_length_delta_ratio")]
    pub max_length_delta_ratio: f64,

    /// Abandon a recompute when the edit script has more non-equal ops
    #[serde(default = "default_max_script_operations")]
    pub max_script_operations: usize,

    /// Abandon a recompute when it derives more changes
    #[serde(default = "default_max_changes")]
    pub max_changes: usize,

    /// Stop a word diff once more than this many words would have to be
    /// inserted or deleted
    #[serde(default = "default_max_edit_distance")]
    pub max_edit_distance: usize,

    #[serde(default)]
    pub content_mode: ContentMode,

    #[serde(default)]
    pub commit_mode: CommitMode,

    #[serde(default)]
    pub markup: MarkupDiffOptions,
}

fn default_edit_debounce_ms() -> u64 {
    300
}

fn default_search_debounce_ms() -> u64 {
    500
}

fn default_max_length_delta_ratio() -> f64 {
    0.8
}

fn default_max_script_operations() -> usize {
    50
}

fn default_max_changes() -> usize {
    20
}

fn default_max_edit_distance() -> usize {
    1000
}

impl TrackerConfig {
    pub fn edit_debounce(&self) -> Duration {
        Duration::from_millis(self.edit_debounce_ms)
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            edit_debounce_ms: default_edit_debounce_ms(),
            search_debounce_ms: default_search_debounce_ms(),
            max_length_delta_ratio: default_max_length_delta_ratio(),
            max_script_operations: default_max_script_operations(),
            max_changes: default_max_changes(),
            max_edit_distance: default_max_edit_distance(),
            content_mode: ContentMode::default(),
            commit_mode: CommitMode::default(),
            markup: MarkupDiffOptions::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_partial_config() {
        let json = r#"{
            "editDebounceMs": 150,
            "contentMode": "markup",
            "markup": { "matchThreshold": 0.7 }
        }"#;

        let config: TrackerConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.edit_debounce(), Duration::from_millis(150));
        assert_eq!(config.search_debounce(), Duration::from_millis(500));
        assert_eq!(config.content_mode, ContentMode::Markup);
        assert_eq!(config.commit_mode, CommitMode::Selected);
        assert_eq!(config.markup.match_threshold, 0.7);
        assert_eq!(config.markup.drastic_length_ratio, 0.3);
    }

    #[test]
    fn test_default_config() {
        let config = TrackerConfig::default();
        assert_eq!(config.edit_debounce_ms, 300);
        assert_eq!(config.max_length_delta_ratio, 0.8);
        assert_eq!(config.max_script_operations, 50);
        assert_eq!(config.max_changes, 20);
        assert_eq!(config.max_edit_distance, 1000);
        assert_eq!(config.content_mode, ContentMode::Plain);
    }
}
