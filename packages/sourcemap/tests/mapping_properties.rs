//! Property tests for the plain/source offset index

use changeset_sourcemap::PositionMapping;
use proptest::prelude::*;

fn markup() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            "[a-zA-Z ]{0,6}",
            Just("<p>".to_string()),
            Just("</p>".to_string()),
            Just("<b class=\"x\">".to_string()),
            Just("</b>".to_string()),
            Just("<br/>".to_string()),
            "[é日 ]{0,3}",
        ],
        0..12,
    )
    .prop_map(|parts| parts.concat())
}

proptest! {
    #[test]
    fn plain_offsets_survive_a_source_roundtrip(source in markup()) {
        let mapping = PositionMapping::build(&source);
        for i in 0..=mapping.plain_len() {
            prop_assert_eq!(mapping.source_to_plain(mapping.plain_to_source(i)), i);
        }
    }

    #[test]
    fn lookups_stay_in_range(source in markup(), offset in 0usize..200) {
        let mapping = PositionMapping::build(&source);
        prop_assert!(mapping.plain_to_source(offset) <= mapping.source_len());
        prop_assert!(mapping.source_to_plain(offset) <= mapping.plain_len());
    }

    #[test]
    fn source_to_plain_is_monotone(source in markup()) {
        let mapping = PositionMapping::build(&source);
        let mut previous = 0;
        for s in 0..=mapping.source_len() {
            let plain = mapping.source_to_plain(s);
            prop_assert!(plain >= previous);
            previous = plain;
        }
    }

    #[test]
    fn source_runs_hold_exactly_the_visible_chars(source in markup(), start in 0usize..40, len in 0usize..40) {
        let mapping = PositionMapping::build(&source);
        let chars: Vec<char> = source.chars().collect();

        let from_runs: String = mapping
            .source_runs(start..start + len)
            .into_iter()
            .flat_map(|run| chars[run].to_vec())
            .collect();
        let expected: String = mapping.plain_text().chars().skip(start).take(len).collect();
        prop_assert_eq!(from_runs, expected);
    }

    #[test]
    fn hidden_runs_and_plain_text_tile_the_source(source in markup()) {
        let mapping = PositionMapping::build(&source);
        let hidden: usize = mapping.hidden_runs().iter().map(|(_, run)| run.len()).sum();
        prop_assert_eq!(hidden + mapping.plain_len(), mapping.source_len());
    }
}
