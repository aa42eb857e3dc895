//! Offset mapping between plain text and tag-delimited source
//!
//! Content edited in a rich editor is stored as markup (`<p>Hello</p>`),
//! while users and the diff engine reason about what a reader sees
//! (`Hello`). This crate builds the index that converts between the two
//! coordinate spaces for a single content string.
//!
//! All offsets are counted in `char`s, never bytes.

pub mod mapping;
pub mod utils;

pub use mapping::{Delimiters, PositionMapping};
pub use utils::{char_len, char_offset_to_line_col, line_col_to_char_offset};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_functionality() {
        let mapping = PositionMapping::build("<p>Hello world</p>");
        assert_eq!(mapping.plain_text(), "Hello world");
        assert_eq!(mapping.plain_to_source(5), 8);
    }
}
