/// Number of chars in a string
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Convert a char offset to line and column
///
/// # Returns
/// Tuple of (line, column) both 0-indexed
pub fn char_offset_to_line_col(source: &str, offset: usize) -> (u32, u32) {
    let mut line = 0;
    let mut col = 0;

    for ch in source.chars().take(offset) {
        if ch == '\n' {
            line += 1;
            col = 0;
        } else {
            col += 1;
        }
    }

    (line, col)
}

/// Convert line and column to a char offset
///
/// # Returns
/// Char offset in the source, or the source's char length if out of bounds
pub fn line_col_to_char_offset(source: &str, target_line: u32, target_col: u32) -> usize {
    let mut line = 0;
    let mut col = 0;
    let mut offset = 0;

    for ch in source.chars() {
        if line == target_line && col == target_col {
            return offset;
        }

        if ch == '\n' {
            line += 1;
            col = 0;
        } else {
            col += 1;
        }
        offset += 1;
    }

    offset
}
