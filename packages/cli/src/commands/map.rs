use crate::commands::read_text;
use anyhow::{bail, Result};
use changeset_sourcemap::{char_offset_to_line_col, line_col_to_char_offset, PositionMapping};
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct MapArgs {
    /// Tag-delimited content
    pub file: PathBuf,

    /// Visible-text offsets to resolve into the source
    #[arg(short, long)]
    pub offset: Vec<usize>,

    /// Source offsets to resolve into the visible text
    #[arg(short, long)]
    pub source: Vec<usize>,

    /// Source positions as 0-indexed LINE:COL, resolved into the visible text
    #[arg(short, long, value_parser = parse_line_col)]
    pub at: Vec<(u32, u32)>,
}

pub fn map(args: MapArgs, _cwd: &str) -> Result<()> {
    let content = read_text(&args.file)?;
    let mapping = PositionMapping::build(&content);

    println!("{}", "Plain text:".bright_blue().bold());
    println!("{}", mapping.plain_text());
    println!();
    println!(
        "{} {} plain chars, {} source chars",
        "Lengths:".bright_blue().bold(),
        mapping.plain_len(),
        mapping.source_len()
    );
    if !mapping.has_markup() {
        println!("{}", "No delimited runs; offsets map to themselves".yellow());
    }

    for offset in args.offset {
        let source = mapping.plain_to_source(offset);
        let (line, col) = char_offset_to_line_col(&content, source);
        println!(
            "  plain {} → source {} ({}:{})",
            offset.to_string().green(),
            source.to_string().green(),
            line,
            col
        );
    }

    for offset in args.source {
        println!(
            "  source {} → plain {}",
            offset.to_string().green(),
            mapping.source_to_plain(offset).to_string().green()
        );
    }

    for (line, col) in args.at {
        let (source, plain) = resolve_line_col(&content, &mapping, line, col);
        println!(
            "  {}:{} → source {} → plain {}",
            line,
            col,
            source.to_string().green(),
            plain.to_string().green()
        );
    }

    Ok(())
}

/// Source char offset and visible-text offset of a source position
fn resolve_line_col(
    content: &str,
    mapping: &PositionMapping,
    line: u32,
    col: u32,
) -> (usize, usize) {
    let source = line_col_to_char_offset(content, line, col);
    (source, mapping.source_to_plain(source))
}

fn parse_line_col(value: &str) -> Result<(u32, u32)> {
    let Some((line, col)) = value.split_once(':') else {
        bail!("Expected LINE:COL, got '{}'", value);
    };
    Ok((line.trim().parse()?, col.trim().parse()?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_line_col() {
        assert_eq!(parse_line_col("2:5").unwrap(), (2, 5));
        assert!(parse_line_col("25").is_err());
        assert!(parse_line_col("a:1").is_err());
    }

    #[test]
    fn test_line_col_resolves_to_visible_offset() {
        let content = "<p>\n  Hello\n</p>";
        let mapping = PositionMapping::build(content);

        // "H" sits at line 1, column 2
        assert_eq!(resolve_line_col(content, &mapping, 1, 2), (6, 3));
    }
}
