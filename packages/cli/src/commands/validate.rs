use crate::commands::{read_request, read_text};
use anyhow::{anyhow, Result};
use changeset_editor::{validate as validate_changes, Snapshot};
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Content the changes were made against
    pub original: PathBuf,

    /// Change request or change list (JSON)
    pub changes: PathBuf,

    /// Title the title-field changes are checked against
    #[arg(long, default_value = "")]
    pub title: String,
}

pub fn validate(args: ValidateArgs, _cwd: &str) -> Result<()> {
    let original = Snapshot::new(args.title, read_text(&args.original)?);
    let request = read_request(&args.changes)?;

    let issues = validate_changes(&original, &request.changes);

    if issues.is_empty() {
        println!(
            "{} {} changes are valid",
            "✓".green(),
            request.changes.len()
        );
        return Ok(());
    }

    for issue in &issues {
        println!("  {} {}", "✗".red(), issue);
    }

    Err(anyhow!(
        "{} of {} changes are invalid",
        count_records(&issues),
        request.changes.len()
    ))
}

fn count_records(issues: &[changeset_editor::ValidationIssue]) -> usize {
    let mut indexes: Vec<usize> = issues.iter().map(|issue| issue.index).collect();
    indexes.dedup();
    indexes.len()
}
