use crate::commands::{read_text, FieldArg, GranularityArg};
use crate::config::Config;
use anyhow::Result;
use changeset_diff::{diff as diff_script, script_stats};
use changeset_editor::{changes_from_script, optimize_with_report, Change, ChangeRequest};
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct DiffArgs {
    /// Original text
    pub old: PathBuf,

    /// Edited text
    pub new: PathBuf,

    /// Unit of comparison (overrides config)
    #[arg(short, long, value_enum)]
    pub granularity: Option<GranularityArg>,

    /// Field the changes target
    #[arg(short, long, value_enum, default_value = "content")]
    pub field: FieldArg,

    /// Print the change request as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DiffOutput {
    request: ChangeRequest,
    raw: usize,
    optimized: usize,
}

pub fn diff(args: DiffArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let mut options = config.diff;
    if let Some(granularity) = args.granularity {
        options.granularity = granularity.into();
    }

    let old = read_text(&args.old)?;
    let new = read_text(&args.new)?;

    let script = diff_script(&old, &new, &options);
    let stats = script_stats(&script);
    let changes = changes_from_script(&script, args.field.into());
    let (optimized, report) = optimize_with_report(&changes);
    tracing::debug!(operations = stats.operations, raw = report.raw, optimized = report.optimized, "diffed");

    let request = ChangeRequest::from_changes(&optimized).with_description(format!(
        "{} changes consolidated into {}",
        report.raw, report.optimized
    ));

    if args.json {
        let output = DiffOutput {
            request,
            raw: report.raw,
            optimized: report.optimized,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if optimized.is_empty() {
        println!("{}", "✓ No differences".green());
        return Ok(());
    }

    for change in &optimized {
        println!("  {}", describe(change));
    }

    println!();
    println!(
        "{} {} raw → {} optimized ({} inserted, {} deleted chars)",
        "Changes:".bright_blue().bold(),
        report.raw,
        report.optimized,
        stats.inserted_chars,
        stats.deleted_chars
    );

    Ok(())
}

fn describe(change: &Change) -> String {
    match change {
        Change::Insert { position, text, .. } => {
            format!("{} {:>6}  {}", "+".green(), position, format!("{:?}", text).green())
        }
        Change::Delete { position, length, .. } => {
            format!("{} {:>6}  {} chars", "-".red(), position, length.to_string().red())
        }
        Change::Replace {
            position,
            length,
            text,
            ..
        } => format!(
            "{} {:>6}  {} chars → {}",
            "~".yellow(),
            position,
            length.to_string().red(),
            format!("{:?}", text).green()
        ),
    }
}
