mod commands;
mod config;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{apply, diff, init, map, validate, ApplyArgs, DiffArgs, InitArgs, MapArgs, ValidateArgs};
use tracing_subscriber::EnvFilter;

/// Changeset CLI - diff, validate and apply position-addressed text changes
#[derive(Parser, Debug)]
#[command(name = "changeset")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a default changeset.config.json
    Init(InitArgs),

    /// Derive an optimized change list between two texts
    Diff(DiffArgs),

    /// Apply a change list to a text
    Apply(ApplyArgs),

    /// Show how visible-text offsets map into tag-delimited content
    Map(MapArgs),

    /// Check a change list against the text it targets
    Validate(ValidateArgs),
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let cwd = std::env::current_dir()
        .map(|dir| dir.display().to_string())
        .unwrap_or_else(|_| ".".to_string());

    let result = match cli.command {
        Command::Init(args) => init(args, &cwd),
        Command::Diff(args) => diff(args, &cwd),
        Command::Apply(args) => apply(args, &cwd),
        Command::Map(args) => map(args, &cwd),
        Command::Validate(args) => validate(args, &cwd),
    };

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {:#}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
