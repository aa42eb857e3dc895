pub mod apply;
pub mod diff;
pub mod init;
pub mod map;
pub mod validate;

pub use apply::{apply, ApplyArgs};
pub use diff::{diff, DiffArgs};
pub use init::{init, InitArgs};
pub use map::{map, MapArgs};
pub use validate::{validate, ValidateArgs};

use anyhow::{Context, Result};
use changeset_diff::Granularity;
use changeset_editor::{ChangeRecord, ChangeRequest, Field};
use clap::ValueEnum;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum GranularityArg {
    Char,
    Word,
    Markup,
}

impl From<GranularityArg> for Granularity {
    fn from(arg: GranularityArg) -> Self {
        match arg {
            GranularityArg::Char => Granularity::Char,
            GranularityArg::Word => Granularity::Word,
            GranularityArg::Markup => Granularity::Markup,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum FieldArg {
    Title,
    Content,
}

impl From<FieldArg> for Field {
    fn from(arg: FieldArg) -> Self {
        match arg {
            FieldArg::Title => Field::Title,
            FieldArg::Content => Field::Content,
        }
    }
}

pub(crate) fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Cannot read {}", path.display()))
}

/// Read a change request, or a bare array of change records
pub(crate) fn read_request(path: &Path) -> Result<ChangeRequest> {
    let content = read_text(path)?;

    if let Ok(request) = serde_json::from_str::<ChangeRequest>(&content) {
        return Ok(request);
    }

    let changes: Vec<ChangeRecord> = serde_json::from_str(&content)
        .with_context(|| format!("{} is neither a change request nor a change list", path.display()))?;
    Ok(ChangeRequest {
        changes,
        metadata: None,
    })
}
