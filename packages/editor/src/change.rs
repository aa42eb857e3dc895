//! # Change Model
//!
//! Two representations of one edit operation:
//!
//! - [`ChangeRecord`] is the wire form found in a patch request body. Its
//!   offsets are signed and its fields optional, so a malformed request can
//!   still be deserialized and then reported on rule by rule.
//! - [`Change`] is the typed form. It only comes out of validation (or the
//!   diff engine) and is always structurally sound.
//!
//! All positions and lengths are char offsets into the text of the change's
//! field, expressed in the coordinates of the original (pre-patch) text.

use crate::validation::{check_record, Violation};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which part of a document a change targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Title,
    Content,
}

impl Field {
    pub const ALL: [Field; 2] = [Field::Title, Field::Content];

    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "title" => Some(Field::Title),
            "content" => Some(Field::Content),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Content => "content",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Insert,
    Delete,
    Replace,
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ChangeKind::Insert => "insert",
            ChangeKind::Delete => "delete",
            ChangeKind::Replace => "replace",
        })
    }
}

/// Change as it appears in a request body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeRecord {
    #[serde(rename = "type")]
    pub kind: ChangeKind,
    pub position: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    pub field: String,
}

/// A structurally valid edit operation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "ChangeRecord", try_from = "ChangeRecord")]
pub enum Change {
    Insert {
        field: Field,
        position: usize,
        text: String,
    },
    Delete {
        field: Field,
        position: usize,
        length: usize,
    },
    Replace {
        field: Field,
        position: usize,
        length: usize,
        text: String,
    },
}

impl Change {
    pub fn insert(field: Field, position: usize, text: impl Into<String>) -> Self {
        Change::Insert {
            field,
            position,
            text: text.into(),
        }
    }

    pub fn delete(field: Field, position: usize, length: usize) -> Self {
        Change::Delete {
            field,
            position,
            length,
        }
    }

    pub fn replace(field: Field, position: usize, length: usize, text: impl Into<String>) -> Self {
        Change::Replace {
            field,
            position,
            length,
            text: text.into(),
        }
    }

    pub fn kind(&self) -> ChangeKind {
        match self {
            Change::Insert { .. } => ChangeKind::Insert,
            Change::Delete { .. } => ChangeKind::Delete,
            Change::Replace { .. } => ChangeKind::Replace,
        }
    }

    pub fn field(&self) -> Field {
        match self {
            Change::Insert { field, .. }
            | Change::Delete { field, .. }
            | Change::Replace { field, .. } => *field,
        }
    }

    pub fn position(&self) -> usize {
        match self {
            Change::Insert { position, .. }
            | Change::Delete { position, .. }
            | Change::Replace { position, .. } => *position,
        }
    }

    /// Number of original chars the change removes (zero for inserts)
    pub fn length(&self) -> usize {
        match self {
            Change::Insert { .. } => 0,
            Change::Delete { length, .. } | Change::Replace { length, .. } => *length,
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            Change::Insert { text, .. } | Change::Replace { text, .. } => Some(text),
            Change::Delete { .. } => None,
        }
    }

    /// Same change anchored at a different position
    pub fn with_position(mut self, new_position: usize) -> Self {
        match &mut self {
            Change::Insert { position, .. }
            | Change::Delete { position, .. }
            | Change::Replace { position, .. } => *position = new_position,
        }
        self
    }

    /// Same change removing a different number of chars
    ///
    /// Inserts have nothing to remove and are returned unchanged.
    pub fn with_length(mut self, new_length: usize) -> Self {
        match &mut self {
            Change::Delete { length, .. } | Change::Replace { length, .. } => *length = new_length,
            Change::Insert { .. } => {}
        }
        self
    }

    pub fn to_record(&self) -> ChangeRecord {
        ChangeRecord {
            kind: self.kind(),
            position: to_wire(self.position()),
            length: match self {
                Change::Insert { .. } => None,
                _ => Some(to_wire(self.length())),
            },
            text: self.text().map(str::to_string),
            field: self.field().as_str().to_string(),
        }
    }
}

fn to_wire(offset: usize) -> i64 {
    i64::try_from(offset).unwrap_or(i64::MAX)
}

impl From<Change> for ChangeRecord {
    fn from(change: Change) -> Self {
        change.to_record()
    }
}

impl TryFrom<ChangeRecord> for Change {
    type Error = Violation;

    /// Structural conversion only; bounds against a text are checked by
    /// [`crate::validate`].
    fn try_from(record: ChangeRecord) -> Result<Self, Self::Error> {
        if let Some(violation) = check_record(&record, None).into_iter().next() {
            return Err(violation);
        }

        let field = Field::parse(&record.field).ok_or_else(|| Violation::InvalidField(record.field.clone()))?;
        let position = usize::try_from(record.position).map_err(|_| Violation::NegativePosition(record.position))?;
        let length = record.length.unwrap_or(0).max(0) as usize;

        Ok(match (record.kind, record.text) {
            (ChangeKind::Insert, Some(text)) => Change::insert(field, position, text),
            (ChangeKind::Delete, _) => Change::delete(field, position, length),
            (ChangeKind::Replace, Some(text)) => Change::replace(field, position, length, text),
            (kind, None) => return Err(Violation::MissingText(kind)),
        })
    }
}

impl fmt::Display for Change {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Change::Insert { field, position, text } => {
                write!(f, "{}: insert {:?} at {}", field, text, position)
            }
            Change::Delete { field, position, length } => {
                write!(f, "{}: delete {} at {}", field, length, position)
            }
            Change::Replace {
                field,
                position,
                length,
                text,
            } => write!(f, "{}: replace {} at {} with {:?}", field, length, position, text),
        }
    }
}

/// The title and content of a document at one point in time
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub title: String,
    pub content: String,
}

impl Snapshot {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }

    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Title => &self.title,
            Field::Content => &self.content,
        }
    }

    pub fn set(&mut self, field: Field, value: String) {
        match field {
            Field::Title => self.title = value,
            Field::Content => self.content = value,
        }
    }
}

/// A change produced by a diff pass, awaiting commit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackedChange {
    pub id: String,
    pub change: Change,
    pub timestamp: DateTime<Utc>,
    /// Only selected changes are sent by a selective commit
    pub selected: bool,
    pub applied: bool,
}

impl TrackedChange {
    pub fn new(id: String, change: Change) -> Self {
        Self {
            id,
            change,
            timestamp: Utc::now(),
            selected: true,
            applied: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestMetadata {
    pub description: String,
    pub timestamp: DateTime<Utc>,
}

/// Body of a patch request
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChangeRequest {
    pub changes: Vec<ChangeRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<RequestMetadata>,
}

impl ChangeRequest {
    pub fn from_changes(changes: &[Change]) -> Self {
        Self {
            changes: changes.iter().map(Change::to_record).collect(),
            metadata: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.metadata = Some(RequestMetadata {
            description: description.into(),
            timestamp: Utc::now(),
        });
        self
    }
}
