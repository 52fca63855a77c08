//! Record snapshot types shared across the memory subsystem.
//!
//! The record store owns the authoritative schema; these types are the
//! minimal snapshot the memory subsystem reads when composing indexable
//! content and resolving search hits back to something presentable.

use serde::{Deserialize, Serialize};

/// Identifier of a record in the external record store.
///
/// The vector index holds these as weak, foreign-key-style references: an id
/// plus a vector, never a copy of record content. The store remains the
/// single source of truth for record existence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub i64);

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for RecordId {
    fn from(value: i64) -> Self {
        RecordId(value)
    }
}

/// Lifecycle status of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordStatus {
    /// Not started.
    Pending,
    /// Currently being worked on.
    InProgress,
    /// Finished.
    Completed,
    /// Old or inactive.
    Archived,
}

impl RecordStatus {
    /// All status values, in lifecycle order.
    pub const ALL: [RecordStatus; 4] = [
        RecordStatus::Pending,
        RecordStatus::InProgress,
        RecordStatus::Completed,
        RecordStatus::Archived,
    ];
}

impl std::fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RecordStatus::Pending => "pending",
            RecordStatus::InProgress => "in_progress",
            RecordStatus::Completed => "completed",
            RecordStatus::Archived => "archived",
        };
        f.write_str(s)
    }
}

/// A snapshot of a record as read from the record store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskRecord {
    /// Identifier assigned by the record store.
    pub id: RecordId,
    /// Short title of the task.
    pub title: String,
    /// Longer free-text description, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Free-form tags attached to the record.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Current lifecycle status.
    pub status: RecordStatus,
}
