use serde::{Deserialize, Serialize};

/// Maximum title length in characters, counted after trimming.
pub const MAX_TITLE: usize = 120;
/// Maximum description length in characters, counted after trimming.
pub const MAX_DESC: usize = 1000;

/// A single to-do item.
///
/// Unknown fields in persisted data are ignored on load, so files written by
/// newer builds stay readable.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique, non-zero identifier assigned at creation.
    pub id: u64,
    /// Short summary of the task. Always non-empty and trimmed.
    pub title: String,
    /// Longer free-form details. May be empty.
    #[serde(default)]
    pub description: String,
    /// Whether the task has been completed.
    #[serde(default)]
    pub done: bool,
    /// Creation time in milliseconds since the Unix epoch. Never changes.
    pub created_at: i64,
    /// Last-mutation time in milliseconds since the Unix epoch.
    pub updated_at: i64,
}
