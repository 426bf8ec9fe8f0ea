use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Which slice of the collection `TodoStore::visible` projects.
/// Session-local only; never part of the persisted payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Filter {
    All,
    Active,
    Completed,
}

impl Default for Filter {
    fn default() -> Self {
        Filter::All
    }
}

impl Filter {
    /// Whether a task passes this filter.
    pub fn keeps(&self, task: &Task) -> bool {
        match self {
            Filter::All => true,
            Filter::Active => !task.completed,
            Filter::Completed => task.completed,
        }
    }
}

/// Task entity. Field names serialize as camelCase and `description` is
/// omitted when absent, so the payload stays byte-compatible with slots
/// written by earlier versions of the app.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub completed: bool,
    /// Creation time in milliseconds since the epoch. Immutable.
    pub created_at: i64,
}

impl Task {
    pub fn new(title: String, description: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title,
            description,
            completed: false,
            created_at: Utc::now().timestamp_millis(),
        }
    }
}

/// Per-filter totals over the full (unfiltered) collection, for the
/// filter-selection UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Counts {
    pub total: usize,
    pub active: usize,
    pub completed: usize,
}
