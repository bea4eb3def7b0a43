use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Task identifier. Opaque to the store; the front-end assigns UUIDv4 strings.
pub type TaskId = String;

/// Lifecycle tag of a task.
///
/// The well-known values are `pending`, `in-progress` and `completed`. Any other
/// string is kept verbatim in [`TaskStatus::Other`] so that peers running a
/// newer vocabulary never have their records rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
    Other(String),
}

impl TaskStatus {
    pub fn as_str(&self) -> &str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in-progress",
            TaskStatus::Completed => "completed",
            TaskStatus::Other(s) => s,
        }
    }
}

impl From<String> for TaskStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "pending" => TaskStatus::Pending,
            "in-progress" => TaskStatus::InProgress,
            "completed" => TaskStatus::Completed,
            _ => TaskStatus::Other(s),
        }
    }
}

impl From<TaskStatus> for String {
    fn from(status: TaskStatus) -> Self {
        match status {
            TaskStatus::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

/// A task record: the unit of storage and replication.
///
/// `last_updated` is the version marker used by last-write-wins merge. Every
/// local mutation must refresh it before the record is stored or broadcast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub assigned_user_id: String,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    pub last_updated: DateTime<Utc>,
}

impl Task {
    /// Build a brand new task from client input: fresh UUIDv4 id, `pending`
    /// status, `last_updated` set to now.
    pub fn from_draft(draft: TaskDraft) -> Self {
        Task {
            id: uuid::Uuid::new_v4().to_string(),
            title: draft.title,
            description: draft.description,
            status: TaskStatus::Pending,
            priority: draft.priority,
            assigned_user_id: draft.assigned_user_id,
            due_date: draft.due_date,
            last_updated: Utc::now(),
        }
    }

    /// Full replacement of the client-editable fields of `existing`.
    /// A draft without a status keeps the stored one.
    pub fn replaced_by(existing: &Task, draft: TaskDraft) -> Self {
        Task {
            id: existing.id.clone(),
            title: draft.title,
            description: draft.description,
            status: draft.status.unwrap_or_else(|| existing.status.clone()),
            priority: draft.priority,
            assigned_user_id: draft.assigned_user_id,
            due_date: draft.due_date,
            last_updated: Utc::now(),
        }
    }
}

/// Client-supplied body for create and update requests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDraft {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: Option<TaskStatus>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub assigned_user_id: String,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
}

/// Deletion marker. Competes with records under the same last-write-wins rule
/// so that a deleted task does not come back when a stale copy is re-synced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tombstone {
    pub id: TaskId,
    pub deleted_at: DateTime<Utc>,
}

/// Point-in-time copy of a store, used for peer catch-up.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreSnapshot {
    pub tasks: Vec<Task>,
    pub tombstones: Vec<Tombstone>,
}
