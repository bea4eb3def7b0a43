//! # tasksync
//!
//! The node-local half of a replicated task tracker: the task record model, a
//! thread-safe in-memory [`TaskStore`], and the last-write-wins rules used to
//! merge records and deletions that arrive from peer nodes.
//!
//! Peer fan-out and the receiving side live in `tasksync-replication`; the
//! REST front-end in `tasksync-http`; the runnable node in `tasksync-server`.
//!
//! ```rust
//! use tasksync::{Task, TaskDraft, TaskStore};
//!
//! # fn main() -> tasksync::Result<()> {
//! let store = TaskStore::new();
//! let task = Task::from_draft(TaskDraft {
//!     title: "Write report".to_string(),
//!     ..Default::default()
//! });
//! let id = task.id.clone();
//! store.create(task);
//!
//! assert_eq!(store.get(&id)?.title, "Write report");
//! # Ok(())
//! # }
//! ```
//!
//! ## Feature flags
//!
//! | Feature | Dependencies | Use case |
//! |---------|-------------|----------|
//! | `axum-support` | axum | [`TaskSyncError`] implements `IntoResponse` |

pub mod error;
pub mod lww;
pub mod store;
pub mod types;

pub use error::{Result, TaskSyncError};
pub use lww::MergeOutcome;
pub use store::TaskStore;
pub use types::*;
