use crate::error::{Result, TaskSyncError};
use crate::lww::{
    record_replaces_record, record_replaces_tombstone, tombstone_replaces_record, MergeOutcome,
};
use crate::types::{StoreSnapshot, Task, TaskId, Tombstone};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Records and tombstones. An id is present in at most one of the two maps.
/// Tombstones are never pruned; they live as long as the process.
#[derive(Debug, Default)]
struct StoreState {
    tasks: HashMap<TaskId, Task>,
    tombstones: HashMap<TaskId, DateTime<Utc>>,
}

/// In-memory task collection; the single source of truth on a node.
///
/// Readers share the lock, writers are exclusive, and every check-then-act
/// sequence (`update`, `delete`, `merge`) runs under a single write guard.
/// No method performs I/O while holding the lock.
#[derive(Debug, Default)]
pub struct TaskStore {
    state: RwLock<StoreState>,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, StoreState> {
        self.state.read().unwrap_or_else(|poisoned| {
            tracing::warn!("task store lock poisoned, recovering");
            PoisonError::into_inner(poisoned)
        })
    }

    fn write(&self) -> RwLockWriteGuard<'_, StoreState> {
        self.state.write().unwrap_or_else(|poisoned| {
            tracing::warn!("task store lock poisoned, recovering");
            PoisonError::into_inner(poisoned)
        })
    }

    /// Unconditional upsert: inserts, or fully replaces a record with the same id.
    pub fn create(&self, task: Task) {
        let mut state = self.write();
        state.tombstones.remove(&task.id);
        state.tasks.insert(task.id.clone(), task);
    }

    pub fn get(&self, id: &str) -> Result<Task> {
        self.read()
            .tasks
            .get(id)
            .cloned()
            .ok_or_else(|| TaskSyncError::TaskNotFound(id.to_string()))
    }

    /// Replace an existing record. The stored id is always `id`, whatever the
    /// supplied record says, and `last_updated` never moves backwards.
    pub fn update(&self, id: &str, task: Task) -> Result<Task> {
        self.update_with(id, |_| task)
    }

    /// Like [`TaskStore::update`], but the replacement is built from the
    /// stored record while the write guard is held.
    pub fn update_with<F>(&self, id: &str, build: F) -> Result<Task>
    where
        F: FnOnce(&Task) -> Task,
    {
        let mut state = self.write();
        let existing = state
            .tasks
            .get(id)
            .ok_or_else(|| TaskSyncError::TaskNotFound(id.to_string()))?;

        let mut task = build(existing);
        if task.last_updated < existing.last_updated {
            task.last_updated = existing.last_updated;
        }
        task.id = id.to_string();
        state.tasks.insert(task.id.clone(), task.clone());
        Ok(task)
    }

    /// Remove a record and leave a tombstone that outranks the removed version.
    pub fn delete(&self, id: &str) -> Result<Tombstone> {
        let mut state = self.write();
        let removed = state
            .tasks
            .remove(id)
            .ok_or_else(|| TaskSyncError::TaskNotFound(id.to_string()))?;

        let deleted_at = Utc::now().max(removed.last_updated);
        state.tombstones.insert(removed.id.clone(), deleted_at);
        Ok(Tombstone {
            id: removed.id,
            deleted_at,
        })
    }

    /// Snapshot of all live records, in no particular order.
    pub fn list(&self) -> Vec<Task> {
        self.read().tasks.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.read().tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().tasks.is_empty()
    }

    pub fn tombstone_count(&self) -> usize {
        self.read().tombstones.len()
    }

    pub fn tombstone(&self, id: &str) -> Option<Tombstone> {
        self.read().tombstones.get(id).map(|&deleted_at| Tombstone {
            id: id.to_string(),
            deleted_at,
        })
    }

    /// Apply a replicated record under last-write-wins. Lookup, comparison and
    /// upsert happen under one write guard.
    pub fn merge(&self, task: Task) -> MergeOutcome {
        let mut state = self.write();

        if let Some(local) = state.tasks.get(&task.id).map(|t| t.last_updated) {
            if !record_replaces_record(local, task.last_updated) {
                return MergeOutcome::IgnoredLocalNewer {
                    local,
                    incoming: task.last_updated,
                };
            }
            state.tasks.insert(task.id.clone(), task);
            return MergeOutcome::Replaced;
        }

        if let Some(&deleted_at) = state.tombstones.get(&task.id) {
            if !record_replaces_tombstone(deleted_at, task.last_updated) {
                return MergeOutcome::IgnoredDeleted { deleted_at };
            }
            state.tombstones.remove(&task.id);
            state.tasks.insert(task.id.clone(), task);
            return MergeOutcome::Replaced;
        }

        state.tasks.insert(task.id.clone(), task);
        MergeOutcome::Inserted
    }

    /// Apply a replicated deletion under last-write-wins.
    pub fn merge_tombstone(&self, tombstone: Tombstone) -> MergeOutcome {
        let mut state = self.write();

        if let Some(local) = state.tasks.get(&tombstone.id).map(|t| t.last_updated) {
            if !tombstone_replaces_record(local, tombstone.deleted_at) {
                return MergeOutcome::IgnoredLocalNewer {
                    local,
                    incoming: tombstone.deleted_at,
                };
            }
            state.tasks.remove(&tombstone.id);
            state.tombstones.insert(tombstone.id, tombstone.deleted_at);
            return MergeOutcome::Deleted;
        }

        if let Some(&deleted_at) = state.tombstones.get(&tombstone.id) {
            if deleted_at >= tombstone.deleted_at {
                return MergeOutcome::IgnoredDeleted { deleted_at };
            }
        }

        state.tombstones.insert(tombstone.id, tombstone.deleted_at);
        MergeOutcome::TombstoneRecorded
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        let state = self.read();
        StoreSnapshot {
            tasks: state.tasks.values().cloned().collect(),
            tombstones: state
                .tombstones
                .iter()
                .map(|(id, &deleted_at)| Tombstone {
                    id: id.clone(),
                    deleted_at,
                })
                .collect(),
        }
    }
}
