//! Last-write-wins ordering between record versions and tombstones.
//!
//! Records compete on `last_updated`, tombstones on `deleted_at`. Between two
//! records a tie goes to the incoming one. Between a record and a tombstone a
//! tie goes to the tombstone, which keeps the merge commutative: whichever of
//! the two arrives first, the task ends up deleted.

use chrono::{DateTime, Utc};

/// An incoming record replaces the local one unless the local one is strictly newer.
pub fn record_replaces_record(local: DateTime<Utc>, incoming: DateTime<Utc>) -> bool {
    local <= incoming
}

/// An incoming record resurrects a deleted task only if written strictly after the delete.
pub fn record_replaces_tombstone(deleted_at: DateTime<Utc>, incoming: DateTime<Utc>) -> bool {
    incoming > deleted_at
}

/// An incoming tombstone removes a record written at or before the delete.
pub fn tombstone_replaces_record(local: DateTime<Utc>, deleted_at: DateTime<Utc>) -> bool {
    local <= deleted_at
}

/// Result of merging one replicated change into a store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    /// No local record or tombstone existed; the incoming record was inserted.
    Inserted,
    /// The incoming record fully replaced the local one (or a tombstone).
    Replaced,
    /// The local record is newer; nothing changed.
    IgnoredLocalNewer {
        local: DateTime<Utc>,
        incoming: DateTime<Utc>,
    },
    /// The task was deleted at or after the incoming write; nothing changed.
    IgnoredDeleted { deleted_at: DateTime<Utc> },
    /// The incoming tombstone removed the local record.
    Deleted,
    /// The incoming tombstone was recorded (nothing to remove, or an older
    /// tombstone was superseded).
    TombstoneRecorded,
}

impl MergeOutcome {
    pub fn changed_state(&self) -> bool {
        !matches!(
            self,
            MergeOutcome::IgnoredLocalNewer { .. } | MergeOutcome::IgnoredDeleted { .. }
        )
    }
}
