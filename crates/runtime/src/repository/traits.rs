//! Repository contracts for saving and loading session progress.

use super::error::Result;
use super::snapshot::Snapshot;

/// Repository for session snapshots, keyed by [`save_key`](super::save_key).
///
/// `load` returns `Ok(None)` both when nothing was saved and when the stored
/// payload cannot be decoded; callers start a fresh session in either case.
pub trait SnapshotRepository: Send + Sync {
    fn save(&self, key: &str, snapshot: &Snapshot) -> Result<()>;

    fn load(&self, key: &str) -> Result<Option<Snapshot>>;

    fn exists(&self, key: &str) -> bool;

    /// Removes a save. Deleting a missing key is not an error.
    fn delete(&self, key: &str) -> Result<()>;
}
