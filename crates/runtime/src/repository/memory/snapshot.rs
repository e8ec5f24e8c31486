//! In-memory SnapshotRepository implementation for tests and local runs.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::repository::{RepositoryError, Result, Snapshot, SnapshotRepository};

/// In-memory implementation of SnapshotRepository.
pub struct InMemorySnapshotRepo {
    snapshots: RwLock<HashMap<String, Snapshot>>,
}

impl InMemorySnapshotRepo {
    pub fn new() -> Self {
        Self {
            snapshots: RwLock::new(HashMap::new()),
        }
    }

    /// Create with a save already stored under `key`.
    pub fn with_snapshot(key: impl Into<String>, snapshot: Snapshot) -> Self {
        let mut snapshots = HashMap::new();
        snapshots.insert(key.into(), snapshot);
        Self {
            snapshots: RwLock::new(snapshots),
        }
    }
}

impl Default for InMemorySnapshotRepo {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotRepository for InMemorySnapshotRepo {
    fn save(&self, key: &str, snapshot: &Snapshot) -> Result<()> {
        let mut snapshots = self
            .snapshots
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        snapshots.insert(key.to_owned(), snapshot.clone());
        Ok(())
    }

    fn load(&self, key: &str) -> Result<Option<Snapshot>> {
        let snapshots = self
            .snapshots
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(snapshots.get(key).cloned())
    }

    fn exists(&self, key: &str) -> bool {
        self.snapshots
            .read()
            .map(|snapshots| snapshots.contains_key(key))
            .unwrap_or(false)
    }

    fn delete(&self, key: &str) -> Result<()> {
        let mut snapshots = self
            .snapshots
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        snapshots.remove(key);
        Ok(())
    }
}
