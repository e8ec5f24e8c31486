//! File-based SnapshotRepository implementation.

use std::fs;
use std::path::{Path, PathBuf};

use crate::repository::{RepositoryError, Result, Snapshot, SnapshotRepository};

/// Stores each save as `{key}.json` under a base directory.
///
/// Writes go to a temp file first and are renamed into place, so a crash
/// mid-write leaves the previous save intact.
pub struct FileSnapshotRepository {
    base_dir: PathBuf,
}

impl FileSnapshotRepository {
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_dir).map_err(RepositoryError::Io)?;
        Ok(Self { base_dir })
    }

    /// Platform data directory for saves, if the platform has one.
    pub fn default_dir() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "merge-kingdom")
            .map(|dirs| dirs.data_dir().join("saves"))
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn snapshot_path(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(RepositoryError::InvalidKey(key.to_owned()));
        }
        Ok(self.base_dir.join(format!("{key}.json")))
    }
}

impl SnapshotRepository for FileSnapshotRepository {
    fn save(&self, key: &str, snapshot: &Snapshot) -> Result<()> {
        let path = self.snapshot_path(key)?;
        let temp_path = path.with_extension("json.tmp");

        let bytes =
            serde_json::to_vec(snapshot).map_err(|e| RepositoryError::Json(e.to_string()))?;

        fs::write(&temp_path, bytes).map_err(RepositoryError::Io)?;
        fs::rename(&temp_path, &path).map_err(RepositoryError::Io)?;

        tracing::debug!("Saved snapshot {} to {}", key, path.display());

        Ok(())
    }

    fn load(&self, key: &str) -> Result<Option<Snapshot>> {
        let path = self.snapshot_path(key)?;

        if !path.exists() {
            return Ok(None);
        }

        let bytes = fs::read(&path).map_err(RepositoryError::Io)?;
        match serde_json::from_slice::<Snapshot>(&bytes) {
            Ok(snapshot) => {
                tracing::debug!("Loaded snapshot {} from {}", key, path.display());
                Ok(Some(snapshot))
            }
            Err(error) => {
                tracing::warn!(
                    path = %path.display(),
                    %error,
                    "Ignoring unreadable snapshot"
                );
                Ok(None)
            }
        }
    }

    fn exists(&self, key: &str) -> bool {
        self.snapshot_path(key).is_ok_and(|path| path.exists())
    }

    fn delete(&self, key: &str) -> Result<()> {
        let path = self.snapshot_path(key)?;

        if path.exists() {
            fs::remove_file(&path).map_err(RepositoryError::Io)?;
            tracing::debug!("Deleted snapshot {}", key);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use merge_core::{GameConfig, GameState, ItemKind};

    use super::*;

    fn snapshot() -> Snapshot {
        let mut state = GameState::new(7, &GameConfig::default(), merge_content::default_parcels(), Vec::new());
        state.player.gold = 1_234;
        let mut engine = merge_core::GameEngine::new(&mut state);
        let oracles = crate::oracle::OracleManager::default();
        engine
            .execute(oracles.as_game_env(), &merge_core::Action::spawn(ItemKind::Stone, 2))
            .expect("spawn succeeds");
        Snapshot::capture(&state)
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().expect("temp dir");
        let repo = FileSnapshotRepository::new(dir.path()).expect("repo");
        let saved = snapshot();

        repo.save("save_alice", &saved).expect("save");
        assert!(repo.exists("save_alice"));
        assert!(!dir.path().join("save_alice.json.tmp").exists());

        let loaded = repo.load("save_alice").expect("load");
        assert_eq!(loaded, Some(saved));
    }

    #[test]
    fn missing_save_is_none() {
        let dir = tempfile::tempdir().expect("temp dir");
        let repo = FileSnapshotRepository::new(dir.path()).expect("repo");
        assert_eq!(repo.load("save_nobody").expect("load"), None);
        repo.delete("save_nobody").expect("deleting nothing is fine");
    }

    #[test]
    fn corrupt_save_is_none() {
        let dir = tempfile::tempdir().expect("temp dir");
        let repo = FileSnapshotRepository::new(dir.path()).expect("repo");
        fs::write(dir.path().join("save_bob.json"), b"{\"player\": 12").expect("write");

        assert_eq!(repo.load("save_bob").expect("load"), None);
    }

    #[test]
    fn path_like_keys_are_rejected() {
        let dir = tempfile::tempdir().expect("temp dir");
        let repo = FileSnapshotRepository::new(dir.path()).expect("repo");
        let err = repo.load("../escape").unwrap_err();
        assert!(matches!(err, RepositoryError::InvalidKey(_)));
    }
}
