//! Mission list loader.

use std::path::Path;

use merge_core::Mission;
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Mission list structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MissionFile {
    pub missions: Vec<Mission>,
}

/// Loader for mission lists from RON files.
///
/// Unplayable entries (zero moves or zero target) are rejected outright
/// rather than silently skipped.
pub struct MissionLoader;

impl MissionLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<Mission>> {
        let content = read_file(path)?;
        let file: MissionFile = ron::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse mission RON: {}", e))?;

        if let Some(bad) = file.missions.iter().find(|m| !m.is_playable()) {
            anyhow::bail!("mission '{}' is not playable", bad.id);
        }
        Ok(file.missions)
    }
}

#[cfg(test)]
mod tests {
    use merge_core::{Difficulty, ItemKind};

    use super::*;
    use crate::loaders::test_support::write_temp;

    #[test]
    fn loads_missions() {
        let file = write_temp(
            r#"(
    missions: [
        (
            id: "m1",
            name: "Dragon Peak",
            energy_cost: 6,
            target_score: 9000,
            moves: 30,
            reward: wood,
            difficulty: legendary,
            color: "red",
        ),
    ],
)"#,
        );

        let missions = MissionLoader::load(file.path()).expect("missions load");
        assert_eq!(missions[0].reward, ItemKind::Wood);
        assert_eq!(missions[0].difficulty, Difficulty::Legendary);
        assert_eq!(missions[0].description, None);
    }

    #[test]
    fn zero_moves_is_rejected() {
        let file = write_temp(
            r#"(missions: [(id: "m", name: "M", energy_cost: 1, target_score: 10,
                moves: 0, reward: crop, difficulty: easy)])"#,
        );

        let err = MissionLoader::load(file.path()).unwrap_err();
        assert!(err.to_string().contains("'m' is not playable"));
    }
}
