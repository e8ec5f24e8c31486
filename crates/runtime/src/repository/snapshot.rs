//! Persisted progress shape.

use merge_core::{GameConfig, GameState, Grid, Mission, Parcel, PlayerState, StateError};
use serde::{Deserialize, Serialize};

/// Everything needed to resume a session.
///
/// Missions are not saved; they are regenerated for the player's level when
/// the session resumes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub player: PlayerState,
    pub grid: Grid,
    pub parcels: Vec<Parcel>,
    /// Unix time of capture, in milliseconds.
    pub timestamp: i64,
}

impl Snapshot {
    pub fn capture(state: &GameState) -> Self {
        Self {
            player: state.player.clone(),
            grid: state.grid.clone(),
            parcels: state.parcels.clone(),
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }

    /// Rebuilds a game state. Fails when the save does not fit `config`.
    pub fn restore(
        self,
        seed: u64,
        config: &GameConfig,
        missions: Vec<Mission>,
    ) -> Result<GameState, StateError> {
        GameState::from_parts(seed, config, self.player, self.grid, self.parcels, missions)
    }
}

/// Storage key for a session's save.
pub fn save_key(session_id: &str) -> String {
    format!("save_{session_id}")
}
