//! Authoritative game state representation.
//!
//! This module owns the data structures that describe the player, the merge
//! grid, parcels and missions. Runtime layers clone or query this state but
//! mutate it exclusively through the engine.
mod error;
mod grid;
mod item;
mod mission;
mod parcel;
mod player;

pub use error::StateError;
pub use grid::{Grid, SlotIndex};
pub use item::{CreationCause, Item, ItemId, ItemKind};
pub use mission::{Difficulty, Mission};
pub use parcel::{ItemRequirement, Parcel, unlocked_income};
pub use player::PlayerState;

use crate::config::GameConfig;

/// Canonical snapshot of the deterministic game state.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameState {
    /// RNG seed for deterministic random generation.
    ///
    /// Set once at session start. Combined with `nonce` to derive a unique
    /// seed for every random draw.
    pub seed: u64,

    /// Number of successfully executed actions.
    pub nonce: u64,

    /// Sequential item id allocator (monotonically increasing, never reused).
    next_item_id: u64,

    pub player: PlayerState,
    pub grid: Grid,
    pub parcels: Vec<Parcel>,
    /// Missions offered to the player. Only ever appended to.
    pub missions: Vec<Mission>,
}

impl GameState {
    /// Creates a fresh session: initial player, empty grid of the configured size.
    pub fn new(seed: u64, config: &GameConfig, parcels: Vec<Parcel>, missions: Vec<Mission>) -> Self {
        Self {
            seed,
            nonce: 0,
            next_item_id: 1,
            player: PlayerState::new(),
            grid: Grid::new(config.grid_size),
            parcels,
            missions,
        }
    }

    /// Rebuilds a state from persisted parts.
    ///
    /// The id allocator resumes above the largest id present in `grid`.
    ///
    /// # Errors
    ///
    /// Returns [`StateError`] when the grid does not have the configured slot
    /// count or holds invalid items.
    pub fn from_parts(
        seed: u64,
        config: &GameConfig,
        player: PlayerState,
        grid: Grid,
        parcels: Vec<Parcel>,
        missions: Vec<Mission>,
    ) -> Result<Self, StateError> {
        if grid.len() != config.slot_count() {
            return Err(StateError::GridSizeMismatch {
                expected: config.slot_count(),
                actual: grid.len(),
            });
        }
        if !grid.is_consistent() {
            return Err(StateError::InconsistentGrid);
        }
        if player.level == 0 || player.energy > player.max_energy {
            return Err(StateError::InvalidPlayer);
        }

        let next_item_id = grid.max_item_id().map_or(1, |id| id.0.saturating_add(1));
        Ok(Self {
            seed,
            nonce: 0,
            next_item_id,
            player,
            grid,
            parcels,
            missions,
        })
    }

    /// Allocates a new unique [`ItemId`].
    pub fn allocate_item_id(&mut self) -> ItemId {
        let id = ItemId(self.next_item_id);
        self.next_item_id = self.next_item_id.saturating_add(1);
        id
    }

    /// Peeks at the id the next allocation will return.
    pub fn next_item_id(&self) -> ItemId {
        ItemId(self.next_item_id)
    }

    pub fn parcel(&self, id: &str) -> Option<&Parcel> {
        self.parcels.iter().find(|parcel| parcel.id == id)
    }

    pub fn parcel_mut(&mut self, id: &str) -> Option<&mut Parcel> {
        self.parcels.iter_mut().find(|parcel| parcel.id == id)
    }

    pub fn mission(&self, id: &str) -> Option<&Mission> {
        self.missions.iter().find(|mission| mission.id == id)
    }

    /// Gold credited per completed income cycle, before frenzy multipliers.
    pub fn passive_income(&self) -> u64 {
        unlocked_income(&self.parcels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocator_resumes_above_loaded_ids() {
        let config = GameConfig::with_grid_size(2);
        let mut slots = vec![None; 4];
        slots[1] = Item::spawned(ItemId(41), ItemKind::Crop, 2);

        let mut state = GameState::from_parts(
            7,
            &config,
            PlayerState::new(),
            Grid::from_slots(slots),
            Vec::new(),
            Vec::new(),
        )
        .unwrap();

        assert_eq!(state.allocate_item_id(), ItemId(42));
        assert_eq!(state.allocate_item_id(), ItemId(43));
    }

    #[test]
    fn rejects_grid_of_wrong_size() {
        let config = GameConfig::new();
        let err = GameState::from_parts(
            0,
            &config,
            PlayerState::new(),
            Grid::new(3),
            Vec::new(),
            Vec::new(),
        )
        .unwrap_err();

        assert_eq!(
            err,
            StateError::GridSizeMismatch {
                expected: 36,
                actual: 9
            }
        );
    }
}
