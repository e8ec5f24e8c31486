//! Entering and settling match-3 missions.

use crate::config::GameConfig;
use crate::env::{GameEnv, compute_seed, seed_context};
use crate::error::{ErrorSeverity, GameError};
use crate::events::{Effect, EffectKind};
use crate::state::{GameState, Item, ItemId, ItemKind, SlotIndex};

use super::{ActionTransition, ApplyContext};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MissionError {
    #[error("mission '{0}' does not exist")]
    MissionNotFound(String),

    #[error("not enough energy: need {required}, have {available}")]
    InsufficientEnergy { required: u32, available: u32 },
}

impl GameError for MissionError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::MissionNotFound(_) => ErrorSeverity::Validation,
            Self::InsufficientEnergy { .. } => ErrorSeverity::Recoverable,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::MissionNotFound(_) => "MISSION_NOT_FOUND",
            Self::InsufficientEnergy { .. } => "MISSION_INSUFFICIENT_ENERGY",
        }
    }
}

/// Pays a mission's energy cost so the match-3 board can open.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StartMissionAction {
    pub mission: String,
}

impl StartMissionAction {
    pub fn new(mission: impl Into<String>) -> Self {
        Self {
            mission: mission.into(),
        }
    }

    fn energy_cost(&self, state: &GameState) -> Result<u32, MissionError> {
        let mission = state
            .mission(&self.mission)
            .ok_or_else(|| MissionError::MissionNotFound(self.mission.clone()))?;
        if state.player.energy < mission.energy_cost {
            return Err(MissionError::InsufficientEnergy {
                required: mission.energy_cost,
                available: state.player.energy,
            });
        }
        Ok(mission.energy_cost)
    }
}

impl ActionTransition for StartMissionAction {
    type Error = MissionError;
    /// Energy spent.
    type Result = u32;

    fn pre_validate(&self, state: &GameState, _env: &GameEnv<'_>) -> Result<(), Self::Error> {
        self.energy_cost(state).map(|_| ())
    }

    fn apply(
        &self,
        state: &mut GameState,
        _ctx: &mut ApplyContext<'_>,
    ) -> Result<Self::Result, Self::Error> {
        let cost = self.energy_cost(state)?;
        state.player.energy -= cost;
        Ok(cost)
    }
}

/// Reward granted for a won mission.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MissionReward {
    pub kind: ItemKind,
    pub level: u8,
    /// `None` when the grid had no room; the XP is granted regardless.
    pub placed: Option<(SlotIndex, ItemId)>,
}

/// Settles a finished match-3 session.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CompleteMissionAction {
    pub mission: String,
    pub success: bool,
    pub score: u64,
}

impl ActionTransition for CompleteMissionAction {
    type Error = MissionError;
    type Result = Option<MissionReward>;

    fn pre_validate(&self, state: &GameState, _env: &GameEnv<'_>) -> Result<(), Self::Error> {
        state
            .mission(&self.mission)
            .map(|_| ())
            .ok_or_else(|| MissionError::MissionNotFound(self.mission.clone()))
    }

    fn apply(
        &self,
        state: &mut GameState,
        ctx: &mut ApplyContext<'_>,
    ) -> Result<Self::Result, Self::Error> {
        let kind = state
            .mission(&self.mission)
            .map(|mission| mission.reward)
            .ok_or_else(|| MissionError::MissionNotFound(self.mission.clone()))?;
        if !self.success {
            return Ok(None);
        }

        let seed = compute_seed(state.seed, state.nonce, seed_context::MISSION_REWARD_LEVEL);
        let level = ctx
            .env()
            .rng()
            .range(seed, 1, u32::from(GameConfig::MISSION_REWARD_MAX_LEVEL)) as u8;

        let placed = match state.grid.first_empty() {
            Some(slot) => {
                let id = state.allocate_item_id();
                let item = Item::spawned(id, kind, level);
                let placed = item.as_ref().map(|_| (slot, id));
                state.grid.replace(slot, item);
                placed
            }
            None => None,
        };

        ctx.grant_xp(GameConfig::MISSION_REWARD_XP);
        ctx.emit(Effect::new(EffectKind::Confetti));

        Ok(Some(MissionReward {
            kind,
            level,
            placed,
        }))
    }
}
