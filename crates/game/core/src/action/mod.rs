//! Player-facing mutations of the game state.
//!
//! Each action is a small struct implementing [`ActionTransition`]. The
//! [`Action`] enum is what callers hand to the engine.
//!
//! # Module Structure
//!
//! - `grid`: spawn, combine (move / merge / swap), sell, acknowledge, lore write-back
//! - `restore`: parcel restoration ledger
//! - `mission`: match-3 entry cost and completion rewards
//! - `shop`: gem purchases
//! - `context`: buffered XP and effects for the action being applied

mod context;
mod grid;
mod mission;
mod restore;
mod shop;

pub use context::{ApplyContext, LoreRequest};
pub use grid::{
    AcknowledgeAction, ApplyLoreAction, CombineAction, CombineOutcome, GridError, SellAction,
    SpawnAction,
};
pub use mission::{CompleteMissionAction, MissionError, MissionReward, StartMissionAction};
pub use restore::{Restoration, RestoreAction, RestoreError, plan_restoration};
pub use shop::{BuyAction, Purchase, ShopError, ShopOffer};

use crate::env::GameEnv;
use crate::state::{GameState, ItemId, ItemKind, SlotIndex};

/// Defines how a concrete action variant mutates game state.
///
/// `pre_validate` must reject every input `apply` cannot complete, and `apply`
/// must not mutate anything before its last fallible check. Together this
/// keeps every action atomic.
pub trait ActionTransition {
    type Error;
    type Result;

    /// Validates pre-conditions using the state **before** mutation.
    fn pre_validate(&self, _state: &GameState, _env: &GameEnv<'_>) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Applies the action by mutating the game state directly.
    fn apply(
        &self,
        state: &mut GameState,
        ctx: &mut ApplyContext<'_>,
    ) -> Result<Self::Result, Self::Error>;
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Action {
    Spawn(SpawnAction),
    Combine(CombineAction),
    Sell(SellAction),
    Acknowledge(AcknowledgeAction),
    ApplyLore(ApplyLoreAction),
    Restore(RestoreAction),
    StartMission(StartMissionAction),
    CompleteMission(CompleteMissionAction),
    Buy(BuyAction),
}

impl Action {
    pub fn spawn(kind: ItemKind, level: u8) -> Self {
        Self::Spawn(SpawnAction::new(kind, level))
    }

    pub fn combine(from: SlotIndex, to: SlotIndex) -> Self {
        Self::Combine(CombineAction::new(from, to))
    }

    pub fn sell(slot: SlotIndex) -> Self {
        Self::Sell(SellAction::new(slot))
    }

    pub fn acknowledge(item: ItemId) -> Self {
        Self::Acknowledge(AcknowledgeAction { item })
    }

    pub fn apply_lore(item: ItemId, lore: impl Into<String>) -> Self {
        Self::ApplyLore(ApplyLoreAction {
            item,
            lore: lore.into(),
        })
    }

    pub fn restore(parcel: impl Into<String>) -> Self {
        Self::Restore(RestoreAction::new(parcel))
    }

    pub fn start_mission(mission: impl Into<String>) -> Self {
        Self::StartMission(StartMissionAction::new(mission))
    }

    pub fn complete_mission(mission: impl Into<String>, success: bool, score: u64) -> Self {
        Self::CompleteMission(CompleteMissionAction {
            mission: mission.into(),
            success,
            score,
        })
    }

    pub fn buy(offer: ShopOffer) -> Self {
        Self::Buy(BuyAction::new(offer))
    }

    /// Short name for logs.
    pub fn as_snake_case(&self) -> &'static str {
        match self {
            Self::Spawn(_) => "spawn",
            Self::Combine(_) => "combine",
            Self::Sell(_) => "sell",
            Self::Acknowledge(_) => "acknowledge",
            Self::ApplyLore(_) => "apply_lore",
            Self::Restore(_) => "restore",
            Self::StartMission(_) => "start_mission",
            Self::CompleteMission(_) => "complete_mission",
            Self::Buy(_) => "buy",
        }
    }
}

/// Action-specific execution result.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionResult {
    Spawned { slot: SlotIndex, item: ItemId },
    Combined(CombineOutcome),
    Sold { gold: u64 },
    Acknowledged { changed: bool },
    LoreApplied { slot: SlotIndex },
    Restored(Restoration),
    MissionStarted { energy_spent: u32 },
    MissionCompleted { reward: Option<MissionReward> },
    Bought(Purchase),
}

impl ActionResult {
    /// Lore request raised by a rare merge, if any.
    pub fn lore_request(&self) -> Option<&LoreRequest> {
        match self {
            Self::Combined(CombineOutcome::Merged { lore, .. }) => lore.as_ref(),
            _ => None,
        }
    }

    pub fn is_merge(&self) -> bool {
        matches!(self, Self::Combined(CombineOutcome::Merged { .. }))
    }
}
