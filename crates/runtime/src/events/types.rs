//! Event payloads published on the bus.

use merge_core::{
    Cell, Gem, ItemId, LevelUp, Match3Phase, Match3Session, Mission, MissionResult, MissionReward,
};
use serde::{Deserialize, Serialize};

use crate::api::Rejection;
use crate::repository::Snapshot;

/// Session lifecycle and action bookkeeping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SessionEvent {
    ActionApplied {
        action: String,
        nonce: u64,
    },
    ActionRejected {
        action: String,
        rejection: Rejection,
    },
    /// Persistable progress changed. Carries the state to save.
    StateChanged {
        snapshot: Box<Snapshot>,
    },
    /// Progress was wiped; any stored save must go too.
    ProgressReset,
    ActiveChanged {
        active: bool,
    },
}

/// Player progression: levels, missions, enrichment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ProgressEvent {
    LevelUp(LevelUp),
    LoreApplied {
        item: ItemId,
    },
    MissionsAdded {
        level: u32,
        missions: Vec<Mission>,
    },
    MissionStarted {
        mission: String,
    },
    /// Board changed: selection, tentative swap, resolution.
    Board(Match3View),
    MissionFinished {
        mission: String,
        result: MissionResult,
        reward: Option<MissionReward>,
    },
    MissionAbandoned {
        mission: String,
    },
}

/// Economy clock activity. Quiet ticks publish nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EconomyEvent {
    Income { gold: u64, cycles: u32 },
    EnergyRegenerated { amount: u32 },
    DayNight { is_night: bool },
    FrenzyStarted { combo: u32 },
    FrenzyEnded,
}

/// Read-only view of a running match-3 board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match3View {
    pub mission: String,
    pub phase: Match3Phase,
    pub selected: Option<Cell>,
    pub score: u64,
    pub target_score: u64,
    pub moves_left: u32,
    pub board: Vec<Vec<Gem>>,
}

impl Match3View {
    pub fn capture(mission: &str, session: &Match3Session) -> Self {
        Self {
            mission: mission.to_owned(),
            phase: session.phase(),
            selected: session.selected(),
            score: session.score(),
            target_score: session.target_score(),
            moves_left: session.moves_left(),
            board: session.board().to_rows(),
        }
    }
}
