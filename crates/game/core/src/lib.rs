//! Deterministic merge-game simulation.
//!
//! `merge-core` defines the canonical rules (grid actions, restoration ledger,
//! leveling, economy clock, combo tracking and the match-3 mini-game) and
//! exposes pure APIs reused by the runtime and by tests. All action-driven
//! state mutation flows through [`engine::GameEngine`]; timed mutation flows
//! through [`economy::EconomyClock`].
pub mod action;
pub mod combo;
pub mod config;
pub mod economy;
pub mod engine;
pub mod env;
pub mod error;
pub mod events;
pub mod match3;
pub mod state;

pub use action::{
    Action, ActionResult, ActionTransition, ApplyContext, CombineOutcome, GridError, LoreRequest,
    MissionError, MissionReward, Purchase, Restoration, RestoreError, ShopError, ShopOffer,
    plan_restoration,
};
pub use combo::{ComboTracker, ComboUpdate};
pub use config::{ComboConfig, EconomyConfig, GameConfig, LevelingConfig, Match3Config};
pub use economy::{EconomyClock, EconomyReport, PROGRESS_FULL};
pub use engine::{
    ExecuteError, ExecutionOutcome, GameEngine, LevelUp, TransitionPhase, TransitionPhaseError,
    apply_level_ups,
};
pub use env::{
    GameEnv, ItemCatalog, ItemDefinition, PcgRng, PcgStream, RngOracle, compute_seed,
    seed_context, sell_value,
};
pub use error::{ErrorSeverity, GameError};
pub use events::{Effect, EffectKind, EffectSink, NullSink, RecordingSink};
pub use match3::{
    Board, Cell, Gem, Match3Error, Match3Phase, Match3Session, MissionResult, Resolution,
    TapOutcome,
};
pub use state::{
    CreationCause, Difficulty, GameState, Grid, Item, ItemId, ItemKind, ItemRequirement, Mission,
    Parcel, PlayerState, SlotIndex, StateError,
};
