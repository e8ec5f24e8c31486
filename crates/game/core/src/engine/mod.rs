//! Action execution pipeline.
//!
//! The [`GameEngine`] is the authoritative reducer for [`GameState`]. It runs
//! an action through its transition phases, then credits buffered XP, applies
//! level-ups, advances the nonce and flushes effects. Nothing is committed
//! when the transition rejects.

mod errors;
mod leveling;
mod transition;

pub use errors::{ExecuteError, TransitionPhase, TransitionPhaseError};
pub use leveling::{LevelUp, apply_level_ups};

use crate::action::{Action, ActionResult, ApplyContext};
use crate::env::GameEnv;
use crate::events::{Effect, EffectKind, EffectSink, NullSink};
use crate::state::GameState;

static NULL_SINK: NullSink = NullSink;

/// Complete outcome of action execution.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExecutionOutcome {
    pub result: ActionResult,
    /// XP credited by this action, before level-ups consumed it.
    pub xp_gained: u64,
    /// Level-ups triggered by `xp_gained`, in order.
    pub level_ups: Vec<LevelUp>,
    /// Nonce after execution.
    pub nonce: u64,
}

/// Executes actions against a borrowed [`GameState`].
pub struct GameEngine<'a> {
    state: &'a mut GameState,
    sink: &'a dyn EffectSink,
}

impl<'a> GameEngine<'a> {
    /// Creates an engine that discards effects.
    pub fn new(state: &'a mut GameState) -> Self {
        Self {
            state,
            sink: &NULL_SINK,
        }
    }

    pub fn with_sink(state: &'a mut GameState, sink: &'a dyn EffectSink) -> Self {
        Self { state, sink }
    }

    pub fn state(&self) -> &GameState {
        self.state
    }

    /// Executes an action.
    ///
    /// # Errors
    ///
    /// Returns [`ExecuteError`] when the action is rejected. The state is
    /// left untouched and no effect is emitted.
    pub fn execute(
        &mut self,
        env: GameEnv<'_>,
        action: &Action,
    ) -> Result<ExecutionOutcome, ExecuteError> {
        let mut ctx = ApplyContext::new(env);
        let result = transition::execute_transition(action, self.state, &mut ctx)?;
        let (xp_gained, mut effects) = ctx.into_parts();

        let player = &mut self.state.player;
        player.xp = player.xp.saturating_add(xp_gained);
        let level_ups = apply_level_ups(player, &env.config().leveling);
        effects.extend(level_ups.iter().map(|_| Effect::new(EffectKind::Confetti)));

        self.state.nonce += 1;

        for effect in effects {
            self.sink.notify(effect);
        }

        Ok(ExecutionOutcome {
            result,
            xp_gained,
            level_ups,
            nonce: self.state.nonce,
        })
    }
}
