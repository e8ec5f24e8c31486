//! Action transition dispatch and execution logic.

use crate::action::{Action, ActionResult, ActionTransition, ApplyContext};
use crate::state::GameState;

use super::errors::{ExecuteError, TransitionPhase, TransitionPhaseError};

/// Runs `pre_validate` then `apply`, tagging any error with its phase.
#[inline]
fn drive_transition<T>(
    transition: &T,
    state: &mut GameState,
    ctx: &mut ApplyContext<'_>,
) -> Result<T::Result, TransitionPhaseError<T::Error>>
where
    T: ActionTransition,
{
    transition
        .pre_validate(state, ctx.env())
        .map_err(|error| TransitionPhaseError::new(TransitionPhase::PreValidate, error))?;

    transition
        .apply(state, ctx)
        .map_err(|error| TransitionPhaseError::new(TransitionPhase::Apply, error))
}

/// Routes each action to its transition and wraps the result in [`ActionResult`].
pub(super) fn execute_transition(
    action: &Action,
    state: &mut GameState,
    ctx: &mut ApplyContext<'_>,
) -> Result<ActionResult, ExecuteError> {
    match action {
        Action::Spawn(transition) => {
            let (slot, item) = drive_transition(transition, state, ctx).map_err(ExecuteError::Grid)?;
            Ok(ActionResult::Spawned { slot, item })
        }
        Action::Combine(transition) => drive_transition(transition, state, ctx)
            .map(ActionResult::Combined)
            .map_err(ExecuteError::Grid),
        Action::Sell(transition) => {
            let gold = drive_transition(transition, state, ctx).map_err(ExecuteError::Grid)?;
            Ok(ActionResult::Sold { gold })
        }
        Action::Acknowledge(transition) => {
            let changed = drive_transition(transition, state, ctx).map_err(ExecuteError::Grid)?;
            Ok(ActionResult::Acknowledged { changed })
        }
        Action::ApplyLore(transition) => {
            let slot = drive_transition(transition, state, ctx).map_err(ExecuteError::Grid)?;
            Ok(ActionResult::LoreApplied { slot })
        }
        Action::Restore(transition) => drive_transition(transition, state, ctx)
            .map(ActionResult::Restored)
            .map_err(ExecuteError::Restore),
        Action::StartMission(transition) => {
            let energy_spent =
                drive_transition(transition, state, ctx).map_err(ExecuteError::Mission)?;
            Ok(ActionResult::MissionStarted { energy_spent })
        }
        Action::CompleteMission(transition) => {
            let reward = drive_transition(transition, state, ctx).map_err(ExecuteError::Mission)?;
            Ok(ActionResult::MissionCompleted { reward })
        }
        Action::Buy(transition) => drive_transition(transition, state, ctx)
            .map(ActionResult::Bought)
            .map_err(ExecuteError::Shop),
    }
}
