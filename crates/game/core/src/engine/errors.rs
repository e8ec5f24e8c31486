//! Error types for action execution pipeline.

use crate::action::{GridError, MissionError, RestoreError, ShopError};
use crate::error::{ErrorSeverity, GameError};

/// Identifies which stage of the transition pipeline produced an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TransitionPhase {
    PreValidate,
    Apply,
}

impl TransitionPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransitionPhase::PreValidate => "pre_validate",
            TransitionPhase::Apply => "apply",
        }
    }
}

/// Associates a transition phase with the underlying error.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TransitionPhaseError<E> {
    pub phase: TransitionPhase,
    pub error: E,
}

impl<E> TransitionPhaseError<E> {
    pub fn new(phase: TransitionPhase, error: E) -> Self {
        Self { phase, error }
    }
}

impl<E: std::fmt::Display> std::fmt::Display for TransitionPhaseError<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} failed: {}", self.phase.as_str(), self.error)
    }
}

impl<E: std::fmt::Display + std::fmt::Debug> std::error::Error for TransitionPhaseError<E> {}

/// Errors surfaced while executing an action through the game engine.
///
/// Every variant is a rejection: the state is exactly as it was before the call.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExecuteError {
    #[error("grid action failed: {0}")]
    Grid(TransitionPhaseError<GridError>),

    #[error("restore action failed: {0}")]
    Restore(TransitionPhaseError<RestoreError>),

    #[error("mission action failed: {0}")]
    Mission(TransitionPhaseError<MissionError>),

    #[error("shop action failed: {0}")]
    Shop(TransitionPhaseError<ShopError>),
}

impl ExecuteError {
    pub fn phase(&self) -> TransitionPhase {
        match self {
            Self::Grid(e) => e.phase,
            Self::Restore(e) => e.phase,
            Self::Mission(e) => e.phase,
            Self::Shop(e) => e.phase,
        }
    }
}

impl GameError for ExecuteError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Grid(e) => e.error.severity(),
            Self::Restore(e) => e.error.severity(),
            Self::Mission(e) => e.error.severity(),
            Self::Shop(e) => e.error.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Grid(e) => e.error.error_code(),
            Self::Restore(e) => e.error.error_code(),
            Self::Mission(e) => e.error.error_code(),
            Self::Shop(e) => e.error.error_code(),
        }
    }
}
