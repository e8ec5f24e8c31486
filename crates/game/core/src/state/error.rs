//! State reconstruction errors.

use crate::error::{ErrorSeverity, GameError};

/// Errors raised when rebuilding a [`GameState`](super::GameState) from persisted parts.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StateError {
    #[error("grid has {actual} slots, expected {expected}")]
    GridSizeMismatch { expected: usize, actual: usize },

    /// An item has an out-of-range level or shares its id with another item.
    #[error("grid contains invalid or duplicate items")]
    InconsistentGrid,

    #[error("player state is out of bounds")]
    InvalidPlayer,
}

impl GameError for StateError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::GridSizeMismatch { .. } => "STATE_GRID_SIZE_MISMATCH",
            Self::InconsistentGrid => "STATE_INCONSISTENT_GRID",
            Self::InvalidPlayer => "STATE_INVALID_PLAYER",
        }
    }
}
