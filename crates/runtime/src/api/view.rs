//! Values returned to runtime clients.

use merge_core::{ExecutionOutcome, GameState};

use super::errors::Rejection;
use crate::events::Match3View;

/// Answer to a gameplay request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionReply {
    Applied(Box<ExecutionOutcome>),
    Rejected(Rejection),
}

impl ActionReply {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }

    pub fn outcome(&self) -> Option<&ExecutionOutcome> {
        match self {
            Self::Applied(outcome) => Some(outcome),
            Self::Rejected(_) => None,
        }
    }

    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            Self::Applied(_) => None,
            Self::Rejected(rejection) => Some(rejection),
        }
    }
}

/// Point-in-time copy of everything a presentation layer renders.
#[derive(Debug, Clone)]
pub struct SessionView {
    pub state: GameState,
    pub active: bool,
    pub is_night: bool,
    pub is_frenzy: bool,
    /// Progress toward the next payout, in basis points.
    pub income_progress: u32,
    pub combo: u32,
    pub match3: Option<Match3View>,
}
