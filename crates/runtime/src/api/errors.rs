//! Unified error types surfaced by the runtime API.
//!
//! Only infrastructure failures live here: worker coordination, repositories
//! and setup. Gameplay rejections are values ([`Rejection`]), never errors.
use merge_core::{ErrorSeverity, ExecuteError, GameError, ItemKind};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::oneshot;

pub use crate::repository::RepositoryError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("session worker command channel closed")]
    CommandChannelClosed,

    #[error("session worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("runtime worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("item catalog has no definition for {0}")]
    IncompleteCatalog(ItemKind),
}

/// A gameplay request the simulation refused. State is unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rejection {
    /// Stable machine-readable code, e.g. `GRID_FULL`.
    pub code: String,
    pub severity: ErrorSeverity,
    pub message: String,
}

impl Rejection {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            severity: ErrorSeverity::Recoverable,
            message: message.into(),
        }
    }
}

impl From<&ExecuteError> for Rejection {
    fn from(error: &ExecuteError) -> Self {
        Self {
            code: error.error_code().to_owned(),
            severity: error.severity(),
            message: error.to_string(),
        }
    }
}
