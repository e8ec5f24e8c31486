//! Worker tasks that back the runtime orchestration.
//!
//! The session worker owns and mutates the game; the persistence worker
//! turns its state-change events into debounced saves.

mod persistence;
mod session;

pub use persistence::{
    Command as PersistenceCommand, PersistenceConfig, PersistenceWorker,
};
pub use session::{Command, Providers, SessionWorker};
