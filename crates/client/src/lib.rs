//! Composition root for the merge-kingdom client.
//!
//! Reads configuration from the environment, installs logging, builds the
//! [`merge_runtime::Runtime`] and plays a headless session against it.

pub mod autoplay;
pub mod bootstrap;
pub mod config;
pub mod logging;

pub use autoplay::{Autoplay, AutoplayReport, Move, plan, spawn_event_logger};
pub use bootstrap::{build_runtime, session_context};
pub use config::ClientConfig;
pub use logging::setup_logging;
