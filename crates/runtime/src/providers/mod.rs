//! Enrichment providers: item lore and mission generation.
//!
//! The session worker only talks to the infallible [`LoreProvider`] and
//! [`MissionProvider`] traits. Anything that can fail (a remote generator, a
//! flaky file) implements [`LoreSource`] / [`MissionSource`] instead and is
//! wrapped in [`WithFallback`], which validates results and substitutes the
//! bundled fallback content on any error.

mod fallback;
mod procedural;

use async_trait::async_trait;
use merge_core::{ItemKind, Mission};
use thiserror::Error;

pub use fallback::{StaticLore, StaticMissions, WithFallback};
pub use procedural::ProceduralMissions;

/// Always produces lore. An empty string means "no lore".
#[async_trait]
pub trait LoreProvider: Send + Sync {
    async fn generate_lore(&self, kind: ItemKind, level: u8) -> String;
}

/// Always produces a non-empty list of playable missions.
#[async_trait]
pub trait MissionProvider: Send + Sync {
    async fn generate_missions(&self, player_level: u32) -> Vec<Mission>;
}

#[async_trait]
pub trait LoreSource: Send + Sync {
    async fn fetch_lore(&self, kind: ItemKind, level: u8) -> Result<String, ProviderError>;
}

#[async_trait]
pub trait MissionSource: Send + Sync {
    async fn fetch_missions(&self, player_level: u32) -> Result<Vec<Mission>, ProviderError>;
}

#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("source unavailable: {0}")]
    Unavailable(String),

    #[error("malformed response: {0}")]
    Malformed(String),
}
