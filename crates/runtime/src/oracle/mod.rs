//! Runtime wrappers around static game content oracles.
//!
//! The item catalog, the RNG oracle and the game configuration are bundled
//! into an [`OracleManager`] so the runtime can build [`GameEnv`] views on
//! demand. The data is immutable at runtime; dynamic state lives in
//! [`merge_core::GameState`].
mod items;

use std::sync::Arc;

use merge_core::{GameConfig, GameEnv, PcgRng};

pub use items::ItemCatalogImpl;

/// Manages all oracle implementations and provides unified access
#[derive(Clone)]
pub struct OracleManager {
    pub(crate) items: Arc<ItemCatalogImpl>,
    pub(crate) config: Arc<GameConfig>,
    pub(crate) rng: PcgRng,
}

impl OracleManager {
    pub fn new(items: Arc<ItemCatalogImpl>, config: Arc<GameConfig>) -> Self {
        Self {
            items,
            config,
            rng: PcgRng, // stateless
        }
    }

    /// Built-in catalog with the given configuration.
    pub fn with_config(config: GameConfig) -> Self {
        Self::new(Arc::new(ItemCatalogImpl::builtin()), Arc::new(config))
    }

    /// Converts oracle manager into GameEnv for merge-core
    pub fn as_game_env(&self) -> GameEnv<'_> {
        GameEnv::new(self.items.as_ref(), &self.rng, self.config.as_ref())
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn items(&self) -> &ItemCatalogImpl {
        &self.items
    }
}

impl Default for OracleManager {
    fn default() -> Self {
        Self::with_config(GameConfig::default())
    }
}
