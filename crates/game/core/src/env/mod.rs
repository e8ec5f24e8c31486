//! Read-only facts the engine consults while executing actions.
//!
//! [`GameEnv`] bundles the item catalog, the RNG oracle and the game config so
//! actions can reach everything they need without coupling to concrete
//! implementations.
mod catalog;
mod rng;

pub use catalog::{ItemCatalog, ItemDefinition, sell_value};
pub use rng::{PcgRng, PcgStream, RngOracle, compute_seed, seed_context};

use crate::config::GameConfig;

/// Aggregates read-only oracles required by the action pipeline.
#[derive(Clone, Copy)]
pub struct GameEnv<'a> {
    catalog: &'a dyn ItemCatalog,
    rng: &'a dyn RngOracle,
    config: &'a GameConfig,
}

impl<'a> GameEnv<'a> {
    pub fn new(catalog: &'a dyn ItemCatalog, rng: &'a dyn RngOracle, config: &'a GameConfig) -> Self {
        Self {
            catalog,
            rng,
            config,
        }
    }

    pub fn catalog(&self) -> &'a dyn ItemCatalog {
        self.catalog
    }

    pub fn rng(&self) -> &'a dyn RngOracle {
        self.rng
    }

    pub fn config(&self) -> &'a GameConfig {
        self.config
    }
}

impl core::fmt::Debug for GameEnv<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("GameEnv")
            .field("config", self.config)
            .finish_non_exhaustive()
    }
}
