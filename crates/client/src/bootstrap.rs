//! Assembles a [`Runtime`] from a [`ClientConfig`].
use std::sync::Arc;

use anyhow::{Context, Result};
use merge_content::{ConfigLoader, ItemLoader, ParcelLoader};
use merge_core::GameConfig;
use merge_runtime::{
    FileSnapshotRepository, ItemCatalogImpl, OracleManager, ProceduralMissions, Runtime,
    RuntimeConfig, SessionContext, WithFallback,
};
use tracing::info;

use crate::config::ClientConfig;

/// Player identity for `config`: the configured id, or a fresh guest.
pub fn session_context(config: &ClientConfig) -> SessionContext {
    config
        .session_id
        .as_ref()
        .map_or_else(SessionContext::guest, SessionContext::new)
}

/// Loads content overrides, opens the save directory and starts the runtime.
pub async fn build_runtime(config: &ClientConfig, session: SessionContext) -> Result<Runtime> {
    let oracles = load_oracles(config)?;

    let save_dir = config
        .save_data_dir
        .clone()
        .or_else(FileSnapshotRepository::default_dir)
        .context("no save directory configured and no platform default available")?;
    let repository = FileSnapshotRepository::new(&save_dir)
        .with_context(|| format!("failed to open save directory {}", save_dir.display()))?;
    info!("Saves: {}", save_dir.display());

    let missions = match config.seed {
        Some(seed) => ProceduralMissions::seeded(seed),
        None => ProceduralMissions::new(),
    };

    let mut builder = Runtime::builder()
        .config(RuntimeConfig {
            autosave_debounce: config.autosave_debounce,
            ..RuntimeConfig::default()
        })
        .session(session)
        .oracles(oracles)
        .repository(Arc::new(repository))
        .mission_provider(Arc::new(WithFallback::new(missions)));

    if let Some(path) = &config.parcels_path {
        builder = builder.parcels(ParcelLoader::load(path)?);
        info!("Parcels: {}", path.display());
    }
    if let Some(seed) = config.seed {
        builder = builder.seed(seed);
    }

    Ok(builder.build().await?)
}

fn load_oracles(config: &ClientConfig) -> Result<OracleManager> {
    let game_config = match &config.game_config_path {
        Some(path) => {
            info!("Game config: {}", path.display());
            ConfigLoader::load(path)?
        }
        None => GameConfig::default(),
    };

    let items = match &config.items_path {
        Some(path) => {
            info!("Item catalog: {}", path.display());
            ItemCatalogImpl::new(ItemLoader::load(path)?)?
        }
        None => ItemCatalogImpl::builtin(),
    };

    Ok(OracleManager::new(Arc::new(items), Arc::new(game_config)))
}
