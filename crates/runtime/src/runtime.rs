//! High-level runtime orchestrator.
//!
//! The runtime owns background workers, wires up command/event channels, and
//! exposes a builder-based API for clients to drive a session.

use std::sync::Arc;
use std::time::Duration;

use chrono::Timelike;
use merge_core::{EconomyClock, GameState, Parcel};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::api::{Result, RuntimeError, RuntimeHandle};
use crate::events::{EventBus, Topic};
use crate::oracle::OracleManager;
use crate::providers::{LoreProvider, MissionProvider, StaticLore, StaticMissions};
use crate::repository::{InMemorySnapshotRepo, SnapshotRepository};
use crate::session::SessionContext;
use crate::workers::{
    PersistenceCommand, PersistenceConfig, PersistenceWorker, Providers, SessionWorker,
};

/// Runtime configuration shared across the orchestrator and workers.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub event_buffer_size: usize,
    pub command_buffer_size: usize,
    /// Quiet period before a state change is written to the repository.
    pub autosave_debounce: Duration,
    /// Whether the economy clock runs from the start.
    pub start_active: bool,
    /// Initial day/night state; `None` reads the local clock.
    pub start_at_night: Option<bool>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            event_buffer_size: 256,
            command_buffer_size: 32,
            autosave_debounce: Duration::from_millis(1_000),
            start_active: true,
            start_at_night: None,
        }
    }
}

/// Main runtime that orchestrates one player session.
///
/// [`RuntimeHandle`] provides a cloneable façade for clients.
pub struct Runtime {
    handle: RuntimeHandle,
    session: SessionContext,
    resumed: bool,

    // Background workers
    session_worker: JoinHandle<()>,
    persistence_tx: mpsc::Sender<PersistenceCommand>,
    persistence_worker: JoinHandle<()>,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Get a cloneable handle to this runtime
    pub fn handle(&self) -> RuntimeHandle {
        self.handle.clone()
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    /// True when progress was loaded from a save.
    pub fn resumed(&self) -> bool {
        self.resumed
    }

    /// Writes any pending autosave immediately.
    pub async fn flush(&self) -> Result<()> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.persistence_tx
            .send(PersistenceCommand::Flush { reply: reply_tx })
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;
        reply_rx
            .await
            .map_err(RuntimeError::ReplyChannelClosed)?
            .map_err(RuntimeError::from)
    }

    /// Stops the session, writes the final autosave and joins all workers.
    pub async fn shutdown(self) -> Result<()> {
        let Runtime {
            handle,
            session_worker,
            persistence_tx,
            persistence_worker,
            ..
        } = self;

        // The worker may already be gone; joining below reports real failures.
        let _ = handle.shutdown().await;
        drop(handle);
        session_worker.await.map_err(RuntimeError::WorkerJoin)?;

        let _ = persistence_tx.send(PersistenceCommand::Shutdown).await;
        persistence_worker
            .await
            .map_err(RuntimeError::WorkerJoin)?;

        Ok(())
    }
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    session: Option<SessionContext>,
    oracles: Option<OracleManager>,
    repository: Option<Arc<dyn SnapshotRepository>>,
    lore: Option<Arc<dyn LoreProvider>>,
    missions: Option<Arc<dyn MissionProvider>>,
    parcels: Option<Vec<Parcel>>,
    seed: Option<u64>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            session: None,
            oracles: None,
            repository: None,
            lore: None,
            missions: None,
            parcels: None,
            seed: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Player identity. Defaults to a fresh guest.
    pub fn session(mut self, session: SessionContext) -> Self {
        self.session = Some(session);
        self
    }

    /// Item catalog and game configuration. Defaults to the built-in content.
    pub fn oracles(mut self, oracles: OracleManager) -> Self {
        self.oracles = Some(oracles);
        self
    }

    /// Where saves live. Defaults to an in-memory store.
    pub fn repository(mut self, repository: Arc<dyn SnapshotRepository>) -> Self {
        self.repository = Some(repository);
        self
    }

    pub fn lore_provider(mut self, provider: Arc<dyn LoreProvider>) -> Self {
        self.lore = Some(provider);
        self
    }

    pub fn mission_provider(mut self, provider: Arc<dyn MissionProvider>) -> Self {
        self.missions = Some(provider);
        self
    }

    /// Parcel map for new sessions. Defaults to the built-in kingdom.
    pub fn parcels(mut self, parcels: Vec<Parcel>) -> Self {
        self.parcels = Some(parcels);
        self
    }

    /// Fixes the RNG seed instead of drawing one.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Loads or creates the session state and starts the workers.
    ///
    /// An unreadable or incompatible save starts a fresh session.
    pub async fn build(self) -> Result<Runtime> {
        let session = self.session.unwrap_or_else(SessionContext::guest);
        let oracles = self.oracles.unwrap_or_default();
        let repository = self
            .repository
            .unwrap_or_else(|| Arc::new(InMemorySnapshotRepo::new()));
        let providers = Providers {
            lore: self.lore.unwrap_or_else(|| Arc::new(StaticLore)),
            missions: self.missions.unwrap_or_else(|| Arc::new(StaticMissions)),
        };
        let fresh_parcels = self.parcels.unwrap_or_else(merge_content::default_parcels);
        let seed = self.seed.unwrap_or_else(rand::random);
        let game_config = oracles.config().clone();

        let save_key = session.save_key();
        let restored = match repository.load(&save_key)? {
            Some(snapshot) => match snapshot.restore(seed, &game_config, Vec::new()) {
                Ok(state) => Some(state),
                Err(error) => {
                    warn!(
                        target: "runtime",
                        key = %save_key,
                        %error,
                        "Saved progress does not fit the current configuration; starting fresh"
                    );
                    None
                }
            },
            None => None,
        };
        let resumed = restored.is_some();
        let mut state = restored
            .unwrap_or_else(|| GameState::new(seed, &game_config, fresh_parcels.clone(), Vec::new()));
        state.missions = providers
            .missions
            .generate_missions(state.player.level)
            .await;

        let is_night = self.config.start_at_night.unwrap_or_else(is_night_now);
        let mut clock = EconomyClock::new(game_config.economy.clone(), is_night);
        clock.set_active(self.config.start_active);

        let event_bus = EventBus::with_capacity(self.config.event_buffer_size);
        let (command_tx, command_rx) = mpsc::channel(self.config.command_buffer_size);
        let (persistence_tx, persistence_rx) = mpsc::channel(4);

        // Subscribe before the session worker can publish anything.
        let persistence = PersistenceWorker::new(
            repository,
            PersistenceConfig {
                save_key,
                debounce: self.config.autosave_debounce,
            },
            event_bus.subscribe(Topic::Session),
            persistence_rx,
        );
        let persistence_worker = tokio::spawn(persistence.run());

        let worker = SessionWorker::new(
            state,
            oracles,
            clock,
            fresh_parcels,
            providers,
            event_bus.clone(),
            command_rx,
        );
        let session_worker = tokio::spawn(worker.run());

        info!(
            target: "runtime",
            session = %session.session_id,
            guest = session.is_guest,
            resumed,
            "Runtime started"
        );

        Ok(Runtime {
            handle: RuntimeHandle::new(command_tx, event_bus),
            session,
            resumed,
            session_worker,
            persistence_tx,
            persistence_worker,
        })
    }
}

fn is_night_now() -> bool {
    is_night_at(chrono::Local::now().hour())
}

/// Night runs from 19:00 through 05:59 local time.
fn is_night_at(hour: u32) -> bool {
    !(6..=18).contains(&hour)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evening_hour_is_still_day() {
        assert!(is_night_at(5));
        assert!(!is_night_at(6));
        assert!(!is_night_at(18));
        assert!(is_night_at(19));
        assert!(is_night_at(0));
    }
}
