//! Debounced autosave.
//!
//! Listens to [`Topic::Session`](crate::Topic::Session) and keeps only the
//! latest [`Snapshot`]. It is written once the session has been quiet for
//! the debounce window, on explicit flush, and on shutdown. A progress reset
//! discards the pending snapshot and deletes the stored save.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use crate::events::{Event, SessionEvent};
use crate::repository::{RepositoryError, Snapshot, SnapshotRepository};

const TARGET: &str = "runtime::persistence";

/// Configuration for the persistence worker
#[derive(Debug, Clone)]
pub struct PersistenceConfig {
    pub save_key: String,
    pub debounce: Duration,
}

/// Commands that can be sent to the persistence worker
pub enum Command {
    /// Write the pending snapshot now.
    Flush {
        reply: oneshot::Sender<Result<(), RepositoryError>>,
    },
    /// Flush and stop.
    Shutdown,
}

pub struct PersistenceWorker {
    repository: Arc<dyn SnapshotRepository>,
    config: PersistenceConfig,
    events: broadcast::Receiver<Event>,
    command_rx: mpsc::Receiver<Command>,
    pending: Option<Snapshot>,
    due: Instant,
}

impl PersistenceWorker {
    pub fn new(
        repository: Arc<dyn SnapshotRepository>,
        config: PersistenceConfig,
        events: broadcast::Receiver<Event>,
        command_rx: mpsc::Receiver<Command>,
    ) -> Self {
        Self {
            repository,
            config,
            events,
            command_rx,
            pending: None,
            due: Instant::now(),
        }
    }

    pub async fn run(mut self) {
        loop {
            tokio::select! {
                command = self.command_rx.recv() => match command {
                    Some(Command::Flush { reply }) => {
                        self.drain_events();
                        let _ = reply.send(self.flush());
                    }
                    Some(Command::Shutdown) | None => {
                        self.drain_events();
                        self.flush_logged();
                        break;
                    }
                },
                event = self.events.recv() => match event {
                    Ok(event) => self.handle_event(event),
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(target: TARGET, skipped, "Persistence fell behind the session");
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        self.flush_logged();
                        break;
                    }
                },
                _ = tokio::time::sleep_until(self.due), if self.pending.is_some() => {
                    self.flush_logged();
                }
            }
        }

        info!(target: TARGET, key = %self.config.save_key, "Persistence worker stopped");
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Session(SessionEvent::StateChanged { snapshot }) => {
                self.pending = Some(*snapshot);
                self.due = Instant::now() + self.config.debounce;
            }
            Event::Session(SessionEvent::ProgressReset) => {
                self.pending = None;
                match self.repository.delete(&self.config.save_key) {
                    Ok(()) => info!(target: TARGET, key = %self.config.save_key, "Save deleted"),
                    Err(error) => error!(target: TARGET, %error, "Failed to delete save"),
                }
            }
            _ => {}
        }
    }

    /// Applies events already queued so a flush sees the latest state.
    fn drain_events(&mut self) {
        loop {
            match self.events.try_recv() {
                Ok(event) => self.handle_event(event),
                Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                    warn!(target: TARGET, skipped, "Persistence fell behind the session");
                }
                Err(_) => break,
            }
        }
    }

    fn flush(&mut self) -> Result<(), RepositoryError> {
        let Some(snapshot) = self.pending.take() else {
            return Ok(());
        };
        self.repository.save(&self.config.save_key, &snapshot)?;
        debug!(
            target: TARGET,
            key = %self.config.save_key,
            timestamp = snapshot.timestamp,
            "Autosaved"
        );
        Ok(())
    }

    fn flush_logged(&mut self) {
        if let Err(error) = self.flush() {
            error!(target: TARGET, %error, "Autosave failed");
        }
    }
}
