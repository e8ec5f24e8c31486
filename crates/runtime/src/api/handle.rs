//! Cloneable façade for issuing commands to the runtime.
//!
//! [`RuntimeHandle`] hides channel plumbing and offers async helpers for
//! playing the session or streaming events from specific topics.
use std::collections::HashMap;

use merge_core::{Action, Cell, ItemId, ItemKind, ShopOffer, SlotIndex, TapOutcome};
use tokio::sync::{broadcast, mpsc, oneshot};

use super::errors::{Result, RuntimeError};
use super::view::{ActionReply, SessionView};
use crate::events::{Event, EventBus, Topic};
use crate::workers::Command;

/// Client-facing handle to interact with the runtime
#[derive(Clone)]
pub struct RuntimeHandle {
    command_tx: mpsc::Sender<Command>,
    event_bus: EventBus,
}

impl RuntimeHandle {
    pub(crate) fn new(command_tx: mpsc::Sender<Command>, event_bus: EventBus) -> Self {
        Self {
            command_tx,
            event_bus,
        }
    }

    async fn request<T>(&self, command: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(command(reply_tx))
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    async fn execute(&self, action: Action) -> Result<ActionReply> {
        self.request(|reply| Command::Execute { action, reply }).await
    }

    /// Places a new item in the first empty slot.
    pub async fn spawn(&self, kind: ItemKind, level: u8) -> Result<ActionReply> {
        self.execute(Action::spawn(kind, level)).await
    }

    /// Drops the item at `from` onto `to`: move, merge or swap.
    pub async fn combine(&self, from: SlotIndex, to: SlotIndex) -> Result<ActionReply> {
        self.execute(Action::combine(from, to)).await
    }

    pub async fn sell(&self, slot: SlotIndex) -> Result<ActionReply> {
        self.execute(Action::sell(slot)).await
    }

    pub async fn restore(&self, parcel: impl Into<String>) -> Result<ActionReply> {
        self.execute(Action::restore(parcel)).await
    }

    /// Spends gems on a shop offer.
    pub async fn buy(&self, offer: ShopOffer) -> Result<ActionReply> {
        self.execute(Action::buy(offer)).await
    }

    /// Clears an item's "new" badge.
    pub async fn acknowledge(&self, item: ItemId) -> Result<ActionReply> {
        self.execute(Action::acknowledge(item)).await
    }

    /// Pays the energy cost and opens the mission's match-3 board.
    pub async fn start_mission(&self, mission: impl Into<String>) -> Result<ActionReply> {
        let mission = mission.into();
        self.request(|reply| Command::StartMission { mission, reply })
            .await
    }

    /// Taps a cell on the running match-3 board. `Ignored` when no board is open.
    pub async fn tap(&self, cell: Cell) -> Result<TapOutcome> {
        self.request(|reply| Command::Tap { cell, reply }).await
    }

    /// Abandons the running mission without reward. Returns `false` when none was running.
    pub async fn exit_mission(&self) -> Result<bool> {
        self.request(|reply| Command::ExitMission { reply }).await
    }

    /// Pauses or resumes the economy clock.
    pub async fn set_active(&self, active: bool) -> Result<()> {
        self.command_tx
            .send(Command::SetActive { active })
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)
    }

    /// Wipes progress and the stored save.
    pub async fn reset_progress(&self) -> Result<()> {
        self.request(|reply| Command::ResetProgress { reply }).await
    }

    pub(crate) async fn shutdown(&self) -> Result<()> {
        self.command_tx
            .send(Command::Shutdown)
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)
    }

    /// Query the current session (read-only snapshot)
    pub async fn query_state(&self) -> Result<SessionView> {
        self.request(|reply| Command::QueryState { reply }).await
    }

    /// Subscribe to events from a specific topic
    ///
    /// # Topics
    ///
    /// - `Topic::Session` - action outcomes, state changes, resets
    /// - `Topic::Effects` - presentation effects
    /// - `Topic::Progress` - level-ups, missions, lore, match-3 board
    /// - `Topic::Economy` - income, energy, day/night, frenzy
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    pub fn subscribe_multiple(&self, topics: &[Topic]) -> HashMap<Topic, broadcast::Receiver<Event>> {
        self.event_bus.subscribe_multiple(topics)
    }
}
