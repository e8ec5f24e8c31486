//! Topic-based event bus implementation.

use std::collections::HashMap;
use std::sync::Arc;

use merge_core::Effect;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use super::types::{EconomyEvent, ProgressEvent, SessionEvent};

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// Action outcomes, state changes, lifecycle
    Session,
    /// Presentation effects (popups, particles)
    Effects,
    /// Levels, missions, enrichment
    Progress,
    /// Income, energy, day/night, frenzy
    Economy,
}

impl Topic {
    pub const ALL: [Topic; 4] = [Topic::Session, Topic::Effects, Topic::Progress, Topic::Economy];
}

/// Event wrapper that carries the topic and typed event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    Session(SessionEvent),
    Effect(Effect),
    Progress(ProgressEvent),
    Economy(EconomyEvent),
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::Session(_) => Topic::Session,
            Event::Effect(_) => Topic::Effects,
            Event::Progress(_) => Topic::Progress,
            Event::Economy(_) => Topic::Economy,
        }
    }
}

/// Topic-based event bus
///
/// Consumers subscribe to the topics they care about. Publishing never
/// blocks and never fails: events without subscribers are dropped.
#[derive(Clone)]
pub struct EventBus {
    channels: Arc<HashMap<Topic, broadcast::Sender<Event>>>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(256)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        let channels = Topic::ALL
            .into_iter()
            .map(|topic| (topic, broadcast::channel(capacity).0))
            .collect();

        Self {
            channels: Arc::new(channels),
        }
    }

    /// Publish an event to its corresponding topic
    pub fn publish(&self, event: Event) {
        let topic = event.topic();

        if let Some(tx) = self.channels.get(&topic)
            && tx.send(event).is_err()
        {
            // No subscribers for this topic - this is normal, not an error
            tracing::trace!("No subscribers for topic {:?}", topic);
        }
    }

    /// Subscribe to a specific topic
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        match self.channels.get(&topic) {
            Some(tx) => tx.subscribe(),
            // unreachable: every topic is created in `with_capacity`
            None => broadcast::channel(1).1,
        }
    }

    /// Subscribe to multiple topics
    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> HashMap<Topic, broadcast::Receiver<Event>> {
        topics
            .iter()
            .map(|&topic| (topic, self.subscribe(topic)))
            .collect()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use merge_core::EffectKind;

    use super::*;

    #[tokio::test]
    async fn events_reach_only_their_topic() {
        let bus = EventBus::with_capacity(8);
        let mut effects = bus.subscribe(Topic::Effects);
        let mut economy = bus.subscribe(Topic::Economy);

        bus.publish(Event::Effect(Effect::new(EffectKind::Confetti)));

        let event = effects.recv().await.expect("effect delivered");
        assert!(matches!(event, Event::Effect(e) if e.kind == EffectKind::Confetti));
        assert!(economy.try_recv().is_err());
    }

    #[test]
    fn publishing_without_subscribers_is_fine() {
        let bus = EventBus::new();
        bus.publish(Event::Economy(EconomyEvent::FrenzyEnded));
    }
}
