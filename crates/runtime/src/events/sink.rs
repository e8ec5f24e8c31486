use merge_core::{Effect, EffectSink};

use super::bus::{Event, EventBus};

/// Forwards core effects onto the [`Topic::Effects`](super::Topic::Effects) channel.
#[derive(Clone)]
pub struct BusEffectSink {
    bus: EventBus,
}

impl BusEffectSink {
    pub fn new(bus: EventBus) -> Self {
        Self { bus }
    }
}

impl EffectSink for BusEffectSink {
    fn notify(&self, effect: Effect) {
        self.bus.publish(Event::Effect(effect));
    }
}
