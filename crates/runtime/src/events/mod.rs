//! Topic-based event bus for runtime events.
//!
//! Events are published to specific topics, and consumers subscribe only to
//! the topics they need. Core effects reach the bus through [`BusEffectSink`].

mod bus;
mod sink;
mod types;

pub use bus::{Event, EventBus, Topic};
pub use sink::BusEffectSink;
pub use types::{EconomyEvent, Match3View, ProgressEvent, SessionEvent};
