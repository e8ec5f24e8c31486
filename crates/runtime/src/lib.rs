//! Runtime orchestration for a merge-kingdom play session.
//!
//! This crate wires the deterministic core to the outside world: a session
//! worker that owns the game state and the economy clock, a topic-based event
//! bus, enrichment providers for lore and missions, and a debounced autosave
//! on top of a snapshot repository. Consumers embed [`Runtime`] and talk to it
//! through [`RuntimeHandle`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides topic-based event bus for flexible event routing
//! - [`providers`] supplies lore and missions, with bundled fallbacks
//! - [`oracle`] and [`repository`] provide data adapters reused by other crates
//! - `workers` keeps background tasks internal to the crate
pub mod api;
pub mod events;
pub mod oracle;
pub mod providers;
pub mod repository;
pub mod runtime;
pub mod session;

mod workers;

pub use api::{ActionReply, Rejection, Result, RuntimeError, RuntimeHandle, SessionView};
pub use events::{
    BusEffectSink, EconomyEvent, Event, EventBus, Match3View, ProgressEvent, SessionEvent, Topic,
};
pub use oracle::{ItemCatalogImpl, OracleManager};
pub use providers::{
    LoreProvider, LoreSource, MissionProvider, MissionSource, ProceduralMissions, ProviderError,
    StaticLore, StaticMissions, WithFallback,
};
pub use repository::{
    FileSnapshotRepository, InMemorySnapshotRepo, RepositoryError, Snapshot, SnapshotRepository,
};
pub use runtime::{Runtime, RuntimeBuilder, RuntimeConfig};
pub use session::SessionContext;
