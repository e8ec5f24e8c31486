//! Repository layer for dynamic runtime data
//!
//! Repositories handle data that CHANGES during gameplay: the player's saved
//! progress. Static game content (items, parcels, missions) is handled by
//! oracles and providers, not repositories.

mod error;
mod file;
mod memory;
mod snapshot;
mod traits;

pub use error::{RepositoryError, Result};
pub use file::FileSnapshotRepository;
pub use memory::InMemorySnapshotRepo;
pub use snapshot::{Snapshot, save_key};
pub use traits::SnapshotRepository;
