//! Data-driven content definitions and loaders.
//!
//! This crate houses the built-in kingdom content and, behind the `loaders`
//! feature, readers for RON/TOML data files:
//! - Item catalog (display names and sell base values)
//! - Parcel map
//! - Missions
//! - Game configuration
//!
//! Content is consumed by runtime oracles and providers; the core never
//! depends on it.

pub mod catalog;
pub mod lore;
pub mod missions;
pub mod parcels;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use catalog::item_definitions;
pub use lore::{FALLBACK_LORE, fallback_lore};
pub use missions::fallback_missions;
pub use parcels::default_parcels;

#[cfg(feature = "loaders")]
pub use loaders::{ConfigLoader, ItemLoader, LoadResult, MissionLoader, ParcelLoader};
