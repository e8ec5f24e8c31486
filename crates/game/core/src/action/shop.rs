//! Gem shop: energy refills, gold pouches and item chests.

use crate::env::GameEnv;
use crate::error::{ErrorSeverity, GameError};
use crate::events::{Effect, EffectKind};
use crate::state::{GameState, Item, ItemId, ItemKind, SlotIndex};

use super::{ActionTransition, ApplyContext};

/// Goods sold for gems.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumIter, strum::EnumString,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ShopOffer {
    /// Fills energy up to the current maximum.
    EnergyRefill,
    GoldPouch,
    /// A level 4 wood item, placed in the first empty slot.
    WoodChest,
}

impl ShopOffer {
    pub const GOLD_POUCH_AMOUNT: u64 = 500;
    pub const CHEST_KIND: ItemKind = ItemKind::Wood;
    pub const CHEST_LEVEL: u8 = 4;

    pub const fn price_gems(self) -> u32 {
        match self {
            Self::EnergyRefill => 5,
            Self::GoldPouch => 10,
            Self::WoodChest => 15,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ShopError {
    #[error("not enough gems: need {required}, have {available}")]
    InsufficientGems { required: u32, available: u32 },

    #[error("energy is already full")]
    EnergyFull,

    #[error("no empty slot for the chest")]
    GridFull,
}

impl GameError for ShopError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::InsufficientGems { .. } | Self::GridFull => ErrorSeverity::Recoverable,
            Self::EnergyFull => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::InsufficientGems { .. } => "SHOP_INSUFFICIENT_GEMS",
            Self::EnergyFull => "SHOP_ENERGY_FULL",
            Self::GridFull => "SHOP_GRID_FULL",
        }
    }
}

/// What a purchase delivered.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Purchase {
    Energy { gained: u32 },
    Gold { gained: u64 },
    Item { slot: SlotIndex, item: ItemId },
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BuyAction {
    pub offer: ShopOffer,
}

impl BuyAction {
    pub fn new(offer: ShopOffer) -> Self {
        Self { offer }
    }

    /// Returns the chest slot for `WoodChest`, `None` for the other offers.
    fn check(&self, state: &GameState) -> Result<Option<SlotIndex>, ShopError> {
        let price = self.offer.price_gems();
        if state.player.gems < price {
            return Err(ShopError::InsufficientGems {
                required: price,
                available: state.player.gems,
            });
        }
        match self.offer {
            ShopOffer::EnergyRefill if state.player.energy >= state.player.max_energy => {
                Err(ShopError::EnergyFull)
            }
            ShopOffer::WoodChest => state.grid.first_empty().map(Some).ok_or(ShopError::GridFull),
            _ => Ok(None),
        }
    }
}

impl ActionTransition for BuyAction {
    type Error = ShopError;
    type Result = Purchase;

    fn pre_validate(&self, state: &GameState, _env: &GameEnv<'_>) -> Result<(), Self::Error> {
        self.check(state).map(|_| ())
    }

    fn apply(
        &self,
        state: &mut GameState,
        ctx: &mut ApplyContext<'_>,
    ) -> Result<Self::Result, Self::Error> {
        let chest_slot = self.check(state)?;
        let price = self.offer.price_gems();

        let purchase = match self.offer {
            ShopOffer::EnergyRefill => {
                let gained = state.player.max_energy - state.player.energy;
                state.player.energy = state.player.max_energy;
                ctx.emit(Effect::new(EffectKind::Confetti));
                Purchase::Energy { gained }
            }
            ShopOffer::GoldPouch => {
                state.player.gold += ShopOffer::GOLD_POUCH_AMOUNT;
                ctx.emit(Effect::new(EffectKind::CoinRain));
                Purchase::Gold {
                    gained: ShopOffer::GOLD_POUCH_AMOUNT,
                }
            }
            ShopOffer::WoodChest => {
                let slot = chest_slot.ok_or(ShopError::GridFull)?;
                let id = state.allocate_item_id();
                let item = Item::spawned(id, ShopOffer::CHEST_KIND, ShopOffer::CHEST_LEVEL);
                state.grid.replace(slot, item);
                ctx.emit(Effect::new(EffectKind::Confetti).at(slot));
                Purchase::Item { slot, item: id }
            }
        };
        state.player.gems -= price;

        Ok(purchase)
    }
}
