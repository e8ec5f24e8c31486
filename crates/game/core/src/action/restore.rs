//! Parcel restoration ledger.

use crate::config::GameConfig;
use crate::env::GameEnv;
use crate::error::{ErrorSeverity, GameError};
use crate::events::{Effect, EffectKind};
use crate::state::{GameState, Grid, ItemKind, Parcel, SlotIndex};

use super::{ActionTransition, ApplyContext};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RestoreError {
    #[error("parcel '{0}' does not exist")]
    ParcelNotFound(String),

    #[error("parcel '{0}' is already restored")]
    AlreadyUnlocked(String),

    #[error("not enough gold: need {required}, have {available}")]
    InsufficientGold { required: u64, available: u64 },

    #[error("missing {kind} of level {min_level} or higher")]
    MissingItems { kind: ItemKind, min_level: u8 },
}

impl GameError for RestoreError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::InsufficientGold { .. } | Self::MissingItems { .. } => {
                ErrorSeverity::Recoverable
            }
            Self::ParcelNotFound(_) | Self::AlreadyUnlocked(_) => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::ParcelNotFound(_) => "RESTORE_PARCEL_NOT_FOUND",
            Self::AlreadyUnlocked(_) => "RESTORE_ALREADY_UNLOCKED",
            Self::InsufficientGold { .. } => "RESTORE_INSUFFICIENT_GOLD",
            Self::MissingItems { .. } => "RESTORE_MISSING_ITEMS",
        }
    }
}

/// Picks the grid slots that pay for `parcel`.
///
/// Each requirement entry claims the lowest-index unclaimed slot holding a
/// matching item, in requirement order. `count` is display data and does not
/// widen the claim. A slot is never claimed twice. The scan reads one
/// immutable view of the grid.
pub fn plan_restoration(grid: &Grid, parcel: &Parcel) -> Result<Vec<SlotIndex>, RestoreError> {
    let mut claimed: Vec<SlotIndex> = Vec::with_capacity(parcel.requirements.len());

    for requirement in &parcel.requirements {
        let slot = grid
            .items()
            .find(|(index, item)| {
                !claimed.contains(index) && item.satisfies(requirement.kind, requirement.min_level)
            })
            .map(|(index, _)| index)
            .ok_or(RestoreError::MissingItems {
                kind: requirement.kind,
                min_level: requirement.min_level,
            })?;
        claimed.push(slot);
    }

    Ok(claimed)
}

/// Summary of a successful restoration.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Restoration {
    pub parcel: String,
    pub gold_spent: u64,
    pub consumed: Vec<SlotIndex>,
}

/// Pays gold and items to unlock a parcel. All or nothing.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RestoreAction {
    pub parcel: String,
}

impl RestoreAction {
    pub fn new(parcel: impl Into<String>) -> Self {
        Self {
            parcel: parcel.into(),
        }
    }

    fn check<'s>(&self, state: &'s GameState) -> Result<(&'s Parcel, Vec<SlotIndex>), RestoreError> {
        let parcel = state
            .parcel(&self.parcel)
            .ok_or_else(|| RestoreError::ParcelNotFound(self.parcel.clone()))?;
        if parcel.unlocked {
            return Err(RestoreError::AlreadyUnlocked(parcel.id.clone()));
        }
        if !state.player.can_afford(parcel.cost_gold) {
            return Err(RestoreError::InsufficientGold {
                required: parcel.cost_gold,
                available: state.player.gold,
            });
        }
        let slots = plan_restoration(&state.grid, parcel)?;
        Ok((parcel, slots))
    }
}

impl ActionTransition for RestoreAction {
    type Error = RestoreError;
    type Result = Restoration;

    fn pre_validate(&self, state: &GameState, _env: &GameEnv<'_>) -> Result<(), Self::Error> {
        self.check(state).map(|_| ())
    }

    fn apply(
        &self,
        state: &mut GameState,
        ctx: &mut ApplyContext<'_>,
    ) -> Result<Self::Result, Self::Error> {
        let (parcel, consumed) = self.check(state)?;
        let gold_spent = parcel.cost_gold;

        state.player.gold -= gold_spent;
        for &slot in &consumed {
            state.grid.take(slot);
        }
        if let Some(parcel) = state.parcel_mut(&self.parcel) {
            parcel.unlocked = true;
        }

        ctx.grant_xp(GameConfig::RESTORE_XP);
        ctx.emit(Effect::new(EffectKind::Confetti));

        Ok(Restoration {
            parcel: self.parcel.clone(),
            gold_spent,
            consumed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{Item, ItemId, ItemRequirement};

    fn parcel(requirements: Vec<ItemRequirement>) -> Parcel {
        Parcel {
            id: "p".into(),
            name: "Test".into(),
            description: String::new(),
            unlocked: false,
            cost_gold: 0,
            requirements,
            income_per_cycle: 1,
        }
    }

    fn grid(items: &[(ItemKind, u8)]) -> Grid {
        let mut slots: Vec<Option<Item>> = items
            .iter()
            .enumerate()
            .map(|(i, &(kind, level))| Item::spawned(ItemId(i as u64 + 1), kind, level))
            .collect();
        slots.resize(9, None);
        Grid::from_slots(slots)
    }

    #[test]
    fn claims_one_slot_per_requirement() {
        let grid = grid(&[(ItemKind::Wood, 8), (ItemKind::Crop, 7), (ItemKind::Wood, 9)]);
        let parcel = parcel(vec![
            ItemRequirement::new(ItemKind::Wood, 8, 2),
            ItemRequirement::single(ItemKind::Crop, 7),
        ]);

        assert_eq!(plan_restoration(&grid, &parcel).unwrap(), vec![0, 1]);
    }

    #[test]
    fn single_item_pays_for_counted_requirement() {
        let grid = grid(&[(ItemKind::Crop, 5)]);
        let parcel = parcel(vec![ItemRequirement::new(ItemKind::Crop, 5, 2)]);

        assert_eq!(plan_restoration(&grid, &parcel).unwrap(), vec![0]);
    }

    #[test]
    fn one_item_cannot_satisfy_two_requirements() {
        let grid = grid(&[(ItemKind::Stone, 9)]);
        let parcel = parcel(vec![
            ItemRequirement::single(ItemKind::Stone, 4),
            ItemRequirement::single(ItemKind::Stone, 4),
        ]);

        assert_eq!(
            plan_restoration(&grid, &parcel),
            Err(RestoreError::MissingItems {
                kind: ItemKind::Stone,
                min_level: 4
            })
        );
    }

    #[test]
    fn lower_level_items_do_not_count() {
        let grid = grid(&[(ItemKind::Potion, 3)]);
        let parcel = parcel(vec![ItemRequirement::single(ItemKind::Potion, 4)]);
        assert!(plan_restoration(&grid, &parcel).is_err());
    }
}
