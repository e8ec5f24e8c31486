use crate::env::GameEnv;
use crate::events::Effect;
use crate::state::{ItemId, ItemKind};

/// Request to enrich a freshly merged rare item with lore text.
///
/// Keyed by item id: the slot may have changed by the time the text arrives.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LoreRequest {
    pub item: ItemId,
    pub kind: ItemKind,
    pub level: u8,
}

/// Mutable side channel handed to [`ActionTransition::apply`](super::ActionTransition::apply).
///
/// XP and effects are buffered here and only committed by the engine after
/// the action succeeds, so a rejected action never leaks either.
pub struct ApplyContext<'a> {
    env: GameEnv<'a>,
    xp: u64,
    effects: Vec<Effect>,
}

impl<'a> ApplyContext<'a> {
    pub fn new(env: GameEnv<'a>) -> Self {
        Self {
            env,
            xp: 0,
            effects: Vec::new(),
        }
    }

    pub fn env(&self) -> &GameEnv<'a> {
        &self.env
    }

    pub fn grant_xp(&mut self, amount: u64) {
        self.xp = self.xp.saturating_add(amount);
    }

    pub fn emit(&mut self, effect: Effect) {
        self.effects.push(effect);
    }

    pub fn xp(&self) -> u64 {
        self.xp
    }

    pub(crate) fn into_parts(self) -> (u64, Vec<Effect>) {
        (self.xp, self.effects)
    }
}
