//! Presentation notifications emitted by the simulation.
//!
//! The core calls an injected [`EffectSink`] synchronously and never waits on
//! it. Delivery is best effort; nothing in the simulation depends on an
//! effect being observed.

use std::sync::Mutex;

use crate::state::SlotIndex;

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr, strum::EnumIter,
)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum EffectKind {
    MergeExplosion,
    GoldPopup,
    TextPopup,
    ScreenShake,
    ComboPopup,
    CoinRain,
    Confetti,
}

/// A single fire-and-forget notification with an optional payload.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Effect {
    pub kind: EffectKind,
    /// Grid slot the effect is anchored to, if any.
    pub slot: Option<SlotIndex>,
    pub text: Option<String>,
    pub color: Option<String>,
}

impl Effect {
    pub const GOLD_COLOR: &'static str = "#fcd34d";
    pub const COMBO_COLOR: &'static str = "#ef4444";
    pub const TEXT_COLOR: &'static str = "#ffffff";

    pub fn new(kind: EffectKind) -> Self {
        Self {
            kind,
            slot: None,
            text: None,
            color: None,
        }
    }

    pub fn at(mut self, slot: SlotIndex) -> Self {
        self.slot = Some(slot);
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn merge_explosion(slot: SlotIndex) -> Self {
        Self::new(EffectKind::MergeExplosion).at(slot)
    }

    pub fn gold_popup(amount: u64) -> Self {
        Self::new(EffectKind::GoldPopup)
            .with_text(format!("+{amount}"))
            .with_color(Self::GOLD_COLOR)
    }

    pub fn combo_popup(count: u32) -> Self {
        Self::new(EffectKind::ComboPopup)
            .with_text(format!("{count}x COMBO!"))
            .with_color(Self::COMBO_COLOR)
    }

    pub fn text_popup(text: impl Into<String>) -> Self {
        Self::new(EffectKind::TextPopup)
            .with_text(text)
            .with_color(Self::TEXT_COLOR)
    }
}

/// Receiver for presentation notifications.
pub trait EffectSink: Send + Sync {
    fn notify(&self, effect: Effect);
}

/// Discards every effect.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl EffectSink for NullSink {
    fn notify(&self, _effect: Effect) {}
}

/// Keeps every effect in memory, in emission order. Intended for tests.
#[derive(Debug, Default)]
pub struct RecordingSink {
    effects: Mutex<Vec<Effect>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn effects(&self) -> Vec<Effect> {
        self.effects
            .lock()
            .map(|effects| effects.clone())
            .unwrap_or_default()
    }

    pub fn kinds(&self) -> Vec<EffectKind> {
        self.effects().into_iter().map(|effect| effect.kind).collect()
    }

    pub fn clear(&self) {
        if let Ok(mut effects) = self.effects.lock() {
            effects.clear();
        }
    }
}

impl EffectSink for RecordingSink {
    fn notify(&self, effect: Effect) {
        if let Ok(mut effects) = self.effects.lock() {
            effects.push(effect);
        }
    }
}
