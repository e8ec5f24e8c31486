use core::time::Duration;

/// Game configuration constants and tunable parameters.
///
/// Compile-time invariants (item level cap, XP rewards) live as associated
/// constants; everything a designer might tune lives in fields so it can be
/// loaded from TOML.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GameConfig {
    /// Width and height of the square merge grid.
    pub grid_size: usize,
    pub economy: EconomyConfig,
    pub leveling: LevelingConfig,
    pub match3: Match3Config,
    pub combo: ComboConfig,
}

impl GameConfig {
    // ===== invariants =====
    /// Highest level an item can reach. Merges into `MAX_ITEM_LEVEL + 1` are rejected.
    pub const MAX_ITEM_LEVEL: u8 = 10;
    /// Items created at or above this level request lore enrichment.
    pub const LORE_LEVEL_THRESHOLD: u8 = 5;

    // ===== rewards =====
    pub const MERGE_XP_PER_LEVEL: u64 = 10;
    pub const SELL_XP: u64 = 5;
    pub const RESTORE_XP: u64 = 250;
    pub const MISSION_REWARD_XP: u64 = 100;
    /// Mission reward items are spawned with a level in `1..=MISSION_REWARD_MAX_LEVEL`.
    pub const MISSION_REWARD_MAX_LEVEL: u8 = 3;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_GRID_SIZE: usize = 6;

    pub fn new() -> Self {
        Self {
            grid_size: Self::DEFAULT_GRID_SIZE,
            economy: EconomyConfig::default(),
            leveling: LevelingConfig::default(),
            match3: Match3Config::default(),
            combo: ComboConfig::default(),
        }
    }

    pub fn with_grid_size(grid_size: usize) -> Self {
        Self {
            grid_size,
            ..Self::new()
        }
    }

    /// Total number of addressable grid slots.
    pub fn slot_count(&self) -> usize {
        self.grid_size * self.grid_size
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Periods and multipliers driving the economy clock. All periods are in milliseconds.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EconomyConfig {
    pub tick_ms: u64,
    pub income_cycle_ms: u64,
    pub frenzy_income_cycle_ms: u64,
    pub frenzy_duration_ms: u64,
    pub frenzy_income_multiplier: u64,
    pub energy_regen_ms: u64,
    pub day_night_ms: u64,
}

impl EconomyConfig {
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    pub fn energy_regen_period(&self) -> Duration {
        Duration::from_millis(self.energy_regen_ms)
    }

    pub fn day_night_period(&self) -> Duration {
        Duration::from_millis(self.day_night_ms)
    }

    pub fn frenzy_duration(&self) -> Duration {
        Duration::from_millis(self.frenzy_duration_ms)
    }
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            tick_ms: 100,
            income_cycle_ms: 5_000,
            frenzy_income_cycle_ms: 2_500,
            frenzy_duration_ms: 5_000,
            frenzy_income_multiplier: 2,
            energy_regen_ms: 30_000,
            day_night_ms: 5 * 60_000,
        }
    }
}

/// Level-up threshold and rewards.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LevelingConfig {
    /// Threshold for the next level is `level * xp_per_level`.
    pub xp_per_level: u64,
    pub energy_bonus: u32,
    pub gem_bonus: u32,
}

impl Default for LevelingConfig {
    fn default() -> Self {
        Self {
            xp_per_level: 100,
            energy_bonus: 5,
            gem_bonus: 5,
        }
    }
}

/// Match-3 board dimensions and pacing.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Match3Config {
    pub rows: usize,
    pub cols: usize,
    pub score_per_cell: u64,
    /// Delay between a tentative swap and match detection.
    pub settle_ms: u64,
    /// Delay between reaching a terminal condition and emitting completion.
    pub completion_ms: u64,
}

impl Match3Config {
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }

    pub fn completion_delay(&self) -> Duration {
        Duration::from_millis(self.completion_ms)
    }
}

impl Default for Match3Config {
    fn default() -> Self {
        Self {
            rows: 7,
            cols: 6,
            score_per_cell: 100,
            settle_ms: 300,
            completion_ms: 1_000,
        }
    }
}

/// Merge combo window.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ComboConfig {
    pub window_ms: u64,
    pub threshold: u32,
}

impl ComboConfig {
    pub fn window(&self) -> Duration {
        Duration::from_millis(self.window_ms)
    }
}

impl Default for ComboConfig {
    fn default() -> Self {
        Self {
            window_ms: 2_000,
            threshold: 3,
        }
    }
}
