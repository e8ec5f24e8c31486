use crate::config::LevelingConfig;

/// Currencies, stamina and progression of the player.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerState {
    pub gold: u64,
    /// Premium currency.
    pub gems: u32,
    pub energy: u32,
    pub max_energy: u32,
    /// Experience toward the next level. Carries over on level-up.
    pub xp: u64,
    pub level: u32,
}

impl PlayerState {
    pub const INITIAL_GOLD: u64 = 100;
    pub const INITIAL_GEMS: u32 = 25;
    pub const INITIAL_ENERGY: u32 = 30;
    pub const INITIAL_MAX_ENERGY: u32 = 50;

    pub fn new() -> Self {
        Self {
            gold: Self::INITIAL_GOLD,
            gems: Self::INITIAL_GEMS,
            energy: Self::INITIAL_ENERGY,
            max_energy: Self::INITIAL_MAX_ENERGY,
            xp: 0,
            level: 1,
        }
    }

    /// XP needed to leave the current level. Recomputed from `level` every call.
    pub fn xp_threshold(&self, leveling: &LevelingConfig) -> u64 {
        u64::from(self.level) * leveling.xp_per_level
    }

    pub fn can_afford(&self, gold: u64) -> bool {
        self.gold >= gold
    }

    /// Adds energy up to `max_energy`. Returns the amount actually gained.
    pub fn regenerate_energy(&mut self, amount: u32) -> u32 {
        let before = self.energy;
        self.energy = self.energy.saturating_add(amount).min(self.max_energy);
        self.energy.saturating_sub(before)
    }
}

impl Default for PlayerState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn energy_regeneration_is_capped() {
        let mut player = PlayerState {
            energy: 49,
            ..PlayerState::new()
        };

        assert_eq!(player.regenerate_energy(1), 1);
        assert_eq!(player.regenerate_energy(1), 0);
        assert_eq!(player.energy, 50);
    }

    #[test]
    fn threshold_scales_with_level() {
        let leveling = LevelingConfig::default();
        let player = PlayerState {
            level: 3,
            ..PlayerState::new()
        };
        assert_eq!(player.xp_threshold(&leveling), 300);
    }
}
