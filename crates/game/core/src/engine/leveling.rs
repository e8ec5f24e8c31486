//! Level-up evaluation.

use crate::config::LevelingConfig;
use crate::state::PlayerState;

/// One level gained, with the rewards that came with it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LevelUp {
    /// The level reached.
    pub level: u32,
    pub energy_bonus: u32,
    pub gem_bonus: u32,
}

/// Applies every level-up the player's current XP allows, one at a time.
///
/// The threshold is recomputed from the level before each check and XP
/// carries over, so a large grant can produce several sequential level-ups.
pub fn apply_level_ups(player: &mut PlayerState, leveling: &LevelingConfig) -> Vec<LevelUp> {
    let mut gained = Vec::new();
    if leveling.xp_per_level == 0 {
        return gained;
    }

    loop {
        let threshold = player.xp_threshold(leveling);
        if player.xp < threshold {
            break;
        }
        player.xp -= threshold;
        player.level = player.level.saturating_add(1);
        player.max_energy = player.max_energy.saturating_add(leveling.energy_bonus);
        player.energy = player.energy.saturating_add(leveling.energy_bonus);
        player.gems = player.gems.saturating_add(leveling.gem_bonus);

        gained.push(LevelUp {
            level: player.level,
            energy_bonus: leveling.energy_bonus,
            gem_bonus: leveling.gem_bonus,
        });
    }

    gained
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn carries_over_excess_xp() {
        let mut player = PlayerState {
            xp: 250,
            level: 2,
            ..PlayerState::new()
        };
        let ups = apply_level_ups(&mut player, &LevelingConfig::default());

        assert_eq!(ups.len(), 1);
        assert_eq!(player.level, 3);
        assert_eq!(player.xp, 50);
        assert_eq!(player.max_energy, 55);
        assert_eq!(player.energy, 35);
        assert_eq!(player.gems, 30);
    }

    #[test]
    fn crosses_multiple_thresholds_sequentially() {
        // 100 (1->2) + 200 (2->3) + 50 left over
        let mut player = PlayerState {
            xp: 350,
            ..PlayerState::new()
        };
        let ups = apply_level_ups(&mut player, &LevelingConfig::default());

        assert_eq!(ups.iter().map(|up| up.level).collect::<Vec<_>>(), vec![2, 3]);
        assert_eq!(player.xp, 50);
    }

    #[test]
    fn below_threshold_is_untouched() {
        let mut player = PlayerState {
            xp: 99,
            ..PlayerState::new()
        };
        assert!(apply_level_ups(&mut player, &LevelingConfig::default()).is_empty());
        assert_eq!(player, PlayerState { xp: 99, ..PlayerState::new() });
    }
}
