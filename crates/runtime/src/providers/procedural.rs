use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use merge_core::{Difficulty, ItemKind, Mission};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use strum::IntoEnumIterator;

use super::{MissionSource, ProviderError};

const PLACES: [&str; 8] = [
    "Goblin Cave",
    "Enchanted Forest",
    "Sunken Ruins",
    "Dragon Peak",
    "Misty Marsh",
    "Crystal Mine",
    "Haunted Keep",
    "Desert Oasis",
];

const COLORS: [&str; 6] = ["emerald", "stone", "yellow", "purple", "red", "cyan"];

const REWARDS: [ItemKind; 4] = [ItemKind::Wood, ItemKind::Stone, ItemKind::Crop, ItemKind::Potion];

/// Generates missions locally, scaled to the player's level.
///
/// Energy cost is 2..=10, moves 15..=40 and the target score falls in
/// `2000 * level ..= 5000 * level`. Difficulty climbs one tag per level.
pub struct ProceduralMissions {
    rng: Mutex<StdRng>,
    per_batch: usize,
    next_id: AtomicU64,
}

impl ProceduralMissions {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            rng: Mutex::new(rng),
            per_batch: 3,
            next_id: AtomicU64::new(1),
        }
    }

    pub fn per_batch(mut self, count: usize) -> Self {
        self.per_batch = count.max(1);
        self
    }

    fn generate(&self, level: u32) -> Result<Vec<Mission>, ProviderError> {
        let mut rng = self
            .rng
            .lock()
            .map_err(|_| ProviderError::Unavailable("generator lock poisoned".into()))?;
        let level = level.max(1);
        let tier = usize::try_from(level - 1).unwrap_or(usize::MAX);

        let missions = (0..self.per_batch)
            .map(|_| {
                let seq = self.next_id.fetch_add(1, Ordering::Relaxed);
                let place = PLACES.choose(&mut *rng).copied().unwrap_or(PLACES[0]);
                let difficulty = Difficulty::iter()
                    .nth(tier.saturating_add(rng.gen_range(0..2)))
                    .unwrap_or(Difficulty::Divine);
                let base = u64::from(level);

                Mission {
                    id: format!("m{level}_{seq}"),
                    name: place.to_owned(),
                    description: None,
                    energy_cost: rng.gen_range(2..=10),
                    target_score: rng.gen_range(2_000 * base..=5_000 * base),
                    moves: rng.gen_range(15..=40),
                    reward: REWARDS.choose(&mut *rng).copied().unwrap_or(ItemKind::Wood),
                    difficulty,
                    color: COLORS.choose(&mut *rng).copied().unwrap_or("stone").to_owned(),
                }
            })
            .collect();

        Ok(missions)
    }
}

impl Default for ProceduralMissions {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MissionSource for ProceduralMissions {
    async fn fetch_missions(&self, player_level: u32) -> Result<Vec<Mission>, ProviderError> {
        self.generate(player_level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missions_scale_with_level() {
        let source = ProceduralMissions::seeded(9).per_batch(20);
        let missions = source.fetch_missions(4).await.expect("generated");

        assert_eq!(missions.len(), 20);
        for mission in &missions {
            assert!(mission.is_playable());
            assert!((2..=10).contains(&mission.energy_cost));
            assert!((15..=40).contains(&mission.moves));
            assert!((8_000..=20_000).contains(&mission.target_score));
            assert!(matches!(
                mission.difficulty,
                Difficulty::Expert | Difficulty::Master
            ));
        }
    }

    #[tokio::test]
    async fn ids_never_repeat_across_batches() {
        let source = ProceduralMissions::seeded(1);
        let first = source.fetch_missions(1).await.expect("generated");
        let second = source.fetch_missions(1).await.expect("generated");
        assert!(first.iter().all(|a| second.iter().all(|b| a.id != b.id)));
    }
}
