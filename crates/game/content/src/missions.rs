//! Static missions used whenever generated ones are unavailable.

use merge_core::{Difficulty, ItemKind, Mission};

/// Fallback missions offered at `level`.
///
/// The first batch keeps the short ids `f1`/`f2`; later batches are suffixed
/// with the level so appended missions never collide.
pub fn fallback_missions(level: u32) -> Vec<Mission> {
    let id = |base: &str| {
        if level <= 1 {
            base.to_owned()
        } else {
            format!("{base}_lv{level}")
        }
    };

    vec![
        Mission {
            id: id("f1"),
            name: "Goblin Cave".into(),
            description: Some("Goblins have hoarded stone in the hills.".into()),
            energy_cost: 3,
            target_score: 3_000,
            moves: 20,
            reward: ItemKind::Stone,
            difficulty: Difficulty::Medium,
            color: "stone".into(),
        },
        Mission {
            id: id("f2"),
            name: "Enchanted Forest".into(),
            description: Some("Something glows between the old trees.".into()),
            energy_cost: 4,
            target_score: 4_500,
            moves: 25,
            reward: ItemKind::Potion,
            difficulty: Difficulty::Hard,
            color: "purple".into(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallbacks_are_playable() {
        assert!(fallback_missions(1).iter().all(Mission::is_playable));
    }

    #[test]
    fn later_batches_get_distinct_ids() {
        let first = fallback_missions(1);
        let later = fallback_missions(4);
        assert_eq!(first[0].id, "f1");
        assert_eq!(later[0].id, "f1_lv4");
    }
}
