use super::item::ItemKind;

/// Closed set of difficulty tags a mission may carry.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Expert,
    Master,
    Legendary,
    Infernal,
    Divine,
}

/// A match-3 challenge descriptor.
///
/// Produced outside the core; the simulation only reads the numeric fields
/// and the reward kind. `color` is a presentation grouping tag.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Mission {
    pub id: String,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: Option<String>,
    pub energy_cost: u32,
    pub target_score: u64,
    pub moves: u32,
    pub reward: ItemKind,
    pub difficulty: Difficulty,
    #[cfg_attr(feature = "serde", serde(default))]
    pub color: String,
}

impl Mission {
    /// True when the numeric fields describe a playable mission.
    pub fn is_playable(&self) -> bool {
        !self.id.is_empty() && self.energy_cost > 0 && self.target_score > 0 && self.moves > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn difficulty_round_trips_through_strings() {
        assert_eq!("LEGENDARY".parse::<Difficulty>().unwrap(), Difficulty::Legendary);
        assert_eq!(Difficulty::Infernal.as_ref(), "infernal");
        assert!("impossible".parse::<Difficulty>().is_err());
    }

    #[test]
    fn zero_move_missions_are_not_playable() {
        let mission = Mission {
            id: "m".into(),
            name: "Broken".into(),
            description: None,
            energy_cost: 3,
            target_score: 1000,
            moves: 0,
            reward: ItemKind::Wood,
            difficulty: Difficulty::Easy,
            color: String::new(),
        };
        assert!(!mission.is_playable());
    }
}
