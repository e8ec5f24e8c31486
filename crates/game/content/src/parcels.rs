//! The kingdom map: default restorable parcels, cheapest first.

use merge_core::{ItemKind, ItemRequirement, Parcel};

fn parcel(
    id: &str,
    name: &str,
    description: &str,
    cost_gold: u64,
    requirements: Vec<ItemRequirement>,
    income_per_cycle: u64,
) -> Parcel {
    Parcel {
        id: id.to_owned(),
        name: name.to_owned(),
        description: description.to_owned(),
        unlocked: false,
        cost_gold,
        requirements,
        income_per_cycle,
    }
}

pub fn default_parcels() -> Vec<Parcel> {
    use ItemKind::*;
    vec![
        parcel(
            "p1",
            "Royal Gardens",
            "Restore the ancient flora to attract noble visitors.",
            100,
            vec![ItemRequirement::single(Wood, 3)],
            5,
        ),
        parcel(
            "p2",
            "Watchtower",
            "Guard the borders and tax passing merchants.",
            500,
            vec![
                ItemRequirement::single(Stone, 4),
                ItemRequirement::single(Wood, 4),
            ],
            15,
        ),
        parcel(
            "p3",
            "Central Market",
            "The beating heart of the kingdom's trade.",
            1_500,
            vec![ItemRequirement::new(Crop, 5, 2)],
            40,
        ),
        parcel(
            "p4",
            "Arcane Laboratory",
            "Uncover valuable secrets of alchemy.",
            3_000,
            vec![
                ItemRequirement::single(Stone, 6),
                ItemRequirement::single(Potion, 4),
            ],
            100,
        ),
        parcel(
            "p5",
            "Headquarters",
            "Train soldiers to protect the treasury.",
            6_000,
            vec![
                ItemRequirement::single(Wood, 7),
                ItemRequirement::single(Stone, 6),
            ],
            250,
        ),
        parcel(
            "p6",
            "Royal Port",
            "Sea trade with distant lands.",
            12_000,
            vec![
                ItemRequirement::new(Wood, 8, 2),
                ItemRequirement::single(Crop, 7),
            ],
            600,
        ),
        parcel(
            "p7",
            "Arcane Library",
            "Ancient knowledge breeds power.",
            25_000,
            vec![
                ItemRequirement::single(Potion, 8),
                ItemRequirement::single(Stone, 8),
            ],
            1_500,
        ),
        parcel(
            "p8",
            "Grand Castle",
            "Seat of the kingdom's supreme power.",
            100_000,
            vec![
                ItemRequirement::single(Stone, 9),
                ItemRequirement::single(Wood, 9),
                ItemRequirement::single(Potion, 9),
            ],
            5_000,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parcels_start_locked_with_unique_ids() {
        let parcels = default_parcels();
        assert_eq!(parcels.len(), 8);
        assert!(parcels.iter().all(|p| !p.unlocked));

        let mut ids: Vec<_> = parcels.iter().map(|p| p.id.as_str()).collect();
        ids.dedup();
        assert_eq!(ids.len(), 8);
    }

    #[test]
    fn costs_increase_along_the_map() {
        let parcels = default_parcels();
        assert!(parcels.windows(2).all(|w| w[0].cost_gold < w[1].cost_gold));
    }
}
