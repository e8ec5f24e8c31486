/// Lore lines handed out when generated text is unavailable.
pub const FALLBACK_LORE: [&str; 4] = [
    "An ancient artifact vibrating with energy.",
    "Forged in the depths of the forgotten mountain.",
    "They say this item brings luck to the brave.",
    "It shines with a light that casts no shadows.",
];

/// Picks a fallback line; `roll` may be any value.
pub fn fallback_lore(roll: usize) -> &'static str {
    FALLBACK_LORE[roll % FALLBACK_LORE.len()]
}
