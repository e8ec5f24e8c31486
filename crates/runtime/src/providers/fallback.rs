use async_trait::async_trait;
use merge_core::{ItemKind, Mission};
use rand::Rng;
use tracing::{debug, warn};

use super::{LoreProvider, LoreSource, MissionProvider, MissionSource};

/// Picks one of the bundled lore lines at random.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticLore;

impl StaticLore {
    fn pick() -> String {
        let roll = rand::thread_rng().gen_range(0..merge_content::FALLBACK_LORE.len());
        merge_content::fallback_lore(roll).to_owned()
    }
}

#[async_trait]
impl LoreProvider for StaticLore {
    async fn generate_lore(&self, _kind: ItemKind, _level: u8) -> String {
        Self::pick()
    }
}

/// Serves the bundled fallback missions.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticMissions;

#[async_trait]
impl MissionProvider for StaticMissions {
    async fn generate_missions(&self, player_level: u32) -> Vec<Mission> {
        merge_content::fallback_missions(player_level)
    }
}

/// Wraps a fallible source so it satisfies the infallible provider contract.
pub struct WithFallback<S> {
    source: S,
}

impl<S> WithFallback<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }
}

#[async_trait]
impl<S: LoreSource> LoreProvider for WithFallback<S> {
    async fn generate_lore(&self, kind: ItemKind, level: u8) -> String {
        match self.source.fetch_lore(kind, level).await {
            Ok(text) if !text.trim().is_empty() => text.trim().to_owned(),
            Ok(_) => {
                debug!(target: "runtime::providers", %kind, level, "Empty lore, using fallback");
                StaticLore::pick()
            }
            Err(error) => {
                warn!(target: "runtime::providers", %kind, level, %error, "Lore source failed, using fallback");
                StaticLore::pick()
            }
        }
    }
}

#[async_trait]
impl<S: MissionSource> MissionProvider for WithFallback<S> {
    async fn generate_missions(&self, player_level: u32) -> Vec<Mission> {
        match self.source.fetch_missions(player_level).await {
            Ok(missions) => {
                let total = missions.len();
                let playable: Vec<_> = missions.into_iter().filter(Mission::is_playable).collect();
                if playable.len() < total {
                    debug!(
                        target: "runtime::providers",
                        dropped = total - playable.len(),
                        "Discarded unplayable missions"
                    );
                }
                if playable.is_empty() {
                    warn!(target: "runtime::providers", player_level, "No playable missions, using fallback");
                    return merge_content::fallback_missions(player_level);
                }
                playable
            }
            Err(error) => {
                warn!(target: "runtime::providers", player_level, %error, "Mission source failed, using fallback");
                merge_content::fallback_missions(player_level)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use merge_core::{Difficulty, ItemKind};

    use super::*;
    use crate::providers::ProviderError;

    struct Broken;

    #[async_trait]
    impl LoreSource for Broken {
        async fn fetch_lore(&self, _kind: ItemKind, _level: u8) -> Result<String, ProviderError> {
            Err(ProviderError::Unavailable("offline".into()))
        }
    }

    #[async_trait]
    impl MissionSource for Broken {
        async fn fetch_missions(&self, _level: u32) -> Result<Vec<Mission>, ProviderError> {
            Err(ProviderError::Malformed("not json".into()))
        }
    }

    struct Fixed(Vec<Mission>);

    #[async_trait]
    impl MissionSource for Fixed {
        async fn fetch_missions(&self, _level: u32) -> Result<Vec<Mission>, ProviderError> {
            Ok(self.0.clone())
        }
    }

    fn mission(id: &str, moves: u32) -> Mission {
        Mission {
            id: id.into(),
            name: id.into(),
            description: None,
            energy_cost: 2,
            target_score: 1_000,
            moves,
            reward: ItemKind::Crop,
            difficulty: Difficulty::Easy,
            color: "emerald".into(),
        }
    }

    #[tokio::test]
    async fn failing_lore_falls_back() {
        let lore = WithFallback::new(Broken).generate_lore(ItemKind::Wood, 6).await;
        assert!(merge_content::FALLBACK_LORE.contains(&lore.as_str()));
    }

    #[tokio::test]
    async fn failing_missions_fall_back() {
        let missions = WithFallback::new(Broken).generate_missions(1).await;
        assert_eq!(missions, merge_content::fallback_missions(1));
    }

    #[tokio::test]
    async fn unplayable_missions_are_filtered() {
        let provider = WithFallback::new(Fixed(vec![mission("ok", 10), mission("bad", 0)]));
        let missions = provider.generate_missions(2).await;
        assert_eq!(missions.len(), 1);
        assert_eq!(missions[0].id, "ok");
    }

    #[tokio::test]
    async fn all_unplayable_falls_back() {
        let provider = WithFallback::new(Fixed(vec![mission("bad", 0)]));
        let missions = provider.generate_missions(3).await;
        assert_eq!(missions, merge_content::fallback_missions(3));
    }
}
