//! Client configuration structures and loaders.
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Configuration required to bootstrap a session.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Player identity. `None` plays as a fresh guest.
    pub session_id: Option<String>,
    pub save_data_dir: Option<PathBuf>,
    pub log_dir: Option<PathBuf>,
    /// TOML file overriding [`merge_core::GameConfig`] defaults.
    pub game_config_path: Option<PathBuf>,
    /// RON item catalog replacing the built-in one.
    pub items_path: Option<PathBuf>,
    /// RON parcel map used for new sessions.
    pub parcels_path: Option<PathBuf>,
    pub autoplay: Duration,
    pub autoplay_step: Duration,
    pub autosave_debounce: Duration,
    pub seed: Option<u64>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            session_id: None,
            save_data_dir: None,
            log_dir: None,
            game_config_path: None,
            items_path: None,
            parcels_path: None,
            autoplay: Duration::from_secs(30),
            autoplay_step: Duration::from_millis(250),
            autosave_debounce: Duration::from_millis(1_000),
            seed: None,
        }
    }
}

impl ClientConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `GAME_SESSION_ID` - Player id for the save file (default: guest)
    /// - `SAVE_DATA_DIR` - Directory for save data (default: platform-specific)
    /// - `LOG_DIR` - Directory for log files (default: platform-specific)
    /// - `GAME_CONFIG_PATH` - TOML game configuration (default: built-in)
    /// - `ITEMS_PATH` - RON item catalog (default: built-in)
    /// - `PARCELS_PATH` - RON parcel map (default: built-in)
    /// - `AUTOPLAY_SECONDS` - How long the headless session plays (default: 30)
    /// - `AUTOPLAY_STEP_MS` - Pause between autoplay moves (default: 250)
    /// - `AUTOSAVE_DEBOUNCE_MS` - Quiet period before autosave (default: 1000)
    /// - `GAME_SEED` - Fixed RNG seed (default: random)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        config.session_id = env::var("GAME_SESSION_ID")
            .ok()
            .filter(|id| !id.trim().is_empty());
        config.save_data_dir = env::var("SAVE_DATA_DIR").ok().map(PathBuf::from);
        config.log_dir = env::var("LOG_DIR").ok().map(PathBuf::from);
        config.game_config_path = env::var("GAME_CONFIG_PATH").ok().map(PathBuf::from);
        config.items_path = env::var("ITEMS_PATH").ok().map(PathBuf::from);
        config.parcels_path = env::var("PARCELS_PATH").ok().map(PathBuf::from);

        if let Some(seconds) = read_env::<u64>("AUTOPLAY_SECONDS") {
            config.autoplay = Duration::from_secs(seconds);
        }
        if let Some(ms) = read_env::<u64>("AUTOPLAY_STEP_MS") {
            config.autoplay_step = Duration::from_millis(ms.max(1));
        }
        if let Some(ms) = read_env::<u64>("AUTOSAVE_DEBOUNCE_MS") {
            config.autosave_debounce = Duration::from_millis(ms);
        }
        config.seed = read_env::<u64>("GAME_SEED");

        config
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
