//! Game configuration loader.

use std::path::Path;

use merge_core::GameConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for game configuration from TOML files.
///
/// Every field is optional; omitted sections keep their defaults.
pub struct ConfigLoader;

impl ConfigLoader {
    pub fn load(path: &Path) -> LoadResult<GameConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<GameConfig> {
        let config: GameConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;

        if config.grid_size == 0 {
            anyhow::bail!("grid_size must be positive");
        }
        if config.economy.tick_ms == 0 {
            anyhow::bail!("economy.tick_ms must be positive");
        }
        if config.economy.income_cycle_ms == 0 || config.economy.frenzy_income_cycle_ms == 0 {
            anyhow::bail!("economy income cycles must be positive");
        }
        if config.match3.rows == 0 || config.match3.cols == 0 {
            anyhow::bail!("match3.rows and match3.cols must be positive");
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loaders::test_support::write_temp;

    #[test]
    fn partial_file_keeps_defaults() {
        let file = write_temp(
            r#"
grid_size = 5

[economy]
income_cycle_ms = 4000

[combo]
threshold = 4
"#,
        );

        let config = ConfigLoader::load(file.path()).expect("config loads");
        assert_eq!(config.grid_size, 5);
        assert_eq!(config.economy.income_cycle_ms, 4_000);
        assert_eq!(config.economy.tick_ms, 100);
        assert_eq!(config.combo.threshold, 4);
        assert_eq!(config.combo.window_ms, 2_000);
        assert_eq!(config.match3, GameConfig::new().match3);
    }

    #[test]
    fn zero_grid_is_rejected() {
        let err = ConfigLoader::parse("grid_size = 0").unwrap_err();
        assert!(err.to_string().contains("grid_size"));
    }

    #[test]
    fn empty_match3_board_is_rejected() {
        let err = ConfigLoader::parse("[match3]\ncols = 0").unwrap_err();
        assert!(err.to_string().contains("match3"));

        assert!(ConfigLoader::parse("[match3]\nrows = 0").is_err());
    }

    #[test]
    fn zero_income_cycle_is_rejected() {
        assert!(ConfigLoader::parse("[economy]\nincome_cycle_ms = 0").is_err());
        assert!(ConfigLoader::parse("[economy]\nfrenzy_income_cycle_ms = 0").is_err());
    }

    #[test]
    fn missing_file_reports_path() {
        let err = ConfigLoader::load(Path::new("/nonexistent/merge.toml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/merge.toml"));
    }
}
