//! Battle configuration loader.

use std::path::Path;

use arena_core::BattleConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for battle configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    pub fn load_embedded() -> LoadResult<BattleConfig> {
        Self::from_toml_str(include_str!("../../data/config.toml"))
    }

    /// Load config data from a TOML file. Missing keys keep their defaults.
    pub fn load(path: &Path) -> LoadResult<BattleConfig> {
        let content = read_file(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> LoadResult<BattleConfig> {
        let config: BattleConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;

        if !(1..=BattleConfig::ACTION_THRESHOLD).contains(&config.action_threshold) {
            anyhow::bail!(
                "action_threshold must be between 1 and {}",
                BattleConfig::ACTION_THRESHOLD
            );
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let config = ConfigLoader::from_toml_str("max_turns = 20\n").unwrap();
        assert_eq!(config.max_turns, 20);
        assert_eq!(config.action_threshold, BattleConfig::ACTION_THRESHOLD);
        assert_eq!(config.turn_interval_ms, BattleConfig::TURN_INTERVAL_MS);
    }

    #[test]
    fn embedded_config_matches_defaults() {
        assert_eq!(ConfigLoader::load_embedded().unwrap(), BattleConfig::default());
    }

    #[test]
    fn rejects_out_of_range_threshold() {
        assert!(ConfigLoader::from_toml_str("action_threshold = 0").is_err());
        assert!(ConfigLoader::from_toml_str("action_threshold = 101").is_err());
        assert!(ConfigLoader::from_toml_str("action_threshold = 80").is_ok());
    }

    #[test]
    fn loads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "turn_interval_ms = 250\nmax_trigger_depth = 2\n").unwrap();

        let config = ConfigLoader::load(&path).unwrap();
        assert_eq!(config.turn_interval_ms, 250);
        assert_eq!(config.max_trigger_depth, 2);
    }
}
