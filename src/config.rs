use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::ContainerError;
use crate::hash_table::TableConfig;
use crate::ranking::PopularityWeights;

/// Main configuration structure for stockpile
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct StockpileConfig {
    /// Sizing of the hash tables built while indexing records
    #[serde(default)]
    pub table: TableConfig,

    /// Ranking defaults
    #[serde(default)]
    pub ranking: RankingConfig,

    /// Display settings
    #[serde(default)]
    pub display: DisplayConfig,
}

/// Ranking defaults, overridable from the command line
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RankingConfig {
    /// Weights of the blended popularity score
    #[serde(default)]
    pub weights: PopularityWeights,

    /// How many products a ranking shows
    #[serde(default = "default_top")]
    pub top: usize,
}

fn default_top() -> usize {
    10
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            weights: PopularityWeights::default(),
            top: default_top(),
        }
    }
}

/// Display configuration options
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DisplayConfig {
    /// Whether to color terminal output (default: true)
    #[serde(default = "default_true")]
    pub color: bool,
}

fn default_true() -> bool {
    true
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self { color: true }
    }
}

impl StockpileConfig {
    /// Load config from custom path or default XDG location
    pub fn load(custom_path: Option<&PathBuf>) -> Result<Self, ConfigError> {
        let path = if let Some(p) = custom_path {
            p.clone()
        } else {
            match Self::default_config_path() {
                Ok(p) => p,
                Err(_) => return Ok(Self::default()),
            }
        };

        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let contents =
            std::fs::read_to_string(&path).map_err(|e| ConfigError::Io(path.clone(), e))?;

        let config: Self =
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(path.clone(), e))?;
        config.validate()
    }

    /// Get default config path: ~/.config/stockpile/config.toml
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;

        Ok(config_dir.join("stockpile").join("config.toml"))
    }

    /// Normalize the table sizing and reject unusable values.
    pub fn validate(mut self) -> Result<Self, ConfigError> {
        self.table = self.table.validate()?;
        Ok(self)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read config at {}: {}", .0.display(), .1)]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Failed to parse config at {}: {}", .0.display(), .1)]
    Parse(PathBuf, #[source] toml::de::Error),

    #[error("Invalid config: {0}")]
    Invalid(#[from] ContainerError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_config_defaults() {
        let config = StockpileConfig::default();

        assert_eq!(config.table, TableConfig::default());
        assert_eq!(config.ranking.top, 10);
        assert_eq!(config.ranking.weights, PopularityWeights::default());
        assert!(config.display.color);
    }

    #[test]
    fn test_config_missing_file_uses_defaults() {
        let path = PathBuf::from("/nonexistent/stockpile/config.toml");
        let config = StockpileConfig::load(Some(&path)).unwrap();

        assert_eq!(config.table.initial_capacity, 16);
    }

    #[test]
    fn test_config_partial_file() {
        let file = write_config(
            r#"
            [table]
            load_factor = 0.5

            [ranking]
            top = 3

            [ranking.weights]
            sold = 1.0
            "#,
        );

        let config = StockpileConfig::load(Some(&file.path().to_path_buf())).unwrap();

        assert_eq!(config.table.load_factor, 0.5);
        assert_eq!(config.table.initial_capacity, 16);
        assert_eq!(config.ranking.top, 3);
        assert_eq!(config.ranking.weights.sold, 1.0);
        assert_eq!(config.ranking.weights.reviews, 0.4);
        assert!(config.display.color);
    }

    #[test]
    fn test_config_raises_small_capacity() {
        let file = write_config("[table]\ninitial_capacity = 1\n");

        let config = StockpileConfig::load(Some(&file.path().to_path_buf())).unwrap();

        assert_eq!(config.table.initial_capacity, 4);
    }

    #[test]
    fn test_config_rejects_bad_load_factor() {
        let file = write_config("[table]\nload_factor = 1.5\n");

        let result = StockpileConfig::load(Some(&file.path().to_path_buf()));

        assert!(matches!(
            result,
            Err(ConfigError::Invalid(ContainerError::InvalidLoadFactor(_)))
        ));
    }

    #[test]
    fn test_config_rejects_oversized_capacity() {
        let file = write_config("[table]\ninitial_capacity = 4000000000\n");

        let result = StockpileConfig::load(Some(&file.path().to_path_buf()));

        assert!(matches!(
            result,
            Err(ConfigError::Invalid(ContainerError::InvalidCapacity(4_000_000_000)))
        ));
    }

    #[test]
    fn test_config_parse_error() {
        let file = write_config("[table\n");

        let result = StockpileConfig::load(Some(&file.path().to_path_buf()));

        assert!(matches!(result, Err(ConfigError::Parse(..))));
    }
}
