//! Configuration loading and validation.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

use crate::models::{DuplicatePolicy, LeagueId, PointsRegistry, PointsSystem};

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

fn lenient_system<'de, D>(deserializer: D) -> Result<Option<PointsSystem>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw.map(|value| PointsSystem::from_json_lenient(&value)))
}

fn lenient_systems<'de, D>(deserializer: D) -> Result<BTreeMap<String, PointsSystem>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = BTreeMap::<String, serde_json::Value>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|(league, value)| (league, PointsSystem::from_json_lenient(&value)))
        .collect())
}

/// Points systems: a fallback plus per-league overrides.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PointsConfig {
    /// Used for open events and unconfigured leagues. Legacy when absent.
    #[serde(default, deserialize_with = "lenient_system", skip_serializing_if = "Option::is_none")]
    pub default: Option<PointsSystem>,

    /// Keyed by league id
    #[serde(default, deserialize_with = "lenient_systems")]
    pub leagues: BTreeMap<String, PointsSystem>,
}

impl PointsConfig {
    pub fn registry(&self) -> PointsRegistry {
        let default = self.default.clone().unwrap_or_default();
        self.leagues
            .iter()
            .fold(PointsRegistry::new(default), |registry, (league, system)| {
                registry.with_league(LeagueId::from(league.as_str()), system.clone())
            })
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub duplicate_policy: DuplicatePolicy,

    #[serde(default)]
    pub points: PointsConfig,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
            duplicate_policy: DuplicatePolicy::default(),
            points: PointsConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path` if it exists, otherwise use defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            info!("Loading config from {:?}", path);
            Self::from_file(path)
        } else {
            info!("No config at {:?}, using defaults", path);
            Ok(Self::default())
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.log_level.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "Log level must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LeagueScoring, DEFAULT_LEGACY_MAJOR_MULTIPLIER};
    use tempfile::TempDir;

    const SAMPLE: &str = r#"
data_dir = "/var/lib/league"
log_level = "debug"
duplicate_policy = "best_per_player"

[points.default]
mode = "legacy"
base = 5
major_multiplier = 3

[points.leagues.sunday-club]
mode = "league"
participation = 2
birdie_bonus = 1

[points.leagues.sunday-club.placement]
1 = 10
2 = 6
3 = 4
"#;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();

        assert_eq!(config.data_dir, PathBuf::from("./data"));
        assert_eq!(config.log_level, "info");
        assert_eq!(config.duplicate_policy, DuplicatePolicy::KeepAll);
        assert!(config.points.default.is_none());
        assert!(config.points.leagues.is_empty());
    }

    #[test]
    fn test_parse_full_config() {
        let config = AppConfig::from_toml(SAMPLE).unwrap();

        assert_eq!(config.data_dir, PathBuf::from("/var/lib/league"));
        assert_eq!(config.duplicate_policy, DuplicatePolicy::BestPerPlayer);

        match config.points.leagues.get("sunday-club") {
            Some(PointsSystem::League(league)) => {
                assert_eq!(league.placement_points(Some(1)), 10);
                assert_eq!(league.placement_points(Some(4)), 0);
                assert_eq!(league.participation_points(), 2);
            }
            other => panic!("expected league mode, got {:?}", other),
        }

        match &config.points.default {
            Some(PointsSystem::Legacy(legacy)) => {
                assert_eq!(legacy.base_points(), 5.0);
                assert_eq!(legacy.major_multiplier(), 3.0);
            }
            other => panic!("expected legacy default, got {:?}", other),
        }
    }

    #[test]
    fn test_registry_from_config() {
        let config = AppConfig::from_toml(SAMPLE).unwrap();
        let registry = config.points.registry();

        assert_eq!(
            registry
                .for_league(Some(&LeagueId::from("sunday-club")))
                .mode_name(),
            "league"
        );
        assert_eq!(registry.for_league(None).mode_name(), "legacy");
    }

    #[test]
    fn test_malformed_points_are_coerced() {
        let config = AppConfig::from_toml(
            r#"
[points.leagues.broken]
mode = "league"
participation = "plenty"

[points.leagues.unknown-mode]
mode = "matchplay"
"#,
        )
        .unwrap();

        match config.points.leagues.get("broken") {
            Some(PointsSystem::League(league)) => {
                assert_eq!(league, &LeagueScoring::default());
            }
            other => panic!("expected league mode, got {:?}", other),
        }
        assert_eq!(
            config.points.leagues.get("unknown-mode"),
            Some(&PointsSystem::default())
        );
    }

    #[test]
    fn test_config_validation_ok() {
        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn test_config_validation_empty_log_level() {
        let mut config = AppConfig::default();
        config.log_level = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_multiplier_in_one_league_does_not_reject_config() {
        let config = AppConfig::from_toml(
            r#"
[points.leagues.x]
mode = "legacy"
major_multiplier = 0

[points.leagues.y]
mode = "legacy"
major_multiplier = 3
"#,
        )
        .unwrap();

        match config.points.leagues.get("x") {
            Some(PointsSystem::Legacy(legacy)) => {
                assert_eq!(legacy.major_multiplier(), DEFAULT_LEGACY_MAJOR_MULTIPLIER);
            }
            other => panic!("expected legacy mode, got {:?}", other),
        }
        match config.points.leagues.get("y") {
            Some(PointsSystem::Legacy(legacy)) => assert_eq!(legacy.major_multiplier(), 3.0),
            other => panic!("expected legacy mode, got {:?}", other),
        }
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let config = AppConfig::load_or_default(&temp_dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, SAMPLE).unwrap();

        let config = AppConfig::from_file(&path).unwrap();
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let toml_str = toml::to_string(&config).unwrap();

        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(config.data_dir, parsed.data_dir);
        assert_eq!(config.duplicate_policy, parsed.duplicate_policy);
    }
}
