//! Configuration for the registry runtime

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::ConfigError;

const LOG_LEVELS: [&str; 6] = ["off", "error", "warn", "info", "debug", "trace"];

/// Top-level configuration, usually loaded from YAML
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoreConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub sequencer: SequencerConfig,
    #[serde(default)]
    pub snapshot: SnapshotConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequencerConfig {
    /// Update passes kept in the timing history
    #[serde(default = "default_stats_history")]
    pub stats_history: usize,
}

fn default_stats_history() -> usize {
    100
}

impl Default for SequencerConfig {
    fn default() -> Self {
        Self {
            stats_history: default_stats_history(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotConfig {
    /// Write a snapshot every N frames; 0 disables snapshots
    #[serde(default)]
    pub every_frames: u64,
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
}

fn default_output_dir() -> String {
    "snapshots".to_string()
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            every_frames: 0,
            output_dir: default_output_dir(),
        }
    }
}

impl CoreConfig {
    /// Load configuration from YAML file
    pub fn from_yaml<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        let config: CoreConfig = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to YAML file
    pub fn to_yaml<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let yaml = serde_yaml::to_string(self)?;
        fs::write(path, yaml)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let level = self.logging.level.to_ascii_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(ConfigError::Validation(format!(
                "unknown log level '{}'",
                self.logging.level
            )));
        }

        if self.snapshot.every_frames > 0 && self.snapshot.output_dir.trim().is_empty() {
            return Err(ConfigError::Validation(
                "snapshot output_dir must be set when snapshots are enabled".into(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = CoreConfig::from_yaml_str("{}").unwrap();
        assert_eq!(config, CoreConfig::default());
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.sequencer.stats_history, 100);
        assert_eq!(config.snapshot.every_frames, 0);
    }

    #[test]
    fn test_partial_sections() {
        let config = CoreConfig::from_yaml_str(
            "logging:\n  level: debug\nsnapshot:\n  every_frames: 30\n",
        )
        .unwrap();

        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.snapshot.every_frames, 30);
        assert_eq!(config.snapshot.output_dir, "snapshots");
        assert_eq!(config.sequencer.stats_history, 100);
    }

    #[test]
    fn test_validation_failures() {
        let err = CoreConfig::from_yaml_str("logging:\n  level: loud\n").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));

        let err = CoreConfig::from_yaml_str("snapshot:\n  every_frames: 5\n  output_dir: ''\n")
            .unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));

        let err = CoreConfig::from_yaml_str("sequencer: fast").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
    }

    #[test]
    fn test_config_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("core.yaml");

        let mut config = CoreConfig::default();
        config.sequencer.stats_history = 16;
        config.to_yaml(&path).unwrap();

        let loaded = CoreConfig::from_yaml(&path).unwrap();
        assert_eq!(loaded, config);
    }
}
