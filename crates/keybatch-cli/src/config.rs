//! CLI configuration management
//!
//! A TOML file with three optional sections:
//!
//! ```toml
//! policy = "least-count"
//! seed = 7
//!
//! [scheduler]
//! station_count = 100
//! transaction_size = 10
//! batch_count = 1000
//!
//! [workload]
//! kind = "hot-cold"
//! hot_keys = 1000
//! ```
//!
//! Command-line flags override values from the file.

use crate::error::CliError;
use keybatch_scheduler::{PolicyKind, SchedulerConfig};
use keybatch_workload::WorkloadConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// CLI configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Eviction policy
    #[serde(default)]
    pub policy: PolicyKind,
    /// Seed for random workloads and the random policy
    #[serde(default)]
    pub seed: u64,
    /// Scheduler parameters
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    /// Transaction source
    #[serde(default)]
    pub workload: WorkloadConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            policy: PolicyKind::default(),
            seed: 0,
            scheduler: SchedulerConfig::default(),
            workload: WorkloadConfig::default(),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".keybatch"))
    }

    /// Get the default config file path
    pub fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|d| d.join("config.toml"))
    }

    /// Load configuration
    ///
    /// An explicit path must exist. Without one, the default path is used
    /// when present, and built-in defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self, CliError> {
        match path {
            Some(path) => Self::from_file(path),
            None => match Self::config_path() {
                Some(default) if default.exists() => Self::from_file(&default),
                _ => Ok(Self::default()),
            },
        }
    }

    /// Read and parse a config file
    pub fn from_file(path: &Path) -> Result<Self, CliError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Render as TOML
    pub fn to_toml(&self) -> Result<String, CliError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use keybatch_scheduler::FinalFlush;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.policy, PolicyKind::LeastCount);
        assert_eq!(config.seed, 0);
        assert_eq!(config.scheduler.station_count, 100);
        assert_eq!(config.workload.kind(), "hot-cold");
    }

    #[test]
    fn test_config_deserialize() {
        let toml = r#"
            policy = "oldest"
            seed = 42

            [scheduler]
            station_count = 8
            final_flush = "drain"

            [workload]
            kind = "cyclic"
            transactions = [[0, 1], [1, 2]]
            domain = 3
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.policy, PolicyKind::Oldest);
        assert_eq!(config.seed, 42);
        assert_eq!(config.scheduler.station_count, 8);
        assert_eq!(config.scheduler.transaction_size, 10);
        assert_eq!(config.scheduler.final_flush, FinalFlush::Drain);
        assert_eq!(config.workload.kind(), "cyclic");
    }

    #[test]
    fn test_config_partial_file() {
        let config: Config = toml::from_str("seed = 3").unwrap();
        assert_eq!(config.seed, 3);
        assert_eq!(config.scheduler, SchedulerConfig::default());
    }

    #[test]
    fn test_config_roundtrip_toml() {
        let config = Config::default();
        let text = config.to_toml().unwrap();
        assert!(text.contains("station_count"));
        assert!(text.contains("hot-cold"));
        let back: Config = toml::from_str(&text).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "policy = \"most-count\"").unwrap();
        writeln!(file, "[scheduler]").unwrap();
        writeln!(file, "batch_count = 5").unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.policy, PolicyKind::MostCount);
        assert_eq!(config.scheduler.batch_count, 5);
    }

    #[test]
    fn test_load_missing_file() {
        let result = Config::load(Some(Path::new("/nonexistent/keybatch.toml")));
        assert!(matches!(result, Err(CliError::Io(_))));
    }

    #[test]
    fn test_load_bad_toml() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[scheduler").unwrap();
        assert!(matches!(
            Config::from_file(file.path()),
            Err(CliError::Config(_))
        ));
    }
}
