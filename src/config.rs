use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, Result};

/// Default cap on the number of candidates a single scan reports.
pub const DEFAULT_MAX_RESULTS: usize = 5000;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub scanner: ScannerConfig,
    pub cleaner: CleanerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScannerConfig {
    /// Root used when no path is given on the command line
    pub default_root: Option<PathBuf>,
    /// Stop scanning after this many candidates
    pub max_results: usize,
    /// Measure the size of every candidate
    pub compute_sizes: bool,
    /// Warn when scanning `/` or the home directory
    pub warn_broad_root: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanerConfig {
    /// Parallel delete jobs
    pub parallel_jobs: usize,
    /// Refuse to delete paths outside the scanned root
    pub confine_to_root: bool,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            default_root: None,
            max_results: DEFAULT_MAX_RESULTS,
            compute_sizes: true,
            warn_broad_root: true,
        }
    }
}

impl Default for CleanerConfig {
    fn default() -> Self {
        Self {
            parallel_jobs: 4,
            confine_to_root: true,
        }
    }
}

impl Config {
    /// Load configuration from `path`, or from the default location if it exists.
    ///
    /// A missing default file yields `Config::default()`; a missing explicit
    /// file is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match Self::default_path() {
                Some(p) if p.is_file() => p,
                _ => return Ok(Self::default()),
            },
        };

        let content = fs::read_to_string(&path).map_err(|source| ConfigError::ReadError {
            path: path.clone(),
            source,
        })?;

        let config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ParseError {
                path: path.clone(),
                source,
            })?;

        config.validate()?;
        tracing::debug!(path = %path.display(), "Loaded config file");
        Ok(config)
    }

    /// `<config_dir>/venv-sweeper/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("venv-sweeper").join("config.toml"))
    }

    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.scanner.max_results == 0 {
            return Err(ConfigError::Invalid(
                "scanner.max_results must be at least 1".into(),
            ));
        }
        if self.cleaner.parallel_jobs == 0 {
            return Err(ConfigError::Invalid(
                "cleaner.parallel_jobs must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.scanner.max_results, DEFAULT_MAX_RESULTS);
        assert_eq!(config.cleaner.parallel_jobs, 4);
    }

    #[test]
    fn config_serializes_to_toml() {
        let config = Config::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[scanner]"));
        assert!(toml_str.contains("[cleaner]"));
    }

    #[test]
    fn zero_jobs_is_rejected() {
        let mut config = Config::default();
        config.cleaner.parallel_jobs = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn default_scanner_is_safe() {
        let config = ScannerConfig::default();
        assert!(config.default_root.is_none());
        assert!(config.warn_broad_root);
        assert!(CleanerConfig::default().confine_to_root);
    }
}
