#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Configuration management for dlock
//!
//! Configuration is merged from:
//! - Default values (hard-coded)
//! - Configuration file (~/.config/dlock/config.toml)
//! - Environment variables

mod policy;

pub use policy::{AlgorithmChoice, RequestBoundsPolicy};

use dlock_errors::{ConfigError, Error};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub detection: DetectionConfig,

    #[serde(default)]
    pub recovery: RecoveryConfig,
}

/// Detection configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DetectionConfig {
    #[serde(default)]
    pub algorithm: AlgorithmChoice,
    #[serde(default)]
    pub request_bounds: RequestBoundsPolicy,
}

/// Recovery configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecoveryConfig {
    #[serde(default = "default_recovery_enabled")]
    pub enabled: bool,
    #[serde(default = "default_include_preemption")]
    pub include_preemption: bool,
    /// Largest deadlocked set the termination search will enumerate
    #[serde(default = "default_max_search_processes")]
    pub max_search_processes: usize,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            algorithm: AlgorithmChoice::Auto,
            request_bounds: RequestBoundsPolicy::Warn,
        }
    }
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            include_preemption: true,
            max_search_processes: 16, // 2^16 subsets worst case
        }
    }
}

// Default value functions for serde
fn default_recovery_enabled() -> bool {
    true
}

fn default_include_preemption() -> bool {
    true
}

fn default_max_search_processes() -> usize {
    16
}

impl Config {
    /// Get the default config file path
    ///
    /// # Errors
    ///
    /// Returns an error if the system config directory cannot be determined.
    pub fn default_path() -> Result<PathBuf, Error> {
        let config_dir = dirs::config_dir().ok_or_else(|| ConfigError::NotFound {
            path: "config directory".to_string(),
        })?;
        Ok(config_dir.join("dlock").join("config.toml"))
    }

    /// Load configuration from file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or contains invalid TOML.
    pub fn load_from_file(path: &Path) -> Result<Self, Error> {
        let contents = fs::read_to_string(path).map_err(|_| ConfigError::NotFound {
            path: path.display().to_string(),
        })?;

        toml::from_str(&contents)
            .map_err(|e| ConfigError::ParseError {
                message: e.to_string(),
            })
            .map_err(Into::into)
    }

    /// Load configuration with fallback to defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file exists but cannot be read
    /// or contains invalid TOML syntax.
    pub fn load() -> Result<Self, Error> {
        let config_path = Self::default_path()?;

        if config_path.exists() {
            Self::load_from_file(&config_path)
        } else {
            tracing::debug!(path = %config_path.display(), "no config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Load configuration from an optional path or use default
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or parsed
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, Error> {
        match path {
            Some(config_path) => Self::load_from_file(config_path),
            None => Self::load(),
        }
    }

    /// Save configuration to a specific path
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized or the
    /// file cannot be written.
    pub fn save_to(&self, path: &Path) -> Result<(), Error> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::WriteError {
                path: parent.display().to_string(),
                error: e.to_string(),
            })?;
        }

        let toml_string =
            toml::to_string_pretty(self).map_err(|e| ConfigError::SerializeError {
                error: e.to_string(),
            })?;

        let content = format!("# dlock configuration\n\n{toml_string}");

        fs::write(path, content).map_err(|e| ConfigError::WriteError {
            path: path.display().to_string(),
            error: e.to_string(),
        })?;

        Ok(())
    }

    /// Merge with environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if an environment variable holds a value that cannot
    /// be parsed into the expected type.
    pub fn merge_env(&mut self) -> Result<(), Error> {
        // DLOCK_ALGORITHM
        if let Ok(algorithm) = std::env::var("DLOCK_ALGORITHM") {
            self.detection.algorithm =
                algorithm
                    .parse()
                    .map_err(|()| ConfigError::InvalidValue {
                        field: "DLOCK_ALGORITHM".to_string(),
                        value: algorithm.clone(),
                    })?;
        }

        // DLOCK_REQUEST_BOUNDS
        if let Ok(bounds) = std::env::var("DLOCK_REQUEST_BOUNDS") {
            self.detection.request_bounds =
                bounds.parse().map_err(|()| ConfigError::InvalidValue {
                    field: "DLOCK_REQUEST_BOUNDS".to_string(),
                    value: bounds.clone(),
                })?;
        }

        // DLOCK_RECOVERY
        if let Ok(recovery) = std::env::var("DLOCK_RECOVERY") {
            self.recovery.enabled = match recovery.as_str() {
                "true" | "1" | "yes" => true,
                "false" | "0" | "no" => false,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        field: "DLOCK_RECOVERY".to_string(),
                        value: recovery,
                    }
                    .into())
                }
            };
        }

        // DLOCK_MAX_SEARCH
        if let Ok(limit) = std::env::var("DLOCK_MAX_SEARCH") {
            self.recovery.max_search_processes =
                limit.parse().map_err(|_| ConfigError::InvalidValue {
                    field: "DLOCK_MAX_SEARCH".to_string(),
                    value: limit,
                })?;
        }

        Ok(())
    }
}
