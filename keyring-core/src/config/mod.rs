//! Configuration management for the key ring library
//!
//! Defaults, optionally overridden from a TOML file or `KEYRING_*`
//! environment variables, then validated before use.

use crate::core_keyring::{ExpiryPolicy, KdfParams};
use crate::logging::{LogConfig, LogLevel};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use std::str::FromStr;

mod error;

pub use error::ConfigError;

/// Main library configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Key ring behavior
    pub keyring: KeyRingConfig,

    /// Passphrase key derivation cost used when locking keys
    pub kdf: KdfConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Key ring behavior
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyRingConfig {
    /// Policy used by `KeyRing::filter_unexpired_now_with`
    pub expiry_policy: ExpiryPolicy,
}

/// Argon2id cost settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KdfConfig {
    /// Memory cost in KiB
    pub memory_kib: u32,

    /// Number of passes
    pub iterations: u32,

    /// Degree of parallelism
    pub parallelism: u32,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: LogLevel,

    /// Enable JSON formatting
    pub json_format: bool,

    /// Include target module
    pub with_target: bool,
}

impl Default for KdfConfig {
    fn default() -> Self {
        let params = KdfParams::default();
        Self {
            memory_kib: params.memory_kib,
            iterations: params.iterations,
            parallelism: params.parallelism,
        }
    }
}

impl KdfConfig {
    /// Validated KDF parameters for `Key::lock`
    pub fn to_params(&self) -> Result<KdfParams, ConfigError> {
        KdfParams::new(self.memory_kib, self.iterations, self.parallelism)
            .map_err(ConfigError::Kdf)
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            json_format: false,
            with_target: true,
        }
    }
}

impl LoggingConfig {
    pub fn to_log_config(&self) -> LogConfig {
        LogConfig::new(self.level)
            .with_target(self.with_target)
            .json_format(self.json_format)
    }
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Variables follow the pattern `KEYRING_<SECTION>_<KEY>`, for example
    /// `KEYRING_KDF_MEMORY_KIB=65536`. Unset variables keep their defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Same as `from_env`, reading variables through `lookup`
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        // Key ring config
        if let Some(policy) = lookup("KEYRING_EXPIRY_POLICY") {
            config.keyring.expiry_policy = ExpiryPolicy::from_str(&policy).ok_or_else(|| {
                invalid_variable(
                    "KEYRING_EXPIRY_POLICY",
                    &policy,
                    "expected whole_ring or prune_keys",
                )
            })?;
        }

        // KDF config
        if let Some(memory) = lookup("KEYRING_KDF_MEMORY_KIB") {
            config.kdf.memory_kib = parse_var("KEYRING_KDF_MEMORY_KIB", &memory)?;
        }
        if let Some(iterations) = lookup("KEYRING_KDF_ITERATIONS") {
            config.kdf.iterations = parse_var("KEYRING_KDF_ITERATIONS", &iterations)?;
        }
        if let Some(parallelism) = lookup("KEYRING_KDF_PARALLELISM") {
            config.kdf.parallelism = parse_var("KEYRING_KDF_PARALLELISM", &parallelism)?;
        }

        // Logging config
        if let Some(level) = lookup("KEYRING_LOG_LEVEL") {
            config.logging.level = LogLevel::from_str(&level).ok_or_else(|| {
                invalid_variable("KEYRING_LOG_LEVEL", &level, "unknown log level")
            })?;
        }
        if let Some(json) = lookup("KEYRING_LOG_JSON") {
            config.logging.json_format = parse_var("KEYRING_LOG_JSON", &json)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&contents).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.kdf.to_params()?;
        Ok(())
    }

    /// Save configuration to a TOML file
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents =
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?;

        std::fs::write(path, contents).map_err(|e| ConfigError::FileWrite {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        Ok(())
    }
}

fn invalid_variable(variable: &str, value: &str, reason: impl ToString) -> ConfigError {
    ConfigError::InvalidVariable {
        variable: variable.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_var<T>(variable: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e| invalid_variable(variable, raw, e))
}
