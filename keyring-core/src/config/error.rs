//! Configuration error types

use crate::core_keyring::SealError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Failed to read configuration file {}: {reason}", path.display())]
    FileRead { path: PathBuf, reason: String },

    #[error("Failed to write configuration file {}: {reason}", path.display())]
    FileWrite { path: PathBuf, reason: String },

    #[error("Failed to parse configuration file {}: {reason}", path.display())]
    Parse { path: PathBuf, reason: String },

    #[error("Failed to serialize configuration: {0}")]
    Serialize(String),

    /// A `KEYRING_*` variable held an unusable value
    #[error("Invalid value {value:?} for {variable}: {reason}")]
    InvalidVariable {
        variable: String,
        value: String,
        reason: String,
    },

    /// The `[kdf]` section does not form usable Argon2id parameters
    #[error("Invalid KDF configuration: {0}")]
    Kdf(#[from] SealError),
}
