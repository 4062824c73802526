//! Logging for the key ring library
//!
//! The library itself only emits `tracing` events. Applications embedding
//! it call `init_logging` (or install their own subscriber) to see them.
//! `KEYRING_LOG` overrides the configured level with a full `EnvFilter`
//! directive, e.g. `KEYRING_LOG=keyring_core::core_keyring=trace`.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod error;
mod level;

pub use error::LoggingError;
pub use level::LogLevel;

/// Environment variable holding a filter directive
pub const LOG_ENV_VAR: &str = "KEYRING_LOG";

/// Configuration for the logging subsystem
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Minimum level when `KEYRING_LOG` is unset
    pub level: LogLevel,
    /// Include the emitting module path
    pub with_target: bool,
    /// Emit one JSON object per event
    pub json_format: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            with_target: true,
            json_format: false,
        }
    }
}

impl LogConfig {
    pub fn new(level: LogLevel) -> Self {
        Self {
            level,
            ..Default::default()
        }
    }

    pub fn with_target(mut self, enabled: bool) -> Self {
        self.with_target = enabled;
        self
    }

    pub fn json_format(mut self, enabled: bool) -> Self {
        self.json_format = enabled;
        self
    }

    /// The filter this config installs, honoring `KEYRING_LOG`
    pub fn env_filter(&self) -> Result<EnvFilter, LoggingError> {
        match std::env::var(LOG_ENV_VAR) {
            Ok(directive) if !directive.trim().is_empty() => EnvFilter::try_new(&directive)
                .map_err(|e| LoggingError::InvalidConfiguration(format!("{}: {}", LOG_ENV_VAR, e))),
            _ => Ok(EnvFilter::new(self.level.as_str())),
        }
    }
}

/// Initialize logging with the default configuration
///
/// # Example
/// ```
/// use keyring_core::logging::init_logging;
///
/// // A second initialization in the same process reports an error
/// let _ = init_logging();
/// ```
pub fn init_logging() -> Result<(), LoggingError> {
    init_logging_with_config(LogConfig::default())
}

/// Initialize logging with a custom configuration
///
/// Fails if a global subscriber is already installed.
pub fn init_logging_with_config(config: LogConfig) -> Result<(), LoggingError> {
    let env_filter = config.env_filter()?;
    let fmt_layer = fmt::layer().with_target(config.with_target);

    let result = if config.json_format {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer.json())
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()
    };

    result.map_err(|e| LoggingError::InitializationFailed(e.to_string()))
}
