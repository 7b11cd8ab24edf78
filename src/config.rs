//! Configuration for the metering aggregator.
//!
//! Configuration is loaded with the following priority (highest to lowest):
//! 1. Environment variables (`SESSION_METER_*`)
//! 2. Configuration file (JSON)
//! 3. Default values

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::Result;

/// Aggregator configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MeterConfig {
    /// Failure-recovery settings.
    pub recovery: RecoverySection,
    /// Logging settings.
    pub logging: LoggingSection,
}

/// Failure-recovery configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecoverySection {
    /// Consecutive automatic stream restarts allowed after resume failures
    /// before a logical session is dropped. The counter resets on every
    /// caller-driven begin.
    pub max_recovery_attempts: u32,
}

impl Default for RecoverySection {
    fn default() -> Self {
        Self {
            max_recovery_attempts: 3,
        }
    }
}

/// Logging configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level (error, warn, info, debug, trace).
    pub level: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl MeterConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Apply environment variable overrides.
    pub fn apply_env(&mut self) {
        if let Ok(attempts) = std::env::var("SESSION_METER_MAX_RECOVERY_ATTEMPTS") {
            if let Ok(attempts) = attempts.parse() {
                self.recovery.max_recovery_attempts = attempts;
            }
        }

        if let Ok(level) = std::env::var("SESSION_METER_LOG_LEVEL") {
            self.logging.level = level;
        } else if let Ok(level) = std::env::var("RUST_LOG") {
            self.logging.level = level;
        }
    }

    /// Load configuration with the full priority chain.
    ///
    /// Priority: env vars > config file > defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env();
        Ok(config)
    }

    /// Get the log level filter string, for
    /// [`logging::init_with_level`](crate::logging::init_with_level).
    pub fn log_filter(&self) -> &str {
        &self.logging.level
    }
}
