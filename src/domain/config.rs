//! Config - Application Configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    CONNECT_TIMEOUT_SECS, DEFAULT_PROVIDER_URL, REQUEST_HISTORY_CAPACITY, REQUEST_TIMEOUT_SECS,
};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Remote data provider
    pub provider: ProviderConfig,
    /// Query session behaviour
    pub session: SessionConfig,
    /// Logging output
    pub logging: LoggingConfig,
}

/// Remote data provider configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ProviderConfig {
    /// Base URL, e.g. "http://localhost:8000"
    pub base_url: String,
    /// Whole-request timeout
    pub timeout_secs: u64,
    /// Connection establishment timeout
    pub connect_timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_PROVIDER_URL.to_string(),
            timeout_secs: REQUEST_TIMEOUT_SECS,
            connect_timeout_secs: CONNECT_TIMEOUT_SECS,
        }
    }
}

impl ProviderConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

/// What to do with a response that arrives after a newer request was issued
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponsePolicy {
    /// Apply only the response to the most recently issued request
    #[default]
    LatestIssued,
    /// Apply every response as it arrives; the last one to arrive wins
    LastArrived,
}

/// Query session configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SessionConfig {
    pub response_policy: ResponsePolicy,
    /// Number of request records kept for the history view
    pub history_capacity: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            response_policy: ResponsePolicy::default(),
            history_capacity: REQUEST_HISTORY_CAPACITY,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset
    pub level: String,
    /// Also write a daily-rolling log file into the data directory
    pub file: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: false,
        }
    }
}
