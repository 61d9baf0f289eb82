//! Error types for Stock Browser
//!
//! Centralized error handling using snafu for ergonomic error definitions.

use snafu::Snafu;

/// Main error type for the application
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    /// Invalid input or configuration
    #[snafu(display("Invalid: {message}"))]
    Invalid { message: String },

    /// IO error (config file, log directory, stdin)
    #[snafu(display("IO error: {source}"))]
    Io { source: std::io::Error },

    /// TOML deserialization error
    #[snafu(display("TOML parse error: {source}"))]
    TomlDe { source: toml::de::Error },

    /// TOML serialization error
    #[snafu(display("TOML serialize error: {source}"))]
    TomlSe { source: toml::ser::Error },

    /// Transport failure: connect, timeout, reset
    #[snafu(display("Request to {url} failed: {source}"))]
    Http { url: String, source: reqwest::Error },

    /// Provider answered with a non-success status
    #[snafu(display("Request to {url} returned status {status}"))]
    Status { url: String, status: u16 },

    /// Response body could not be decoded
    #[snafu(display("Could not decode response from {url}: {source}"))]
    Decode {
        url: String,
        source: serde_json::Error,
    },

    /// Provider reported an error in-band, as an `error` key with a 200 status
    #[snafu(display("Provider error: {message}{}", details.as_deref().map(|d| format!(" ({d})")).unwrap_or_default()))]
    Provider {
        message: String,
        details: Option<String>,
    },
}

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io { source }
    }
}

impl From<toml::de::Error> for Error {
    fn from(source: toml::de::Error) -> Self {
        Error::TomlDe { source }
    }
}

impl From<toml::ser::Error> for Error {
    fn from(source: toml::ser::Error) -> Self {
        Error::TomlSe { source }
    }
}

/// Result type alias for convenience
pub type Result<T, E = Error> = std::result::Result<T, E>;
