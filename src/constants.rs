//! Session Constants
//!
//! Centralized constants shared by the state, service, and view layers.

/// Rows per page; fixed for the lifetime of a session
pub const PAGE_SIZE: usize = 10;

/// Default provider base URL
pub const DEFAULT_PROVIDER_URL: &str = "http://localhost:8000";

/// Environment variable overriding the provider base URL
pub const PROVIDER_URL_ENV: &str = "STOCK_BROWSER_URL";

/// HTTP timeouts
pub const REQUEST_TIMEOUT_SECS: u64 = 30;
pub const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Bounded request history capacity
pub const REQUEST_HISTORY_CAPACITY: usize = 100;

/// Configuration file name inside the config directory
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Rolling log file prefix inside the data directory
pub const LOG_FILE_PREFIX: &str = "stock-browser.log";

/// Project directory identifiers
pub const PROJECT_QUALIFIER: &str = "com";
pub const PROJECT_ORGANIZATION: &str = "stockbrowser";
pub const PROJECT_APPLICATION: &str = "stock-browser";
