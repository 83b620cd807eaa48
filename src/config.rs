//! Exchange configuration.
//!
//! Service address, host header and buffer limits are passed into the
//! exchange driver explicitly rather than fixed at compile time.
//!
//! # Example
//!
//! ```
//! use cipherwire::ExchangeConfig;
//!
//! let config: ExchangeConfig = serde_json::from_str(r#"{ "peek_capacity": 1024 }"#).unwrap();
//! assert_eq!(config.peek_capacity, 1024);
//! assert_eq!(config.address, "127.0.0.1:1150");
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default service address.
pub const DEFAULT_ADDRESS: &str = "127.0.0.1:1150";

/// Default `Host:` header value.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default peek buffer bound.
pub const DEFAULT_PEEK_CAPACITY: usize = 800;

/// Default maximum declared body length (16 MiB).
pub const DEFAULT_MAX_CONTENT_LENGTH: usize = 16 * 1024 * 1024;

/// Settings for one exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExchangeConfig {
    /// Service socket address, `host:port`.
    pub address: String,
    /// Value sent in the `Host:` request header.
    pub host: String,
    /// The response header must fit in this many bytes.
    pub peek_capacity: usize,
    /// Largest declared body accepted.
    pub max_content_length: usize,
    /// Deadline for connect plus exchange, in milliseconds.
    pub timeout_ms: Option<u64>,
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            address: DEFAULT_ADDRESS.to_string(),
            host: DEFAULT_HOST.to_string(),
            peek_capacity: DEFAULT_PEEK_CAPACITY,
            max_content_length: DEFAULT_MAX_CONTENT_LENGTH,
            timeout_ms: None,
        }
    }
}

impl ExchangeConfig {
    /// Load from a JSON file. Missing fields take their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// The whole-exchange deadline, if any.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    /// Reject values no exchange could succeed with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.peek_capacity == 0 {
            return Err(ConfigError::Invalid(
                "peek_capacity must be greater than 0".to_string(),
            ));
        }
        if self.address.is_empty() {
            return Err(ConfigError::Invalid("address must not be empty".to_string()));
        }
        if self.timeout_ms == Some(0) {
            return Err(ConfigError::Invalid(
                "timeout_ms must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}
