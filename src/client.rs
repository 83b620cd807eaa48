//! Client builder and connection-per-exchange runtime.
//!
//! The [`ClientBuilder`] provides a fluent API for configuring the service
//! address and framing limits. The [`Client`] then runs each exchange on a
//! fresh connection:
//! 1. Connect to the service
//! 2. Run the exchange (send, frame, discard header, read body)
//! 3. Drop the connection
//!
//! # Example
//!
//! ```no_run
//! use cipherwire::Client;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Client::builder()
//!         .address("127.0.0.1:1150")
//!         .timeout(std::time::Duration::from_secs(5))
//!         .build()?;
//!
//!     let body = client.encode("hello world").await?;
//!     println!("{}", String::from_utf8_lossy(&body));
//!     Ok(())
//! }
//! ```

use std::time::Duration;

use bytes::Bytes;
use tokio::time::Instant;

use crate::config::ExchangeConfig;
use crate::error::{ConfigError, ExchangeError, Stage};
use crate::exchange::exchange;
use crate::protocol::Command;
use crate::transport::{connect, Deadline};

/// Builder for configuring and creating a [`Client`].
#[derive(Debug, Clone, Default)]
pub struct ClientBuilder {
    config: ExchangeConfig,
}

impl ClientBuilder {
    /// Create a builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing configuration.
    pub fn config(mut self, config: ExchangeConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the service address (`host:port`).
    ///
    /// Default: `127.0.0.1:1150`
    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.config.address = address.into();
        self
    }

    /// Set the `Host:` request header.
    ///
    /// Default: `127.0.0.1`
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.host = host.into();
        self
    }

    /// Set the peek buffer bound; larger response headers are rejected.
    ///
    /// Default: 800
    pub fn peek_capacity(mut self, capacity: usize) -> Self {
        self.config.peek_capacity = capacity;
        self
    }

    /// Set the largest declared body accepted.
    ///
    /// Default: 16 MiB
    pub fn max_content_length(mut self, max: usize) -> Self {
        self.config.max_content_length = max;
        self
    }

    /// Set a deadline covering connect and the whole exchange.
    ///
    /// Rounded up to whole milliseconds.
    ///
    /// Default: none
    pub fn timeout(mut self, timeout: Duration) -> Self {
        let millis = timeout.as_nanos().div_ceil(1_000_000);
        self.config.timeout_ms = Some(u64::try_from(millis).unwrap_or(u64::MAX));
        self
    }

    /// Validate the configuration and build the client.
    pub fn build(self) -> Result<Client, ConfigError> {
        Client::new(self.config)
    }
}

/// A client for the cipher service.
///
/// Holds no connection between calls; each exchange connects anew.
#[derive(Debug, Clone)]
pub struct Client {
    config: ExchangeConfig,
}

impl Client {
    /// Create a new client builder.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Create a client from a validated configuration.
    pub fn new(config: ExchangeConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The active configuration.
    pub fn config(&self) -> &ExchangeConfig {
        &self.config
    }

    /// Encode `text` with the service.
    pub async fn encode(&self, text: &str) -> Result<Bytes, ExchangeError> {
        self.exchange(&Command::encode(text)).await
    }

    /// Decode `text` with the service.
    pub async fn decode(&self, text: &str) -> Result<Bytes, ExchangeError> {
        self.exchange(&Command::decode(text)).await
    }

    /// Connect and run one exchange of `command`.
    pub async fn exchange(&self, command: &Command) -> Result<Bytes, ExchangeError> {
        let result = self.run(command).await;
        if let Err(e) = &result {
            tracing::warn!(
                address = %self.config.address,
                stage = %e.stage(),
                "exchange failed: {}",
                e.kind()
            );
        }
        result
    }

    async fn run(&self, command: &Command) -> Result<Bytes, ExchangeError> {
        let deadline = self.config.timeout().map(|timeout| Instant::now() + timeout);

        let stream = connect(&self.config.address, deadline)
            .await
            .map_err(|e| ExchangeError::new(Stage::Connect, e))?;

        match deadline {
            Some(deadline) => exchange(Deadline::new(stream, deadline), command, &self.config).await,
            None => exchange(stream, command, &self.config).await,
        }
    }
}
