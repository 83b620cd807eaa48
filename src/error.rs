//! Error types for cipherwire.
//!
//! [`WireError`] is the distinct, inspectable failure kind produced by the
//! transport, framer and reliable reader. [`ExchangeError`] wraps it with the
//! exchange stage that failed, without masking the kind.

use std::fmt;
use std::io;

use thiserror::Error;

use crate::protocol::{FramingError, LengthFault};

/// Failure kinds surfaced by every layer below the exchange driver.
#[derive(Debug, Error)]
pub enum WireError {
    /// The transport could not be established.
    #[error("connect failed: {0}")]
    Connect(#[source] io::Error),

    /// The request could not be fully sent.
    #[error("write failed: {0}")]
    Write(#[source] io::Error),

    /// A marker or the header terminator is absent from the peeked prefix.
    #[error("marker {marker:?} not found in response header")]
    MarkerNotFound { marker: &'static str },

    /// The declared content length is not a plain decimal number.
    #[error("malformed Content-Length at offset {offset}: {fault}")]
    MalformedLength { offset: usize, fault: LengthFault },

    /// The header terminator did not appear within the peek capacity.
    #[error("response header exceeds peek capacity of {capacity} bytes")]
    FrameTooLarge { capacity: usize },

    /// The declared body is larger than the configured maximum.
    #[error("declared content length {declared} exceeds maximum {max}")]
    ContentTooLarge { declared: usize, max: usize },

    /// The peer closed the stream before the expected byte count arrived.
    #[error("connection closed after {received} of {expected} bytes")]
    ConnectionClosed { expected: usize, received: usize },

    /// The stream failed while reading.
    #[error("read failed: {0}")]
    Read(#[source] io::Error),
}

impl WireError {
    /// True when the peer sent something that cannot be framed.
    pub fn is_malformed_response(&self) -> bool {
        matches!(
            self,
            WireError::MarkerNotFound { .. }
                | WireError::MalformedLength { .. }
                | WireError::FrameTooLarge { .. }
                | WireError::ContentTooLarge { .. }
        )
    }

    /// True when the failure came from the connection itself.
    pub fn is_connection_problem(&self) -> bool {
        matches!(
            self,
            WireError::Connect(_)
                | WireError::Write(_)
                | WireError::ConnectionClosed { .. }
                | WireError::Read(_)
        )
    }
}

impl From<FramingError> for WireError {
    fn from(err: FramingError) -> Self {
        match err {
            FramingError::MarkerNotFound { marker } => WireError::MarkerNotFound { marker },
            FramingError::MalformedLength { offset, fault } => {
                WireError::MalformedLength { offset, fault }
            }
        }
    }
}

/// The step of an exchange in which a failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Establishing the transport.
    Connect,
    /// Writing the framed request.
    Send,
    /// Peeking until the response header can be framed.
    Frame,
    /// Consuming and discarding the response header.
    Header,
    /// Reading the response body.
    Body,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Connect => "connect",
            Stage::Send => "send",
            Stage::Frame => "frame",
            Stage::Header => "header",
            Stage::Body => "body",
        };
        f.write_str(name)
    }
}

/// A failed exchange: the stage that failed plus the underlying kind.
#[derive(Debug, Error)]
#[error("exchange failed during {stage} stage: {source}")]
pub struct ExchangeError {
    stage: Stage,
    #[source]
    source: WireError,
}

impl ExchangeError {
    /// Attach stage context to a wire error.
    pub fn new(stage: Stage, source: WireError) -> Self {
        Self { stage, source }
    }

    /// The stage that failed.
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// The underlying failure kind.
    pub fn kind(&self) -> &WireError {
        &self.source
    }

    /// See [`WireError::is_malformed_response`].
    pub fn is_malformed_response(&self) -> bool {
        self.source.is_malformed_response()
    }

    /// See [`WireError::is_connection_problem`].
    pub fn is_connection_problem(&self) -> bool {
        self.source.is_connection_problem()
    }
}

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The configuration file is not valid JSON for [`crate::ExchangeConfig`].
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A value is out of range.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Result type alias for wire-level operations.
pub type Result<T> = std::result::Result<T, WireError>;
