//! # cipherwire
//!
//! Client for a Caesar cipher service that speaks a small HTTP-shaped text
//! protocol over TCP.
//!
//! The hard part is reading the response: the transport may hand over the
//! header and body in arbitrarily small fragments. The crate peeks at the
//! incoming bytes until it can locate the declared `Content-Length` and the
//! end of the header, then consumes exactly the header followed by exactly
//! the body.
//!
//! ## Architecture
//!
//! - **Framer** ([`protocol::locate`]): finds header length and body length in
//!   a peeked prefix
//! - **Reliable reader** ([`reader::read_exactly`]): reads exactly `n` bytes
//!   despite short reads
//! - **Exchange driver** ([`exchange()`]): send, peek, discard header, read body
//!
//! ## Example
//!
//! ```no_run
//! use cipherwire::Client;
//!
//! #[tokio::main]
//! async fn main() {
//!     let client = Client::builder().address("127.0.0.1:1150").build().unwrap();
//!
//!     let body = client.encode("hello world").await.unwrap();
//!     assert_eq!(&body[..], b"ifmmp xpsme");
//! }
//! ```

pub mod config;
pub mod error;
pub mod protocol;
pub mod reader;
pub mod transport;
pub mod writer;

mod client;
mod exchange;

pub use client::{Client, ClientBuilder};
pub use config::ExchangeConfig;
pub use error::{ConfigError, ExchangeError, Stage, WireError};
pub use exchange::{exchange, exchange_buffered};
pub use protocol::Command;
