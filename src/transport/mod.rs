//! Transport module - stream plumbing under the exchange driver.
//!
//! Provides:
//! - [`Lookahead`]: non-destructive peek over any async stream
//! - [`Deadline`]: absolute deadline on every I/O call
//! - [`connect`]: TCP connection setup

mod deadline;
mod lookahead;
mod tcp;

#[cfg(test)]
pub(crate) mod mock;

pub use deadline::Deadline;
pub use lookahead::Lookahead;
pub use tcp::connect;
