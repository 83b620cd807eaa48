//! Protocol module - request encoding and response framing.
//!
//! This module implements the text protocol spoken with the cipher service:
//! - Request builder wrapping a command in a fixed header
//! - Framer locating the body inside a peeked response prefix

mod framer;
mod request;

pub use framer::{
    locate, FrameInfo, FramingError, LengthFault, CONTENT_LENGTH_MARKER, HEADER_TERMINATOR,
    LINE_TERMINATOR,
};
pub use request::{Command, Request, DECODE_PREFIX, ENCODE_PREFIX};
