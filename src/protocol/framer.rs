//! Response framing over a peeked prefix.
//!
//! The service answers with a loosely HTTP-shaped header followed by a body:
//!
//! ```text
//! HTTP/1.1 200 OK\r\n
//! Content-Length: 11\r\n
//! Connection: keep-alive\r\n\r\n
//! ifmmp xpsme
//! ```
//!
//! [`locate`] finds the declared body length and the offset where the body
//! starts. It only inspects bytes, so the caller can run it on a peeked prefix
//! before deciding how many bytes to consume.
//!
//! # Example
//!
//! ```
//! use cipherwire::protocol::locate;
//!
//! let peeked = b"HTTP/1.1 200 OK\r\nContent-Length: 5\r\nConnection: keep-alive\r\n\r\nhello";
//! let info = locate(peeked).unwrap();
//! assert_eq!(info.content_length, 5);
//! assert_eq!(&peeked[info.header_length..], b"hello");
//! ```

use std::fmt;

/// Marker preceding the declared body length.
pub const CONTENT_LENGTH_MARKER: &str = "Content-Length: ";

/// Line terminator ending every header line.
pub const LINE_TERMINATOR: &str = "\r\n";

/// Literal sequence ending the header block.
pub const HEADER_TERMINATOR: &str = "Connection: keep-alive\r\n\r\n";

/// Framing metadata derived from a response header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameInfo {
    /// Offset of the first byte after the header terminator.
    pub header_length: usize,
    /// Declared number of body bytes.
    pub content_length: usize,
}

impl FrameInfo {
    /// Header plus body.
    pub fn total_length(&self) -> usize {
        self.header_length.saturating_add(self.content_length)
    }
}

/// Why a declared length could not be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthFault {
    /// A byte other than `0-9` inside the numeric span.
    NonDigit(u8),
    /// No digits between the marker and the line terminator.
    Empty,
    /// The value does not fit in `usize`.
    Overflow,
}

impl fmt::Display for LengthFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LengthFault::NonDigit(byte) => {
                write!(f, "unexpected byte {:?}", char::from(*byte))
            }
            LengthFault::Empty => f.write_str("no digits"),
            LengthFault::Overflow => f.write_str("value too large"),
        }
    }
}

/// Failure to frame a peeked prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FramingError {
    /// A required marker is absent from the prefix.
    MarkerNotFound { marker: &'static str },
    /// The declared length is not a plain decimal number.
    MalformedLength { offset: usize, fault: LengthFault },
}

impl FramingError {
    /// True when more bytes could still resolve framing.
    ///
    /// Only a missing header terminator qualifies. Once the header has ended,
    /// every other failure is final.
    pub fn is_incomplete(&self) -> bool {
        matches!(
            self,
            FramingError::MarkerNotFound {
                marker: HEADER_TERMINATOR
            }
        )
    }
}

/// Locate the header boundary and declared body length in `peeked`.
///
/// `peeked` must start at the first byte of the response. Bytes past the
/// header are ignored, so it may contain any amount of the body.
pub fn locate(peeked: &[u8]) -> Result<FrameInfo, FramingError> {
    let header_length = find(peeked, HEADER_TERMINATOR.as_bytes())
        .map(|pos| pos + HEADER_TERMINATOR.len())
        .ok_or(FramingError::MarkerNotFound {
            marker: HEADER_TERMINATOR,
        })?;
    let header = &peeked[..header_length];

    let start = find(header, CONTENT_LENGTH_MARKER.as_bytes())
        .map(|pos| pos + CONTENT_LENGTH_MARKER.len())
        .ok_or(FramingError::MarkerNotFound {
            marker: CONTENT_LENGTH_MARKER,
        })?;
    let end = find(&header[start..], LINE_TERMINATOR.as_bytes())
        .map(|pos| start + pos)
        .ok_or(FramingError::MarkerNotFound {
            marker: LINE_TERMINATOR,
        })?;

    let content_length = parse_decimal(&header[start..end], start)?;

    Ok(FrameInfo {
        header_length,
        content_length,
    })
}

/// Parse an unsigned base-10 number. `base` is the span's offset for errors.
fn parse_decimal(span: &[u8], base: usize) -> Result<usize, FramingError> {
    if span.is_empty() {
        return Err(FramingError::MalformedLength {
            offset: base,
            fault: LengthFault::Empty,
        });
    }

    let mut value: usize = 0;
    for (i, &byte) in span.iter().enumerate() {
        if !byte.is_ascii_digit() {
            return Err(FramingError::MalformedLength {
                offset: base + i,
                fault: LengthFault::NonDigit(byte),
            });
        }
        value = value
            .checked_mul(10)
            .and_then(|v| v.checked_add(usize::from(byte - b'0')))
            .ok_or(FramingError::MalformedLength {
                offset: base + i,
                fault: LengthFault::Overflow,
            })?;
    }

    Ok(value)
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
