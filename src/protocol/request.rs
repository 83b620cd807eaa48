//! Outbound request encoding.
//!
//! A request wraps a command in a fixed header:
//!
//! ```text
//! POST / HTTP/1.1\r\n
//! Host: <host>\r\n
//! Content-Length: <length of command>\r\n
//! Connection: keep-alive\r\n\r\n
//! <command>\r\n
//! ```
//!
//! The declared length counts the command bytes only, not the trailing CRLF.

use std::fmt;

use bytes::{BufMut, Bytes, BytesMut};

use super::framer::{CONTENT_LENGTH_MARKER, HEADER_TERMINATOR, LINE_TERMINATOR};

/// Prefix selecting the encode operation.
pub const ENCODE_PREFIX: &str = "e:";

/// Prefix selecting the decode operation.
pub const DECODE_PREFIX: &str = "d:";

/// A command understood by the cipher service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Shift `text` forward.
    Encode(String),
    /// Shift `text` back.
    Decode(String),
    /// An already formatted command, sent verbatim.
    Raw(String),
}

impl Command {
    /// `e:<text>`: ask the service to shift `text` forward.
    pub fn encode(text: impl Into<String>) -> Self {
        Command::Encode(text.into())
    }

    /// `d:<text>`: ask the service to shift `text` back.
    pub fn decode(text: impl Into<String>) -> Self {
        Command::Decode(text.into())
    }

    /// Send `command` verbatim, prefix included.
    pub fn raw(command: impl Into<String>) -> Self {
        Command::Raw(command.into())
    }

    /// The command as it appears on the wire.
    pub fn to_wire(&self) -> String {
        match self {
            Command::Encode(text) => format!("{}{}", ENCODE_PREFIX, text),
            Command::Decode(text) => format!("{}{}", DECODE_PREFIX, text),
            Command::Raw(command) => command.clone(),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_wire())
    }
}

impl From<&str> for Command {
    fn from(command: &str) -> Self {
        Command::Raw(command.to_string())
    }
}

impl From<String> for Command {
    fn from(command: String) -> Self {
        Command::Raw(command)
    }
}

/// A framed request, immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    host: String,
    command: String,
}

impl Request {
    /// Build a request for `command` addressed to `host`.
    pub fn new(host: impl Into<String>, command: &Command) -> Self {
        Self {
            host: host.into(),
            command: command.to_wire(),
        }
    }

    /// The value of the `Host:` header.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// The raw command string.
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Declared body length: the command's byte length.
    pub fn content_length(&self) -> usize {
        self.command.len()
    }

    /// Encode the request to its wire bytes.
    ///
    /// # Example
    ///
    /// ```
    /// use cipherwire::protocol::{Command, Request};
    ///
    /// let bytes = Request::new("127.0.0.1", &Command::encode("hi")).encode();
    /// assert!(bytes.starts_with(b"POST / HTTP/1.1\r\n"));
    /// assert!(bytes.ends_with(b"Content-Length: 4\r\nConnection: keep-alive\r\n\r\ne:hi\r\n"));
    /// ```
    pub fn encode(&self) -> Bytes {
        let length = self.content_length().to_string();
        let mut buf = BytesMut::with_capacity(
            64 + self.host.len() + length.len() + self.command.len(),
        );

        buf.put_slice(b"POST / HTTP/1.1");
        buf.put_slice(LINE_TERMINATOR.as_bytes());
        buf.put_slice(b"Host: ");
        buf.put_slice(self.host.as_bytes());
        buf.put_slice(LINE_TERMINATOR.as_bytes());
        buf.put_slice(CONTENT_LENGTH_MARKER.as_bytes());
        buf.put_slice(length.as_bytes());
        buf.put_slice(LINE_TERMINATOR.as_bytes());
        buf.put_slice(HEADER_TERMINATOR.as_bytes());
        buf.put_slice(self.command.as_bytes());
        buf.put_slice(LINE_TERMINATOR.as_bytes());

        buf.freeze()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_wire_forms() {
        assert_eq!(Command::encode("hello world").to_wire(), "e:hello world");
        assert_eq!(Command::decode("ifmmp xpsme").to_wire(), "d:ifmmp xpsme");
        assert_eq!(Command::raw("x:anything").to_wire(), "x:anything");
        assert_eq!(Command::from("e:abc"), Command::Raw("e:abc".to_string()));
    }

    #[test]
    fn test_request_exact_bytes() {
        let request = Request::new("127.0.0.1", &Command::encode("hello world"));
        let bytes = request.encode();

        assert_eq!(
            &bytes[..],
            &b"POST / HTTP/1.1\r\n\
               Host: 127.0.0.1\r\n\
               Content-Length: 13\r\n\
               Connection: keep-alive\r\n\r\n\
               e:hello world\r\n"[..]
        );
    }

    #[test]
    fn test_content_length_counts_bytes_not_chars() {
        let request = Request::new("h", &Command::encode("héllo"));
        // "e:" + 'h' + 'é' (2 bytes) + "llo"
        assert_eq!(request.content_length(), 8);
        assert!(request
            .encode()
            .windows(b"Content-Length: 8\r\n".len())
            .any(|w| w == b"Content-Length: 8\r\n"));
    }

    #[test]
    fn test_empty_command() {
        let request = Request::new("h", &Command::raw(""));
        let bytes = request.encode();

        assert_eq!(request.content_length(), 0);
        assert!(bytes.ends_with(b"Content-Length: 0\r\nConnection: keep-alive\r\n\r\n\r\n"));
    }

    #[test]
    fn test_accessors() {
        let request = Request::new("svc.local", &Command::decode("abc"));
        assert_eq!(request.host(), "svc.local");
        assert_eq!(request.command(), "d:abc");
    }
}
