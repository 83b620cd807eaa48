//! Peekable stream wrapper.
//!
//! [`Lookahead`] gives any async byte stream a non-destructive peek: bytes
//! pulled in by [`Lookahead::peek`] stay buffered and are replayed by the
//! next consuming read before the inner stream is touched again.
//!
//! ```text
//!            peek()                     read()
//! inner ──► [ buffered prefix ] ──► replayed first ──► then inner
//! ```
//!
//! # Example
//!
//! ```
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> std::io::Result<()> {
//! use cipherwire::transport::Lookahead;
//! use tokio::io::AsyncReadExt;
//!
//! let mut stream = Lookahead::new(&b"hello"[..]);
//! let visible = stream.peek(3).await?;
//! assert_eq!(&stream.peeked()[..visible], b"hel");
//!
//! let mut all = Vec::new();
//! stream.read_to_end(&mut all).await?;
//! assert_eq!(all, b"hello");
//! # Ok(())
//! # }
//! ```

use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::{Buf, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, ReadBuf};

/// A stream with a look-ahead buffer in front of its read side.
#[derive(Debug)]
pub struct Lookahead<S> {
    inner: S,
    /// Bytes read from `inner` that no consuming read has taken yet.
    buffer: BytesMut,
    eof: bool,
}

impl<S> Lookahead<S> {
    /// Wrap `inner` with an empty look-ahead buffer.
    pub fn new(inner: S) -> Self {
        Self::with_capacity(inner, 0)
    }

    /// Wrap `inner`, preallocating `capacity` bytes of look-ahead.
    pub fn with_capacity(inner: S, capacity: usize) -> Self {
        Self {
            inner,
            buffer: BytesMut::with_capacity(capacity),
            eof: false,
        }
    }

    /// The bytes peeked so far and not yet consumed.
    pub fn peeked(&self) -> &[u8] {
        &self.buffer
    }

    /// True once a peek observed end-of-stream.
    pub fn is_eof(&self) -> bool {
        self.eof
    }

    /// Get a reference to the inner stream.
    pub fn get_ref(&self) -> &S {
        &self.inner
    }

    /// Unwrap into the inner stream and the unconsumed look-ahead bytes.
    pub fn into_parts(self) -> (S, BytesMut) {
        (self.inner, self.buffer)
    }
}

impl<S: AsyncRead + Unpin> Lookahead<S> {
    /// Peek at up to `max` bytes without consuming them.
    ///
    /// Issues at most one read on the inner stream, and only when fewer than
    /// `max` bytes are buffered, so each call either grows the visible prefix,
    /// observes end-of-stream, or returns immediately when `max` is already
    /// buffered. Returns how many bytes of [`peeked`](Self::peeked) are now
    /// visible, capped at `max`.
    pub async fn peek(&mut self, max: usize) -> io::Result<usize> {
        let buffered = self.buffer.len();
        if buffered >= max || self.eof {
            return Ok(buffered.min(max));
        }

        self.buffer.resize(max, 0);
        let result = loop {
            match self.inner.read(&mut self.buffer[buffered..max]).await {
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                other => break other,
            }
        };

        match result {
            Ok(n) => {
                self.buffer.truncate(buffered + n);
                if n == 0 {
                    self.eof = true;
                }
                tracing::trace!(new = n, buffered = buffered + n, "peek filled");
                Ok(buffered + n)
            }
            Err(e) => {
                self.buffer.truncate(buffered);
                Err(e)
            }
        }
    }
}

impl<S: AsyncRead + Unpin> AsyncRead for Lookahead<S> {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let this = self.get_mut();

        if this.buffer.is_empty() {
            return Pin::new(&mut this.inner).poll_read(cx, buf);
        }

        let n = this.buffer.len().min(buf.remaining());
        buf.put_slice(&this.buffer[..n]);
        this.buffer.advance(n);
        Poll::Ready(Ok(()))
    }
}

impl<S: AsyncWrite + Unpin> AsyncWrite for Lookahead<S> {
    fn poll_write(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        Pin::new(&mut self.get_mut().inner).poll_write(cx, buf)
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.get_mut().inner).poll_flush(cx)
    }

    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.get_mut().inner).poll_shutdown(cx)
    }
}
