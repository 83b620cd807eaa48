//! Exchange driver: one request, one framed response.
//!
//! The driver runs a fixed sequence over a single stream:
//! 1. Send the framed request
//! 2. Peek until the response header can be framed
//! 3. Consume and discard the header
//! 4. Read exactly the declared body
//!
//! Peeking first means the header length is known before anything is
//! consumed, so the consuming reads take exactly the header and then exactly
//! the body. Any failure ends the exchange; nothing is retried here.

use bytes::Bytes;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};

use crate::config::ExchangeConfig;
use crate::error::{ExchangeError, Stage, WireError};
use crate::protocol::{locate, Command, FrameInfo, Request};
use crate::reader::{discard_exactly, read_exactly};
use crate::transport::Lookahead;
use crate::writer::write_fully;

/// Run one exchange of `command` over `stream` and return the body.
///
/// The stream is owned by the exchange and dropped on every exit path. Peeking
/// may pull bytes past the body out of `stream`; they are discarded with the
/// look-ahead buffer. Use [`exchange_buffered`] to keep them.
pub async fn exchange<S>(
    stream: S,
    command: &Command,
    config: &ExchangeConfig,
) -> Result<Bytes, ExchangeError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let mut stream = Lookahead::with_capacity(stream, config.peek_capacity);
    let body = exchange_buffered(&mut stream, command, config).await?;

    if let Err(e) = stream.shutdown().await {
        tracing::trace!("shutdown after exchange failed: {}", e);
    }

    Ok(body)
}

/// Run one exchange over a caller-owned [`Lookahead`].
///
/// Bytes the peer sent after the body stay buffered in `stream` and are
/// replayed by its next read, so the stream can be used afterwards.
pub async fn exchange_buffered<S>(
    stream: &mut Lookahead<S>,
    command: &Command,
    config: &ExchangeConfig,
) -> Result<Bytes, ExchangeError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let request = Request::new(config.host.as_str(), command);
    let encoded = request.encode();
    write_fully(stream, &encoded)
        .await
        .map_err(|e| ExchangeError::new(Stage::Send, e))?;
    tracing::debug!(bytes = encoded.len(), command = %request.command(), "request sent");

    let info = peek_frame(stream, config.peek_capacity)
        .await
        .map_err(|e| ExchangeError::new(Stage::Frame, e))?;
    tracing::debug!(
        header_length = info.header_length,
        content_length = info.content_length,
        "response framed"
    );

    if info.content_length > config.max_content_length {
        return Err(ExchangeError::new(
            Stage::Frame,
            WireError::ContentTooLarge {
                declared: info.content_length,
                max: config.max_content_length,
            },
        ));
    }

    discard_exactly(stream, info.header_length)
        .await
        .map_err(|e| ExchangeError::new(Stage::Header, e))?;

    let body = read_exactly(stream, info.content_length)
        .await
        .map_err(|e| ExchangeError::new(Stage::Body, e))?;
    tracing::debug!(bytes = body.len(), "response body read");

    Ok(body)
}

/// Peek until [`locate`] succeeds, the buffer fills, or the peer closes.
async fn peek_frame<S>(stream: &mut Lookahead<S>, capacity: usize) -> Result<FrameInfo, WireError>
where
    S: AsyncRead + Unpin,
{
    loop {
        let visible = stream.peek(capacity).await.map_err(WireError::Read)?;

        match locate(&stream.peeked()[..visible]) {
            Ok(info) => return Ok(info),
            Err(e) if !e.is_incomplete() => return Err(e.into()),
            Err(_) if visible >= capacity => return Err(WireError::FrameTooLarge { capacity }),
            Err(_) if stream.is_eof() => {
                // The header length is unknown here; at least one more byte was needed.
                return Err(WireError::ConnectionClosed {
                    expected: visible + 1,
                    received: visible,
                })
            }
            Err(_) => continue,
        }
    }
}
