//! Reliable reader: exactly `n` bytes despite short reads.
//!
//! Stream sockets return whatever has arrived, so a single read may yield any
//! prefix of the requested amount. [`read_exactly`] loops until the full
//! count is in hand and never asks the stream for more than what is still
//! missing.

use std::io;

use bytes::Bytes;
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::error::{Result, WireError};

/// Read exactly `n` bytes from `reader`.
///
/// Returns [`WireError::ConnectionClosed`] if the stream ends first and
/// [`WireError::Read`] on an I/O error. No read is issued when `n == 0`.
pub async fn read_exactly<R>(reader: &mut R, n: usize) -> Result<Bytes>
where
    R: AsyncRead + Unpin + ?Sized,
{
    if n == 0 {
        return Ok(Bytes::new());
    }

    let mut buf = vec![0u8; n];
    let mut filled = 0;

    while filled < n {
        match reader.read(&mut buf[filled..]).await {
            Ok(0) => {
                return Err(WireError::ConnectionClosed {
                    expected: n,
                    received: filled,
                })
            }
            Ok(read) => filled += read,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(WireError::Read(e)),
        }
    }

    Ok(Bytes::from(buf))
}

/// Read and drop exactly `n` bytes.
pub async fn discard_exactly<R>(reader: &mut R, n: usize) -> Result<()>
where
    R: AsyncRead + Unpin + ?Sized,
{
    read_exactly(reader, n).await.map(drop)
}
