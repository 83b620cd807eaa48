//! Reliable writer: every byte or an error.
//!
//! The write-side twin of [`crate::reader`]. A stream may accept fewer bytes
//! than offered, so [`write_fully`] keeps writing the unsent tail until the
//! whole buffer is out, then flushes.

use std::io;

use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::error::{Result, WireError};

/// Write all of `bytes` to `writer` and flush.
///
/// A write that accepts zero bytes is reported as
/// [`io::ErrorKind::WriteZero`]; every failure maps to [`WireError::Write`].
pub async fn write_fully<W>(writer: &mut W, bytes: &[u8]) -> Result<()>
where
    W: AsyncWrite + Unpin + ?Sized,
{
    let mut sent = 0;

    while sent < bytes.len() {
        match writer.write(&bytes[sent..]).await {
            Ok(0) => {
                return Err(WireError::Write(io::Error::new(
                    io::ErrorKind::WriteZero,
                    format!("stream accepted {} of {} bytes", sent, bytes.len()),
                )))
            }
            Ok(n) => sent += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(WireError::Write(e)),
        }
    }

    writer.flush().await.map_err(WireError::Write)
}
