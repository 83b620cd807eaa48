//! TCP connection setup.

use tokio::net::TcpStream;
use tokio::time::Instant;

use crate::error::{Result, WireError};

/// Connect to `address`, giving up at `deadline` if one is set.
///
/// Nagle is disabled: requests are small and written in one go.
pub async fn connect(address: &str, deadline: Option<Instant>) -> Result<TcpStream> {
    let connecting = TcpStream::connect(address);
    let stream = match deadline {
        Some(deadline) => tokio::time::timeout_at(deadline, connecting)
            .await
            .map_err(|_| {
                WireError::Connect(std::io::Error::new(
                    std::io::ErrorKind::TimedOut,
                    "connect deadline elapsed",
                ))
            })?,
        None => connecting.await,
    }
    .map_err(WireError::Connect)?;

    stream.set_nodelay(true).map_err(WireError::Connect)?;
    tracing::debug!(%address, "connected");
    Ok(stream)
}
