//! Scripted in-memory stream for unit tests.
//!
//! Each queued chunk is delivered by its own read call, which reproduces the
//! short reads a stream socket produces when data arrives in fragments.

use std::collections::VecDeque;
use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};

pub(crate) struct MockStream {
    chunks: VecDeque<Vec<u8>>,
    read_error: Option<io::ErrorKind>,
    write_error: Option<io::ErrorKind>,
    max_write: usize,
    reads: usize,
    writes: usize,
    written: Vec<u8>,
    shutdown: bool,
    interrupt_read: bool,
    interrupt_write: bool,
}

impl MockStream {
    /// A stream delivering `chunks` one per read, then end-of-stream.
    pub(crate) fn new(chunks: Vec<Vec<u8>>) -> Self {
        Self {
            chunks: chunks.into(),
            read_error: None,
            write_error: None,
            max_write: usize::MAX,
            reads: 0,
            writes: 0,
            written: Vec::new(),
            shutdown: false,
            interrupt_read: false,
            interrupt_write: false,
        }
    }

    /// Split `data` into deliveries of the given sizes.
    pub(crate) fn fragmented(data: &[u8], sizes: &[usize]) -> Self {
        let mut chunks = Vec::new();
        let mut offset = 0;
        for &size in sizes {
            let end = (offset + size).min(data.len());
            chunks.push(data[offset..end].to_vec());
            offset = end;
        }
        if offset < data.len() {
            chunks.push(data[offset..].to_vec());
        }
        Self::new(chunks)
    }

    /// Fail with `kind` instead of signalling end-of-stream.
    pub(crate) fn fail_reads_after_data(mut self, kind: io::ErrorKind) -> Self {
        self.read_error = Some(kind);
        self
    }

    /// Fail every write with `kind`.
    pub(crate) fn fail_writes(mut self, kind: io::ErrorKind) -> Self {
        self.write_error = Some(kind);
        self
    }

    /// Fail the first read and the first write with `Interrupted`.
    pub(crate) fn interrupt_once(mut self) -> Self {
        self.interrupt_read = true;
        self.interrupt_write = true;
        self
    }

    /// Accept at most `max` bytes per write call.
    pub(crate) fn max_write(mut self, max: usize) -> Self {
        self.max_write = max;
        self
    }

    /// Number of read calls that completed.
    pub(crate) fn reads(&self) -> usize {
        self.reads
    }

    /// Number of write calls that completed.
    pub(crate) fn writes(&self) -> usize {
        self.writes
    }

    pub(crate) fn written(&self) -> &[u8] {
        &self.written
    }

    pub(crate) fn is_shutdown(&self) -> bool {
        self.shutdown
    }
}

impl AsyncRead for MockStream {
    fn poll_read(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let this = self.get_mut();
        this.reads += 1;

        if std::mem::take(&mut this.interrupt_read) {
            return Poll::Ready(Err(io::Error::new(io::ErrorKind::Interrupted, "scripted interrupt")));
        }

        match this.chunks.pop_front() {
            Some(mut chunk) => {
                let n = chunk.len().min(buf.remaining());
                buf.put_slice(&chunk[..n]);
                if n < chunk.len() {
                    this.chunks.push_front(chunk.split_off(n));
                }
                Poll::Ready(Ok(()))
            }
            None => match this.read_error {
                Some(kind) => Poll::Ready(Err(io::Error::new(kind, "scripted read failure"))),
                None => Poll::Ready(Ok(())),
            },
        }
    }
}

impl AsyncWrite for MockStream {
    fn poll_write(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        let this = self.get_mut();
        this.writes += 1;

        if std::mem::take(&mut this.interrupt_write) {
            return Poll::Ready(Err(io::Error::new(io::ErrorKind::Interrupted, "scripted interrupt")));
        }

        if let Some(kind) = this.write_error {
            return Poll::Ready(Err(io::Error::new(kind, "scripted write failure")));
        }

        let n = buf.len().min(this.max_write);
        this.written.extend_from_slice(&buf[..n]);
        Poll::Ready(Ok(n))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        self.get_mut().shutdown = true;
        Poll::Ready(Ok(()))
    }
}
