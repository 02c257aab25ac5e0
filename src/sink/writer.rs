use std::fmt::Display;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::Mutex;

use super::error::SinkError;
use super::traits::Destination;

/// Destination that writes one line per item to an async writer
///
/// Concurrent sends from different branches are serialized by an async
/// mutex, so lines never interleave.
pub struct WriterSink<W> {
    writer: Mutex<W>,
    finished: AtomicBool,
}

impl<W> WriterSink<W>
where
    W: AsyncWrite + Unpin + Send,
{
    /// Wrap an async writer
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
            finished: AtomicBool::new(false),
        }
    }

    /// Consume the sink and return the underlying writer
    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

#[async_trait]
impl<T, W> Destination<T> for WriterSink<W>
where
    T: Display + Send + 'static,
    W: AsyncWrite + Unpin + Send,
{
    async fn send(&self, _branch: usize, item: T) -> Result<(), SinkError> {
        if self.finished.load(Ordering::Acquire) {
            return Err(SinkError::Finished);
        }

        let line = format!("{}\n", item);
        let mut writer = self.writer.lock().await;
        writer.write_all(line.as_bytes()).await?;
        Ok(())
    }

    async fn finish(&self) -> Result<(), SinkError> {
        if self.finished.swap(true, Ordering::AcqRel) {
            return Ok(());
        }

        let mut writer = self.writer.lock().await;
        writer.flush().await?;
        Ok(())
    }
}
