//! Stream accessor trait for transport layer

use crate::{TivoError, TivoResult};
use async_trait::async_trait;

/// Stream accessor interface to access a line-oriented stream to a device
#[async_trait]
pub trait StreamAccessor: Send + Sync {
    /// Read one line from the stream
    ///
    /// # Returns
    ///
    /// The line with trailing whitespace removed. At end of stream whatever
    /// was buffered is returned, possibly an empty string. If the timeout
    /// expires with a partial line buffered, the partial line is returned;
    /// with nothing buffered, `TivoError::Timeout`. A line still missing its
    /// terminator after `MAX_READ_SIZE` bytes is returned as it stands.
    async fn read_line(&mut self) -> TivoResult<String>;

    /// Write data to the stream
    ///
    /// # Returns
    ///
    /// Number of bytes written
    async fn write(&mut self, buf: &[u8]) -> TivoResult<usize>;

    /// Write all data to the stream
    async fn write_all(&mut self, buf: &[u8]) -> TivoResult<()> {
        let mut written = 0;
        while written < buf.len() {
            let n = self.write(&buf[written..]).await?;
            if n == 0 {
                return Err(TivoError::Connection(std::io::Error::new(
                    std::io::ErrorKind::WriteZero,
                    "Failed to write all data",
                )));
            }
            written += n;
        }
        Ok(())
    }

    /// Flush any buffered data
    async fn flush(&mut self) -> TivoResult<()>;

    /// Check if the stream is closed
    fn is_closed(&self) -> bool;

    /// Close the stream. Closing an already closed stream is a no-op.
    async fn close(&mut self);
}

/// Transport layer trait that extends StreamAccessor
#[async_trait]
pub trait TransportLayer: StreamAccessor {
    /// Open the physical layer connection
    async fn open(&mut self) -> TivoResult<()>;
}
