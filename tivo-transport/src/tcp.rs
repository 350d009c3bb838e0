//! TCP transport implementation

use crate::stream::{StreamAccessor, TransportLayer};
use crate::{TivoError, TivoResult};
use async_trait::async_trait;
use bytes::{Buf, BytesMut};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

/// Default TiVo remote control port
pub const DEFAULT_PORT: u16 = 31339;

/// Maximum number of bytes requested from the socket per read, and the
/// longest line returned before giving up on a terminator
pub const MAX_READ_SIZE: usize = 1024;

/// TCP transport layer settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TcpSettings {
    pub host: String,
    pub port: u16,
    /// Applied separately to connect, each write and each read. None blocks indefinitely.
    pub timeout: Option<Duration>,
}

impl TcpSettings {
    /// Create new TCP settings on the default port with no timeout
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: DEFAULT_PORT,
            timeout: None,
        }
    }

    /// Create TCP settings with port and timeout
    pub fn with_timeout(host: impl Into<String>, port: u16, timeout: Option<Duration>) -> Self {
        Self {
            host: host.into(),
            port,
            timeout,
        }
    }
}

/// TCP transport layer implementation
#[derive(Debug)]
pub struct TcpTransport {
    stream: Option<TcpStream>,
    settings: TcpSettings,
    buffer: BytesMut,
    closed: bool,
}

impl TcpTransport {
    /// Create a new, unopened TCP transport
    pub fn new(settings: TcpSettings) -> Self {
        Self {
            stream: None,
            settings,
            buffer: BytesMut::with_capacity(MAX_READ_SIZE),
            closed: true,
        }
    }

    /// Remove one complete line from the buffer, if there is one
    fn take_buffered_line(&mut self) -> Option<String> {
        // Skip the remainder of a previous "\r\n" terminator
        let start = self
            .buffer
            .iter()
            .position(|&b| b != b'\r' && b != b'\n')
            .unwrap_or(self.buffer.len());
        self.buffer.advance(start);

        let end = self.buffer.iter().position(|&b| b == b'\r' || b == b'\n')?;
        let line = self.buffer.split_to(end + 1);
        Some(decode_line(&line))
    }

    fn take_partial_line(&mut self) -> String {
        let line = self.buffer.split();
        decode_line(&line)
    }
}

fn decode_line(data: &[u8]) -> String {
    String::from_utf8_lossy(data).trim_end().to_string()
}

fn not_connected() -> TivoError {
    TivoError::NotConnected
}

#[async_trait]
impl TransportLayer for TcpTransport {
    async fn open(&mut self) -> TivoResult<()> {
        if !self.closed {
            return Err(TivoError::Connection(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "Connection has already been opened",
            )));
        }

        let connect = TcpStream::connect((self.settings.host.as_str(), self.settings.port));
        let stream = if let Some(timeout) = self.settings.timeout {
            tokio::time::timeout(timeout, connect)
                .await
                .map_err(|_| TivoError::ConnectTimeout)??
        } else {
            connect.await?
        };

        log::debug!(
            "Connected to {}:{} ({:?})",
            self.settings.host,
            self.settings.port,
            stream.peer_addr().ok()
        );
        self.stream = Some(stream);
        self.buffer.clear();
        self.closed = false;
        Ok(())
    }
}

#[async_trait]
impl StreamAccessor for TcpTransport {
    async fn read_line(&mut self) -> TivoResult<String> {
        loop {
            if let Some(line) = self.take_buffered_line() {
                log::trace!("<< {:?}", line);
                return Ok(line);
            }
            if self.buffer.len() >= MAX_READ_SIZE {
                log::debug!("No line terminator in {} bytes", self.buffer.len());
                return Ok(self.take_partial_line());
            }

            let timeout = self.settings.timeout;
            let stream = self.stream.as_mut().ok_or_else(not_connected)?;
            let mut chunk = [0u8; MAX_READ_SIZE];

            let result = if let Some(timeout) = timeout {
                match tokio::time::timeout(timeout, stream.read(&mut chunk)).await {
                    Ok(result) => result,
                    Err(_) if self.buffer.is_empty() => return Err(TivoError::Timeout),
                    Err(_) => return Ok(self.take_partial_line()),
                }
            } else {
                stream.read(&mut chunk).await
            };

            match result {
                Ok(0) => {
                    self.closed = true;
                    return Ok(self.take_partial_line());
                }
                Ok(n) => {
                    log::trace!("<< {} bytes", n);
                    self.buffer.extend_from_slice(&chunk[..n]);
                }
                Err(e) => {
                    self.closed = true;
                    return Err(e.into());
                }
            }
        }
    }

    async fn write(&mut self, buf: &[u8]) -> TivoResult<usize> {
        let timeout = self.settings.timeout;
        let stream = self.stream.as_mut().ok_or_else(not_connected)?;

        if let Some(timeout) = timeout {
            Ok(tokio::time::timeout(timeout, stream.write(buf))
                .await
                .map_err(|_| TivoError::Timeout)??)
        } else {
            Ok(stream.write(buf).await?)
        }
    }

    async fn flush(&mut self) -> TivoResult<()> {
        let stream = self.stream.as_mut().ok_or_else(not_connected)?;
        Ok(stream.flush().await?)
    }

    fn is_closed(&self) -> bool {
        self.closed
    }

    async fn close(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            let shutdown = stream.shutdown();
            let result = match self.settings.timeout {
                Some(timeout) => tokio::time::timeout(timeout, shutdown)
                    .await
                    .unwrap_or(Ok(())),
                None => shutdown.await,
            };
            if let Err(e) = result {
                log::debug!("Error shutting down connection: {}", e);
            }
        }
        self.buffer.clear();
        self.closed = true;
    }
}
