use std::io;
use thiserror::Error;

/// Main error type for TiVo remote control operations
#[derive(Error, Debug)]
pub enum TivoError {
    #[error("Missing host parameter")]
    MissingHost,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Connect timed out")]
    ConnectTimeout,

    #[error("Timeout")]
    Timeout,

    #[error("Connection refused: {0}")]
    ConnectionRefused(io::Error),

    #[error("Host unreachable: {0}")]
    HostUnreachable(io::Error),

    #[error("Connection error: {0}")]
    Connection(io::Error),

    #[error("Not connected")]
    NotConnected,
}

impl TivoError {
    /// True for both the connect-phase timeout and send/receive timeouts
    pub fn is_timeout(&self) -> bool {
        matches!(self, TivoError::ConnectTimeout | TivoError::Timeout)
    }

    /// The underlying system error, if this error carries one
    pub fn io_error(&self) -> Option<&io::Error> {
        match self {
            TivoError::ConnectionRefused(e)
            | TivoError::HostUnreachable(e)
            | TivoError::Connection(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for TivoError {
    fn from(e: io::Error) -> Self {
        match e.kind() {
            io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => TivoError::Timeout,
            io::ErrorKind::ConnectionRefused => TivoError::ConnectionRefused(e),
            io::ErrorKind::HostUnreachable | io::ErrorKind::NetworkUnreachable => {
                TivoError::HostUnreachable(e)
            }
            _ => TivoError::Connection(e),
        }
    }
}

/// Result type alias for TiVo remote control operations
pub type TivoResult<T> = Result<T, TivoError>;
