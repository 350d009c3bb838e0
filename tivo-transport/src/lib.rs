//! Transport layer for the TiVo remote control protocol
//!
//! This crate provides a line-oriented TCP transport with per-operation timeouts.

pub mod stream;
pub mod tcp;

pub use tivo_core::{TivoError, TivoResult};
pub use stream::{StreamAccessor, TransportLayer};
pub use tcp::{TcpTransport, TcpSettings, DEFAULT_PORT, MAX_READ_SIZE};
