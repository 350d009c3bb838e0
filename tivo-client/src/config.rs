//! Remote configuration
//!
//! This module provides a builder for the configuration of a [`Remote`](crate::Remote).
//! Validation happens in [`RemoteConfigBuilder::build`], so an invalid
//! configuration never reaches the network.
//!
//! # Usage Example
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use tivo_client::RemoteConfig;
//!
//! let config = RemoteConfig::builder()
//!     .host("192.168.0.10")
//!     .timeout(Duration::from_millis(500))
//!     .build()?;
//! # Ok::<(), tivo_core::TivoError>(())
//! ```

use std::time::Duration;
use tivo_core::{TivoError, TivoResult};
use tivo_transport::TcpSettings;

pub use tivo_transport::DEFAULT_PORT;

/// Default per-operation socket timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(250);

/// Configuration of a TiVo remote
///
/// Immutable once built. A `timeout` of `None` blocks indefinitely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteConfig {
    host: String,
    port: u16,
    timeout: Option<Duration>,
}

impl RemoteConfig {
    /// Configuration for `host` with the default port and timeout
    pub fn new(host: impl Into<String>) -> TivoResult<Self> {
        Self::builder().host(host).build()
    }

    pub fn builder() -> RemoteConfigBuilder {
        RemoteConfigBuilder::new()
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Transport settings for one connection to the configured device
    pub fn tcp_settings(&self) -> TcpSettings {
        TcpSettings::with_timeout(self.host.clone(), self.port, self.timeout)
    }
}

/// Builder for [`RemoteConfig`]
#[derive(Debug, Clone, Default)]
pub struct RemoteConfigBuilder {
    host: Option<String>,
    port: Option<u16>,
    timeout: Option<Duration>,
}

impl RemoteConfigBuilder {
    /// Create a new builder; the host is required, everything else has a default
    pub fn new() -> Self {
        Self::default()
    }

    /// Hostname or IP address of the device
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Remote protocol port (default 31339)
    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Socket timeout (default 250 ms); `Duration::ZERO` disables the timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the configuration
    ///
    /// # Errors
    /// - `MissingHost` if no host, or an empty host, was given
    /// - `InvalidConfig` if the port is 0
    pub fn build(self) -> TivoResult<RemoteConfig> {
        let host = self
            .host
            .map(|h| h.trim().to_string())
            .filter(|h| !h.is_empty())
            .ok_or(TivoError::MissingHost)?;

        let port = self.port.unwrap_or(DEFAULT_PORT);
        if port == 0 {
            return Err(TivoError::InvalidConfig("port must be non-zero".to_string()));
        }

        let timeout = match self.timeout {
            None => Some(DEFAULT_TIMEOUT),
            Some(t) if t.is_zero() => None,
            Some(t) => Some(t),
        };

        Ok(RemoteConfig { host, port, timeout })
    }
}
