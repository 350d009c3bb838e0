//! TiVo TCP remote control client
//!
//! This crate provides the client side of the TiVo TCP remote control
//! protocol: sending remote, keyboard, channel and teleport commands, and
//! tracking the channel and screen inferred from device responses.

pub mod config;
pub mod remote;

pub use config::{RemoteConfig, RemoteConfigBuilder, DEFAULT_PORT, DEFAULT_TIMEOUT};
pub use remote::Remote;
