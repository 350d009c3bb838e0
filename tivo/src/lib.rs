//! tivoctl - Rust implementation of the TiVo TCP remote control protocol
//!
//! For the protocol documentation see
//! <https://lv.tivo.com/assets/images/abouttivo/resources/downloads/brochures/TiVo_TCP_Network_Remote_Control_Protocol.pdf>
//!
//! # Architecture
//!
//! This library is organized as a workspace with multiple crates:
//!
//! - `tivo-core`: error handling, command and response formats, screens
//! - `tivo-transport`: line-oriented TCP transport with timeouts
//! - `tivo-client`: the `Remote` client and its configuration
//!
//! Some commands not in the protocol documentation are accepted by devices,
//! e.g. `IRCODE NETFLIX` switches to the Netflix app where available and
//! `IRCODE FIND_REMOTE` makes a supporting remote beep.
//!
//! # Usage
//!
//! ```no_run
//! use tivo::client::{Remote, RemoteConfig};
//!
//! # async fn run() -> tivo::TivoResult<()> {
//! let mut remote = Remote::new(RemoteConfig::new("192.168.0.10")?);
//! remote.send_ircode("CHANNELUP").await?;
//! # Ok(())
//! # }
//! ```

pub mod cli;

// Re-export core types
pub use tivo_core::{Command, Response, Screen, TivoError, TivoResult, Verb};

// Re-export client API
pub mod client {
    pub use tivo_client::*;
}

// Re-export transport API
pub mod transport {
    pub use tivo_transport::*;
}
