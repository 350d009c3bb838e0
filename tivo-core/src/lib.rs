//! Core types for the TiVo TCP remote control protocol
//!
//! This crate provides the error type, the wire command and response
//! formats, and the screen enumeration shared by the transport and client.

pub mod error;
pub mod command;
pub mod response;
pub mod screen;

pub use error::{TivoError, TivoResult};
pub use command::{Command, Verb, COMMAND_TERMINATOR};
pub use response::{Response, CH_STATUS, LIVETV_READY};
pub use screen::Screen;
