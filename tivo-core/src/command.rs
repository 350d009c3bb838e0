//! Outbound command lines
//!
//! Every command is a single ASCII line `<VERB> <ARGUMENT>` terminated by a
//! carriage return only.

use crate::error::{TivoError, TivoResult};
use std::fmt;
use std::str::FromStr;

/// Line terminator for outbound commands
pub const COMMAND_TERMINATOR: u8 = b'\r';

/// Command verb
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    /// Simulated infrared remote button press
    Ircode,
    /// Keyboard (text/navigation) key code
    Keyboard,
    /// Tune directly to a channel
    Setch,
    /// Jump to one of the fixed application screens
    Teleport,
}

impl Verb {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verb::Ircode => "IRCODE",
            Verb::Keyboard => "KEYBOARD",
            Verb::Setch => "SETCH",
            Verb::Teleport => "TELEPORT",
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Verb {
    type Err = TivoError;

    fn from_str(s: &str) -> TivoResult<Self> {
        match s.to_ascii_uppercase().as_str() {
            "IRCODE" => Ok(Verb::Ircode),
            "KEYBOARD" => Ok(Verb::Keyboard),
            "SETCH" => Ok(Verb::Setch),
            "TELEPORT" => Ok(Verb::Teleport),
            _ => Err(TivoError::InvalidArgument(format!("Unknown command: {}", s))),
        }
    }
}

/// A command ready to be written to the device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    verb: Verb,
    argument: String,
}

impl Command {
    /// Create a command, rejecting arguments that cannot go on the wire
    ///
    /// The argument must be non-empty printable ASCII without CR or LF.
    pub fn new(verb: Verb, argument: impl Into<String>) -> TivoResult<Self> {
        let argument = argument.into();
        if argument.is_empty() {
            return Err(TivoError::InvalidArgument(format!(
                "{} requires an argument",
                verb
            )));
        }
        if let Some(c) = argument
            .chars()
            .find(|c| !c.is_ascii() || c.is_ascii_control())
        {
            return Err(TivoError::InvalidArgument(format!(
                "Invalid character {:?} in {} argument",
                c, verb
            )));
        }
        Ok(Self { verb, argument })
    }

    pub fn ircode(code: impl Into<String>) -> TivoResult<Self> {
        Self::new(Verb::Ircode, code)
    }

    pub fn keyboard(key: impl Into<String>) -> TivoResult<Self> {
        Self::new(Verb::Keyboard, key)
    }

    pub fn set_channel(channel: impl Into<String>) -> TivoResult<Self> {
        Self::new(Verb::Setch, channel)
    }

    pub fn teleport(screen: impl Into<String>) -> TivoResult<Self> {
        Self::new(Verb::Teleport, screen)
    }

    pub fn verb(&self) -> Verb {
        self.verb
    }

    pub fn argument(&self) -> &str {
        &self.argument
    }

    /// Encode to wire bytes, e.g. `b"IRCODE CHANNELUP\r"`
    pub fn encode(&self) -> Vec<u8> {
        let mut result = Vec::with_capacity(self.verb.as_str().len() + self.argument.len() + 2);
        result.extend_from_slice(self.verb.as_str().as_bytes());
        result.push(b' ');
        result.extend_from_slice(self.argument.as_bytes());
        result.push(COMMAND_TERMINATOR);
        result
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.verb, self.argument)
    }
}
