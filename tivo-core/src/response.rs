//! Inbound response lines

/// Status token announcing the currently tuned channel
pub const CH_STATUS: &str = "CH_STATUS";

/// Acknowledgement sent when the device returns to live TV
pub const LIVETV_READY: &str = "LIVETV_READY";

/// A single response line from the device
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// No response was received
    Empty,
    /// `CH_STATUS <channel> ...`
    ChannelStatus(String),
    /// Exactly `LIVETV_READY`
    LiveTvReady,
    /// Anything else; not an error, many verbs have no status reply
    Other(String),
}

impl Response {
    /// Parse a response line
    ///
    /// Trailing whitespace is trimmed first. Only the first space-delimited
    /// token is inspected; for `CH_STATUS` the second token is the channel and
    /// any further tokens are ignored.
    pub fn parse(line: &str) -> Self {
        let line = line.trim_end();
        if line.is_empty() {
            return Response::Empty;
        }
        if line == LIVETV_READY {
            return Response::LiveTvReady;
        }

        let mut tokens = line.split(' ');
        match (tokens.next(), tokens.next()) {
            (Some(CH_STATUS), Some(channel)) if !channel.is_empty() => {
                Response::ChannelStatus(channel.to_string())
            }
            _ => Response::Other(line.to_string()),
        }
    }

    /// Channel reported by this response, if any
    pub fn channel(&self) -> Option<&str> {
        match self {
            Response::ChannelStatus(channel) => Some(channel),
            _ => None,
        }
    }
}
