use crate::error::{TivoError, TivoResult};
use std::fmt;
use std::str::FromStr;

/// Application screen a TiVo can be teleported to
///
/// The remote protocol cannot report which screen is showing, so a `Screen`
/// held by a client is always a locally cached guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Screen {
    /// Live TV viewing
    #[default]
    LiveTv,
    /// The main menu
    Tivo,
    /// The program guide
    Guide,
    /// The list of recordings
    NowPlaying,
}

impl Screen {
    /// All screens accepted by `TELEPORT`
    pub const ALL: [Screen; 4] = [Screen::LiveTv, Screen::Tivo, Screen::Guide, Screen::NowPlaying];

    /// Wire name of the screen
    pub fn as_str(&self) -> &'static str {
        match self {
            Screen::LiveTv => "LIVETV",
            Screen::Tivo => "TIVO",
            Screen::Guide => "GUIDE",
            Screen::NowPlaying => "NOWPLAYING",
        }
    }

    /// Look up a screen by its exact wire name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|s| s.as_str() == name)
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Screen {
    type Err = TivoError;

    fn from_str(s: &str) -> TivoResult<Self> {
        Self::from_name(s)
            .ok_or_else(|| TivoError::InvalidArgument(format!("Unknown screen: {}", s)))
    }
}
