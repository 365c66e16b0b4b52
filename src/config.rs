#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Mode {
    Audio,
    Video,
    #[default]
    Full,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Audio => "audio",
            Mode::Video => "video",
            Mode::Full => "full",
        }
    }
}

impl std::str::FromStr for Mode {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "audio" => Ok(Mode::Audio),
            "video" => Ok(Mode::Video),
            "full" => Ok(Mode::Full),
            other => Err(crate::Error::UnknownMode(other.to_string())),
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One validated invocation. Empty strings mean "not given".
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Config {
    pub url: String,
    /// `HH:MM:SS` or empty
    pub start: String,
    /// `HH:MM:SS` or empty
    pub end: String,
    pub mode: Mode,
    pub output: String,
    pub artist: String,
    pub song: String,
    pub apple_music: bool,
}

impl Config {
    /// Whether the download has to report where the file ended up
    pub fn needs_final_path(&self) -> bool {
        self.mode == Mode::Audio || self.apple_music
    }
}
