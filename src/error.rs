pub type Result<T> = std::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    // Validation, reported with usage text
    #[error("missing required url argument")]
    MissingUrl,
    #[error("invalid timestamp {0:?}; use MM:SS or HH:MM:SS")]
    InvalidTimestamp(String),
    #[error("--end must be greater than --start")]
    EndNotAfterStart,
    #[error("invalid mode {0:?}; expected audio, video, or full")]
    UnknownMode(String),
    #[error("--apple-music is only supported with --mode audio")]
    AppleMusicRequiresAudio,
    #[error("--artist and --song are only supported with --mode audio")]
    OverridesRequireAudio,
    #[error("--song must not be empty")]
    EmptySong,

    // Resolution
    #[error("yt-dlp is not installed or not available in PATH (and .venv/bin/yt-dlp was not found)")]
    EngineNotFound,
    #[error("failed to determine current directory: {0}")]
    CurrentDir(#[source] std::io::Error),
    #[error("failed to resolve home directory")]
    HomeDir,
    #[error("unable to read output path: {0}")]
    OutputPath(#[source] std::io::Error),

    // Subprocesses
    #[error("failed to start {program}: {source}")]
    Spawn { program: String, source: std::io::Error },
    #[error("failed to read yt-dlp output: {0}")]
    StreamRead(#[source] std::io::Error),
    #[error("download failed: {0}")]
    DownloadFailed(String),

    // Recovered locally with a warning
    #[error("{0}")]
    MetadataFetch(String),
    #[error("{0}")]
    Tagging(String),

    // Library import
    #[error("download completed but could not determine output path for Apple Music import")]
    FinalPathUnknown,
    #[error("--apple-music is only supported on macOS")]
    ImportUnsupported,
    #[error("{0}")]
    Import(String),
}

impl Error {
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Error::MissingUrl
                | Error::InvalidTimestamp(_)
                | Error::EndNotAfterStart
                | Error::UnknownMode(_)
                | Error::AppleMusicRequiresAudio
                | Error::OverridesRequireAudio
                | Error::EmptySong
        )
    }

    /// Process exit status: 2 for usage errors, 1 for everything that failed at runtime
    pub fn exit_code(&self) -> i32 {
        if self.is_validation() {
            2
        } else {
            1
        }
    }
}
