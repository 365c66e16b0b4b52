use crate::config::*;
use crate::text::*;
use crate::utils::*;

#[derive(clap::Parser, Debug, Default)]
#[command(
    name = "ytcli",
    about = "Download audio or video with yt-dlp, trim it, and tag the result",
    disable_version_flag = true
)]
pub struct Cli {
    /// Clip start timestamp (MM:SS or HH:MM:SS)
    #[arg(long, default_value = "")]
    pub start: String,
    /// Clip end timestamp (MM:SS or HH:MM:SS)
    #[arg(long, default_value = "")]
    pub end: String,
    /// Download mode: audio, video, or full
    #[arg(long, default_value = "full")]
    pub mode: String,
    /// Destination file path or directory
    #[arg(long, default_value = "")]
    pub output: String,
    /// Manual artist tag override for audio mode
    #[arg(long, default_value = "")]
    pub artist: String,
    /// Manual song title tag override for audio mode
    #[arg(long, default_value = "")]
    pub song: String,
    /// When mode=audio, import the downloaded track into the Apple Music library (macOS)
    #[arg(long)]
    pub apple_music: bool,
    /// Print version and build metadata, then exit
    #[arg(long)]
    pub version: bool,

    pub url: Option<String>,
}

pub enum Invocation {
    Version,
    Run(Config),
}

impl Cli {
    /// Parses argv (without the program name), honouring the bare `ytcli version` form.
    ///
    /// Clap errors (including `--help`) are returned untouched so the caller can let clap print
    /// and exit with its own status.
    pub fn parse_args<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let args = args.into_iter().map(Into::into).collect::<Vec<std::ffi::OsString>>();
        if args.len() == 1 && args[0] == "version" {
            return Ok(Cli { version: true, ..Default::default() });
        }

        <Self as clap::Parser>::try_parse_from(std::iter::once("ytcli".into()).chain(args))
    }

    pub fn usage() -> String {
        <Self as clap::CommandFactory>::command().render_help().to_string()
    }

    pub fn into_invocation(self) -> crate::Result<Invocation> {
        if self.version {
            return Ok(Invocation::Version);
        }
        Ok(Invocation::Run(Config::try_from(self)?))
    }
}

impl TryFrom<Cli> for Config {
    type Error = crate::Error;

    fn try_from(cli: Cli) -> crate::Result<Self> {
        let url = cli.url.ok_or(crate::Error::MissingUrl)?;
        let start = normalize_timestamp(&cli.start)?;
        let end = normalize_timestamp(&cli.end)?;

        if !start.is_empty()
            && !end.is_empty()
            && timestamp_to_seconds(&end) <= timestamp_to_seconds(&start)
        {
            return Err(crate::Error::EndNotAfterStart);
        }

        let mode = cli.mode.parse::<Mode>()?;
        if cli.apple_music && mode != Mode::Audio {
            return Err(crate::Error::AppleMusicRequiresAudio);
        }
        if (!is_blank(&cli.artist) || !is_blank(&cli.song)) && mode != Mode::Audio {
            return Err(crate::Error::OverridesRequireAudio);
        }
        // A whitespace-only --artist is let through and ignored later on
        if !cli.song.is_empty() && clean_title(&cli.song).is_empty() {
            return Err(crate::Error::EmptySong);
        }

        Ok(Config {
            url,
            start,
            end,
            mode,
            output: cli.output,
            artist: cli.artist,
            song: cli.song,
            apple_music: cli.apple_music,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(args: &[&str]) -> crate::Result<Config> {
        let cli = Cli::parse_args(args.iter().copied()).expect("clap accepts these");
        match cli.into_invocation()? {
            Invocation::Run(config) => Ok(config),
            Invocation::Version => panic!("unexpected version invocation"),
        }
    }

    #[test]
    fn version_forms() {
        for args in [&["version"][..], &["--version"], &["--version", "https://x"]] {
            let cli = Cli::parse_args(args.iter().copied()).unwrap();
            assert!(matches!(cli.into_invocation(), Ok(Invocation::Version)));
        }
    }

    #[test]
    fn defaults_and_normalization() {
        let config = config(&["--start", "1:05", "--end", "2:00", "https://x"]).unwrap();
        assert_eq!(config.url, "https://x");
        assert_eq!(config.mode, Mode::Full);
        assert_eq!(config.start, "00:01:05");
        assert_eq!(config.end, "00:02:00");
    }

    #[test]
    fn validation_errors() {
        assert!(matches!(config(&[]), Err(crate::Error::MissingUrl)));
        assert!(matches!(config(&["--start", "99", "u"]), Err(crate::Error::InvalidTimestamp(_))));
        assert!(matches!(
            config(&["--end", "1:2:3:4", "u"]),
            Err(crate::Error::InvalidTimestamp(_))
        ));
        assert!(matches!(
            config(&["--start", "2:00", "--end", "2:00", "u"]),
            Err(crate::Error::EndNotAfterStart)
        ));
        assert!(matches!(config(&["--mode", "podcast", "u"]), Err(crate::Error::UnknownMode(_))));
        assert!(matches!(
            config(&["--apple-music", "u"]),
            Err(crate::Error::AppleMusicRequiresAudio)
        ));
        assert!(matches!(
            config(&["--mode", "video", "--song", "x", "u"]),
            Err(crate::Error::OverridesRequireAudio)
        ));
        assert!(matches!(
            config(&["--mode", "audio", "--song", "  ", "u"]),
            Err(crate::Error::EmptySong)
        ));
        assert!(matches!(
            config(&["--mode", "audio", "--song", "(Official Video)", "u"]),
            Err(crate::Error::EmptySong)
        ));
    }

    #[test]
    fn blank_artist_is_accepted() {
        let config = config(&["--mode", "audio", "--artist", "   ", "u"]).unwrap();
        assert_eq!(config.artist, "   ");
        // Outside audio mode a blank artist doesn't count as an override either
        assert!(Config::try_from(Cli {
            artist: "  ".into(),
            url: Some("u".into()),
            mode: "video".into(),
            ..Default::default()
        })
        .is_ok());
    }

    #[test]
    fn huge_hours_are_validated_not_overflowed() {
        assert!(matches!(
            config(&["--start", "9999999999999999:00:00", "--end", "9999999999999999:00:01", "u"]),
            Err(crate::Error::InvalidTimestamp(_))
        ));

        let config =
            config(&["--start", "4000000000000000:00:00", "--end", "4000000000000000:00:01", "u"])
                .unwrap();
        assert_eq!(config.end, "4000000000000000:00:01");
    }

    #[test]
    fn only_end_given() {
        let config = config(&["--end", "0:30", "u"]).unwrap();
        assert_eq!(config.start, "");
        assert_eq!(config.end, "00:00:30");
    }

    #[test]
    fn usage_mentions_flags() {
        let usage = Cli::usage();
        let flags =
            ["--start", "--end", "--mode", "--output", "--artist", "--song", "--apple-music"];
        for flag in flags {
            assert!(usage.contains(flag), "{} missing from usage", flag);
        }
    }

    #[test]
    fn two_urls_is_a_clap_error() {
        assert!(Cli::parse_args(["a", "b"]).is_err());
    }
}
