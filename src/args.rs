use crate::config::*;
use crate::metadata::*;
use crate::text::*;
use crate::utils::*;

/// Lets yt-dlp fill in artist and title itself when we know nothing yet
pub const LIVE_AUDIO_TEMPLATE: &str = "%(artist,uploader)s - %(track,title)s.%(ext)s";
const GENERIC_TEMPLATE: &str = "%(title)s.%(ext)s";

fn default_template(mode: Mode, meta: Option<&TrackMetadata>) -> String {
    if mode != Mode::Audio {
        return GENERIC_TEMPLATE.to_string();
    }

    match meta {
        Some(meta) if !is_blank(&meta.title) => {
            let artist = if is_blank(&meta.artist) { UNKNOWN_ARTIST } else { meta.artist.as_str() };
            format!(
                "{} - {}.%(ext)s",
                sanitize_filename_part(artist),
                sanitize_filename_part(&meta.title)
            )
        }
        _ => LIVE_AUDIO_TEMPLATE.to_string(),
    }
}

/// Resolves the `-o` value. None means yt-dlp picks the name (only outside audio mode).
///
/// An existing directory, or a path typed with a trailing separator, gets the default file name
/// template appended. Anything else is taken as the literal target file.
pub fn output_template(
    output: &str,
    config: &Config,
    meta: Option<&TrackMetadata>,
) -> crate::Result<Option<String>> {
    let template = default_template(config.mode, meta);

    if output.is_empty() {
        return Ok(match config.mode {
            Mode::Audio => Some(template),
            Mode::Video | Mode::Full => None,
        });
    }

    let expanded = expand_home(output)?;
    let is_dir = match std::fs::metadata(&expanded) {
        Ok(metadata) => metadata.is_dir(),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => false,
        Err(e) => return Err(crate::Error::OutputPath(e)),
    };

    let target =
        if is_dir || ends_with_separator(output) { expanded.join(template) } else { expanded };
    Ok(Some(target.to_string_lossy().into_owned()))
}

/// Full yt-dlp argument list for the real download, URL last
pub fn build_args(config: &Config, meta: Option<&TrackMetadata>) -> crate::Result<Vec<String>> {
    let mut args: Vec<String> = match config.mode {
        Mode::Audio => vec!["-x", "--audio-format", "mp3", "--audio-quality", "0"],
        Mode::Video => vec!["-f", "bv*[ext=mp4]/bv*", "--recode-video", "mp4"],
        Mode::Full => vec!["-f", "bv*+ba/b", "--merge-output-format", "mp4"],
    }
    .into_iter()
    .map(String::from)
    .collect();

    if !config.start.is_empty() || !config.end.is_empty() {
        let start = if config.start.is_empty() { "00:00:00" } else { config.start.as_str() };
        // https://www.reddit.com/r/youtubedl/wiki/howdoidownloadpartsofavideo/
        args.push("--download-sections".into());
        args.push(format!("*{}-{}", start, config.end));
    }

    if let Some(template) = output_template(&config.output, config, meta)? {
        args.push("-o".into());
        args.push(template);
    }

    args.push(config.url.clone());
    Ok(args)
}
