use crate::args::*;
use crate::config::*;
use crate::library_import::*;
use crate::metadata::*;
use crate::runner::*;
use crate::tagging::*;
use crate::text::*;
use crate::utils::*;
use crate::ytdlp_download::*;

/// What reconciling fetched metadata against the downloaded file name amounted to
#[derive(Debug, PartialEq, Eq)]
pub enum Reconciliation {
    /// Nothing was missing
    Kept,
    /// Nothing had been fetched; the file name supplied everything
    Inferred,
    /// Blank or defaulted fields were filled from the file name
    Filled,
    /// Something was missing and the file name didn't help
    Failed,
}

/// Fills in whatever is missing from `meta` using the downloaded file's name. Fields that are
/// already known are never overwritten.
///
/// An "Unknown Artist" counts as missing unless the user passed `--artist` themselves.
pub fn reconcile_metadata(
    meta: Option<TrackMetadata>,
    final_path: &std::path::Path,
    artist_override: &str,
) -> (Option<TrackMetadata>, Reconciliation) {
    let artist_defaulted =
        |meta: &TrackMetadata| meta.artist == UNKNOWN_ARTIST && is_blank(artist_override);
    let needs_inference = match &meta {
        None => true,
        Some(m) => is_blank(&m.title) || is_blank(&m.artist) || artist_defaulted(m),
    };
    if !needs_inference {
        return (meta, Reconciliation::Kept);
    }

    let Some(inferred) = infer_track_metadata_from_path(final_path) else {
        return (meta, Reconciliation::Failed);
    };
    let Some(mut meta) = meta else {
        return (Some(inferred), Reconciliation::Inferred);
    };

    if is_blank(&meta.title) {
        meta.title = inferred.title;
    }
    if is_blank(&meta.artist) || artist_defaulted(&meta) {
        meta.artist = inferred.artist;
    }
    (Some(meta), Reconciliation::Filled)
}

/// One download from start to finish
pub struct Pipeline<'a, W> {
    runner: &'a dyn CommandRunner,
    engine: std::path::PathBuf,
    muxer: std::path::PathBuf,
    out: W,
}

impl<'a, W: std::io::Write + Send> Pipeline<'a, W> {
    pub fn new(
        runner: &'a dyn CommandRunner,
        engine: std::path::PathBuf,
        muxer: std::path::PathBuf,
        out: W,
    ) -> Self {
        Self { runner, engine, muxer, out }
    }

    fn say(&mut self, msg: impl std::fmt::Display) {
        if let Err(e) = writeln!(self.out, "{}", msg) {
            log::debug!("failed to write to output: {}", e);
        }
    }

    pub async fn run(&mut self, config: &Config) -> crate::Result<()> {
        let meta = match config.mode {
            Mode::Audio => self.heuristic_metadata(config).await,
            Mode::Video | Mode::Full => None,
        };

        let args = build_args(config, meta.as_ref())?;
        let final_path = download(
            self.runner,
            &self.engine,
            args,
            config.needs_final_path(),
            &mut self.out,
        )
        .await?;
        let final_path = final_path.filter(|path| !is_blank(path));

        if config.mode == Mode::Audio {
            match &final_path {
                Some(path) => self.tag(config, meta, path.as_ref()).await,
                None => log::warn!(
                    "download completed but output path was unavailable, skipping metadata tagging"
                ),
            }
        }

        if config.apple_music {
            let path = final_path.ok_or(crate::Error::FinalPathUnknown)?;
            import_into_apple_music(self.runner, path.as_ref()).await?;
            self.say(format!("Imported into Apple Music: {}", path));
        }

        self.say("Download completed successfully.");
        Ok(())
    }

    async fn heuristic_metadata(&mut self, config: &Config) -> Option<TrackMetadata> {
        let meta = match fetch_track_metadata(self.runner, &self.engine, &config.url).await {
            Ok(meta) => {
                self.say(format!("Parsed audio metadata: {}", meta));
                Some(meta)
            }
            Err(e) => {
                log::warn!(
                    "metadata parsing failed, using yt-dlp artist/title fallback template ({})",
                    e
                );
                None
            }
        };

        let (meta, applied) = apply_manual_metadata(meta, &config.artist, &config.song);
        if let (true, Some(meta)) = (applied, &meta) {
            self.say(format!("Using manual metadata override: {}", meta));
        }
        meta
    }

    async fn tag(&mut self, config: &Config, meta: Option<TrackMetadata>, path: &std::path::Path) {
        let (meta, reconciliation) = reconcile_metadata(meta, path, &config.artist);
        match (&reconciliation, &meta) {
            (Reconciliation::Failed, _) => {
                log::warn!("metadata unavailable and could not infer tags from file name")
            }
            (Reconciliation::Inferred, Some(meta)) => {
                log::warn!("metadata fetch failed, inferred tags from filename: {}", meta)
            }
            (Reconciliation::Filled, Some(meta)) => {
                log::info!("filled in missing tags from filename: {}", meta)
            }
            _ => {}
        }

        let Some(meta) = meta else { return };
        if is_blank(&meta.title) {
            log::warn!("metadata title is empty, skipping audio metadata tagging");
            return;
        }

        match write_audio_metadata(self.runner, &self.muxer, path, &meta).await {
            Ok(()) => self.say(format!("Tagged audio metadata: {}", meta)),
            Err(e) => log::warn!("failed to write audio metadata tags ({})", e),
        }
    }
}

/// Runs one invocation against the real yt-dlp/ffmpeg, writing user-facing output to `out`
pub async fn run(config: &Config, out: impl std::io::Write + Send) -> crate::Result<()> {
    let engine = resolve_engine_binary()?;
    Pipeline::new(&TokioRunner, engine, muxer_binary(), out).run(config).await
}
