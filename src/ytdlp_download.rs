use crate::metadata::*;
use crate::runner::*;
use crate::text::*;

/// Points at a specific yt-dlp binary, skipping the PATH search
pub const ENGINE_ENV: &str = "YTCLI_YT_DLP";

fn explicit_engine(value: Option<std::ffi::OsString>) -> Option<std::path::PathBuf> {
    let path = std::path::PathBuf::from(value?);
    if path.is_file() {
        return Some(path);
    }
    log::warn!("{} is set to {} which is not a file, ignoring it", ENGINE_ENV, path.display());
    None
}

/// yt-dlp installed with `pip install` into a project-local virtualenv
fn venv_engine(cwd: &std::path::Path) -> Option<std::path::PathBuf> {
    let candidate = if cfg!(windows) {
        cwd.join(".venv").join("Scripts").join("yt-dlp.exe")
    } else {
        cwd.join(".venv").join("bin").join("yt-dlp")
    };
    candidate.is_file().then_some(candidate)
}

pub fn resolve_engine_binary() -> crate::Result<std::path::PathBuf> {
    if let Some(path) = explicit_engine(std::env::var_os(ENGINE_ENV)) {
        log::debug!("using yt-dlp from {}: {}", ENGINE_ENV, path.display());
        return Ok(path);
    }
    if let Ok(path) = which::which("yt-dlp") {
        log::debug!("using yt-dlp from PATH: {}", path.display());
        return Ok(path);
    }

    let cwd = std::env::current_dir().map_err(crate::Error::CurrentDir)?;
    let path = venv_engine(&cwd).ok_or(crate::Error::EngineNotFound)?;
    log::debug!("using yt-dlp from local virtualenv: {}", path.display());
    Ok(path)
}

fn metadata_args(url: &str) -> Vec<String> {
    [
        "--skip-download",
        "--no-warnings",
        "--print",
        "%(artist,uploader)s",
        "--print",
        "%(track,title)s",
        url,
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

/// Dry run that asks yt-dlp for (artist or uploader, track or title). Both fields are taken as
/// they are, only cleaned up; a track name containing " - " is not split again.
pub async fn fetch_track_metadata(
    runner: &dyn CommandRunner,
    engine: &std::path::Path,
    url: &str,
) -> crate::Result<TrackMetadata> {
    let output = runner
        .output(engine, &metadata_args(url))
        .await
        .map_err(|e| crate::Error::MetadataFetch(format!("failed to run yt-dlp: {}", e)))?;
    if !output.exit.success() {
        return Err(crate::Error::MetadataFetch(format!("yt-dlp {}", output.exit)));
    }

    let lines = output.stdout.lines().map(str::trim).filter(|l| !l.is_empty()).collect::<Vec<_>>();
    let [uploader, title, ..] = lines[..] else {
        return Err(crate::Error::MetadataFetch("failed to fetch artist/title metadata".into()));
    };

    let meta = TrackMetadata { artist: clean_artist(uploader), title: clean_title(title) };
    if meta.title.is_empty() {
        return Err(crate::Error::MetadataFetch("missing track title metadata".into()));
    }
    Ok(meta)
}

/// Appends the directive that makes yt-dlp announce the final path, keeping the URL last
pub fn request_final_path(args: &mut Vec<String>) {
    let at = args.len().saturating_sub(1);
    args.insert(at, format!("after_move:{}%(filepath)s", FINAL_PATH_PREFIX));
    args.insert(at, "--print".to_string());
}

/// Runs the real download. With `capture_final_path`, stdout is filtered through the sentinel
/// classifier and the final file path is returned; otherwise output goes straight to the terminal.
pub async fn download(
    runner: &dyn CommandRunner,
    engine: &std::path::Path,
    mut args: Vec<String>,
    capture_final_path: bool,
    out: &mut (impl std::io::Write + Send),
) -> crate::Result<Option<String>> {
    let spawn_error = |source: std::io::Error| crate::Error::Spawn {
        program: engine.display().to_string(),
        source,
    };

    if !capture_final_path {
        let exit = runner.relay(engine, &args).await.map_err(spawn_error)?;
        if !exit.success() {
            return Err(crate::Error::DownloadFailed(exit.to_string()));
        }
        return Ok(None);
    }

    request_final_path(&mut args);
    let process = runner.spawn_lines(engine, &args).map_err(spawn_error)?;
    let final_path = relay_capturing_final_path(process.lines, out).await?;
    let exit = process.exit.await.map_err(|e| crate::Error::DownloadFailed(e.to_string()))?;
    if !exit.success() {
        return Err(crate::Error::DownloadFailed(exit.to_string()));
    }

    Ok(final_path)
}
