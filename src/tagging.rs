use crate::metadata::*;
use crate::runner::*;
use crate::utils::*;

/// Points at a specific ffmpeg binary; plain `ffmpeg` from PATH otherwise
pub const MUXER_ENV: &str = "YTCLI_FFMPEG";

pub fn muxer_binary() -> std::path::PathBuf {
    std::env::var_os(MUXER_ENV)
        .filter(|value| !value.is_empty())
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|| "ffmpeg".into())
}

/// Deletes the file when dropped, unless it was already moved away
struct RemoveOnDrop<'a>(&'a std::path::Path);
impl Drop for RemoveOnDrop<'_> {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(self.0) {
            if e.kind() != std::io::ErrorKind::NotFound {
                log::warn!("failed to remove {}: {}", self.0.display(), e);
            }
        }
    }
}

/// `dir/song.mp3` -> `dir/song.ytcli-tagging.mp3`, same directory so the final rename is atomic
fn tagging_temp_path(path: &std::path::Path) -> std::path::PathBuf {
    let name = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
    let temp_name = match name.rsplit_once('.') {
        Some((stem, ext)) => format!("{}.ytcli-tagging.{}", stem, ext),
        None => format!("{}.ytcli-tagging", name),
    };
    path.with_file_name(temp_name)
}

fn muxer_args(
    source: &std::path::Path,
    temp: &std::path::Path,
    meta: &TrackMetadata,
) -> Vec<String> {
    let mut args = ["-hide_banner", "-loglevel", "error", "-nostdin", "-y", "-i"]
        .into_iter()
        .map(String::from)
        .collect::<Vec<_>>();
    args.push(source.to_string_lossy().into_owned());
    args.extend(["-map", "0", "-c", "copy"].map(String::from));
    args.extend(["-metadata".to_string(), format!("artist={}", meta.artist)]);
    args.extend(["-metadata".to_string(), format!("title={}", meta.title)]);
    args.push(temp.to_string_lossy().into_owned());
    args
}

/// Stamps artist/title into the file by remuxing into a sibling temp file and renaming it over
/// the original. The temp file never outlives this call.
pub async fn write_audio_metadata(
    runner: &dyn CommandRunner,
    muxer: &std::path::Path,
    path: &std::path::Path,
    meta: &TrackMetadata,
) -> crate::Result<()> {
    let path = absolute_path(path).map_err(|e| {
        crate::Error::Tagging(format!("failed to resolve downloaded file path: {}", e))
    })?;
    if let Err(e) = std::fs::metadata(&path) {
        let msg = format!("downloaded file not found for metadata tagging: {}", e);
        return Err(crate::Error::Tagging(msg));
    }

    let temp = tagging_temp_path(&path);
    let _cleanup = RemoveOnDrop(&temp);

    let output = runner
        .output(muxer, &muxer_args(&path, &temp, meta))
        .await
        .map_err(|e| crate::Error::Tagging(format!("ffmpeg metadata write failed: {}", e)))?;
    if !output.exit.success() {
        let mut message = output.diagnostics();
        if message.is_empty() {
            message = output.exit.to_string();
        }
        return Err(crate::Error::Tagging(format!("ffmpeg metadata write failed: {}", message)));
    }

    std::fs::rename(&temp, &path)
        .map_err(|e| crate::Error::Tagging(format!("failed to finalize tagged audio file: {}", e)))
}
