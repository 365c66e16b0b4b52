use crate::runner::*;
use crate::utils::*;

const MUSIC_IMPORT_SCRIPT: &str = r#"
on run argv
	set targetPath to POSIX file (item 1 of argv)
	tell application "Music"
		add targetPath
	end tell
end run
"#;

/// Adds the file to the Music.app library through osascript. macOS only.
pub async fn import_into_apple_music(
    runner: &dyn CommandRunner,
    path: &std::path::Path,
) -> crate::Result<()> {
    if !cfg!(target_os = "macos") {
        return Err(crate::Error::ImportUnsupported);
    }
    import_with(runner, "osascript".as_ref(), path).await
}

async fn import_with(
    runner: &dyn CommandRunner,
    importer: &std::path::Path,
    path: &std::path::Path,
) -> crate::Result<()> {
    let path = absolute_path(path).map_err(|e| {
        crate::Error::Import(format!("failed to resolve downloaded file path: {}", e))
    })?;
    if let Err(e) = std::fs::metadata(&path) {
        let msg = format!("downloaded file not found for Apple Music import: {}", e);
        return Err(crate::Error::Import(msg));
    }

    let args = vec![
        "-e".to_string(),
        MUSIC_IMPORT_SCRIPT.to_string(),
        path.to_string_lossy().into_owned(),
    ];
    let output = runner
        .output(importer, &args)
        .await
        .map_err(|e| crate::Error::Import(format!("failed to import into Apple Music: {}", e)))?;

    // stdout carries the added track's reference; complaints only ever show up on stderr
    let complaint = output.stderr.trim();
    if !output.exit.success() || !complaint.is_empty() {
        let message =
            if complaint.is_empty() { output.exit.to_string() } else { complaint.to_string() };
        let message = format!("failed to import into Apple Music: {}", message);
        return Err(crate::Error::Import(message));
    }

    log::debug!("osascript said: {}", output.stdout.trim());
    Ok(())
}
