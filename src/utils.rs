/// Joins whitespace-separated words with single spaces, dropping leading/trailing whitespace
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

/// Expands a leading `~` or `~/` to the home directory. `~user` forms are left alone.
pub fn expand_home(path: &str) -> crate::Result<std::path::PathBuf> {
    if path != "~" && !path.starts_with("~/") {
        return Ok(std::path::PathBuf::from(path));
    }

    let home = dirs::home_dir().ok_or(crate::Error::HomeDir)?;
    Ok(match path.strip_prefix("~/") {
        Some(rest) => home.join(rest),
        None => home,
    })
}

pub fn absolute_path(path: &std::path::Path) -> std::io::Result<std::path::PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    Ok(std::env::current_dir()?.join(path))
}

/// Whether the user typed the path with a trailing separator, i.e. meant a directory
pub fn ends_with_separator(path: &str) -> bool {
    path.ends_with('/') || path.ends_with('\\')
}
