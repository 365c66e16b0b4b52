use crate::utils::*;

pub const UNKNOWN_ARTIST: &str = "Unknown Artist";

static MM_SS: once_cell::sync::Lazy<regex::Regex> = once_cell::sync::Lazy::new(|| {
    regex::Regex::new(r"^([0-5]?\d):([0-5]?\d)$").expect("impossible")
});
static HH_MM_SS: once_cell::sync::Lazy<regex::Regex> = once_cell::sync::Lazy::new(|| {
    regex::Regex::new(r"^(\d+):([0-5]?\d):([0-5]?\d)$").expect("impossible")
});

/// Trailing "(Official Video)", "[HD]", "{Lyrics}" and friends
static ANNOTATION: once_cell::sync::Lazy<regex::Regex> = once_cell::sync::Lazy::new(|| {
    regex::Regex::new(
        r"(?i)\s*[\(\[\{][^)\]}]*(official|lyrics?|audio|video|visualizer|mv|hq|hd|4k)[^)\]}]*[\)\]\}]\s*$",
    )
    .expect("impossible")
});

/// Accepts `M:S` or `H:M:S` and returns zero-padded `HH:MM:SS`. Empty input stays empty.
pub fn normalize_timestamp(value: &str) -> crate::Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(String::new());
    }

    let invalid = || crate::Error::InvalidTimestamp(value.to_string());
    let field = |m: Option<regex::Match<'_>>| -> crate::Result<u64> {
        m.and_then(|m| m.as_str().parse().ok()).ok_or_else(invalid)
    };

    if let Some(captures) = MM_SS.captures(value) {
        let (minutes, seconds) = (field(captures.get(1))?, field(captures.get(2))?);
        return Ok(format!("{:02}:{:02}:{:02}", 0, minutes, seconds));
    }
    if let Some(captures) = HH_MM_SS.captures(value) {
        let (hours, minutes, seconds) =
            (field(captures.get(1))?, field(captures.get(2))?, field(captures.get(3))?);
        // Hours are unbounded, but the total must still fit in u64 seconds
        hours
            .checked_mul(3600)
            .and_then(|h| h.checked_add(minutes * 60 + seconds))
            .ok_or_else(invalid)?;
        return Ok(format!("{:02}:{:02}:{:02}", hours, minutes, seconds));
    }

    Err(invalid())
}

/// Only meant for comparing already-normalized timestamps; anything malformed counts as 0
pub fn timestamp_to_seconds(timestamp: &str) -> u64 {
    let parts = timestamp.split(':').collect::<Vec<_>>();
    let [hours, minutes, seconds] = parts[..] else {
        return 0;
    };
    let num = |s: &str| s.parse::<u64>().unwrap_or(0);
    num(hours)
        .saturating_mul(3600)
        .saturating_add(num(minutes).saturating_mul(60))
        .saturating_add(num(seconds))
}

pub fn sanitize_filename_part(value: &str) -> String {
    let mut sanitized = String::with_capacity(value.len());
    for c in value.trim().chars() {
        match c {
            '/' | '\\' => sanitized.push('-'),
            ':' => sanitized.push_str(" -"),
            '*' | '?' | '"' | '<' | '>' | '|' => {}
            other => sanitized.push(other),
        }
    }

    let sanitized = collapse_whitespace(&sanitized);
    if sanitized.is_empty() {
        return "unknown".to_string();
    }
    sanitized
}

pub fn clean_title(raw: &str) -> String {
    let mut s = raw.trim().trim_matches('"').trim_matches('\'').to_string();

    // Annotations can be stacked, e.g. "Song (Official Video) [HD]"
    loop {
        let stripped = ANNOTATION.replace_all(&s, "");
        if stripped == s {
            break;
        }
        s = stripped.trim().to_string();
    }

    collapse_whitespace(&s)
}

pub fn clean_artist(raw: &str) -> String {
    let s = raw.trim();
    let s = s.strip_suffix(" - Topic").unwrap_or(s);
    let s = s.strip_suffix(" VEVO").unwrap_or(s);

    let s = collapse_whitespace(s);
    if s.is_empty() {
        return UNKNOWN_ARTIST.to_string();
    }
    s
}
