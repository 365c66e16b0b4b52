use crate::text::*;
use crate::utils::*;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TrackMetadata {
    pub artist: String,
    pub title: String,
}

impl std::fmt::Display for TrackMetadata {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {}", self.artist, self.title)
    }
}

/// Tried left to right, first split with both halves non-empty wins
const TITLE_SEPARATORS: &[&str] = &[" - ", " – ", " — ", " | ", ": "];

static TITLE_BY_ARTIST: once_cell::sync::Lazy<regex::Regex> = once_cell::sync::Lazy::new(|| {
    regex::Regex::new(r"(?i)^(.+?)\s+by\s+(.+)$").expect("impossible")
});

fn split_on_separator(title: &str) -> Option<TrackMetadata> {
    TITLE_SEPARATORS.iter().find_map(|sep| {
        let (artist, title) = title.split_once(sep)?;
        let (artist, title) = (clean_artist(artist), clean_title(title));
        if artist.is_empty() || title.is_empty() {
            return None;
        }
        Some(TrackMetadata { artist, title })
    })
}

fn match_title_by_artist(title: &str) -> Option<TrackMetadata> {
    let captures = TITLE_BY_ARTIST.captures(title)?;
    Some(TrackMetadata {
        artist: clean_artist(captures.get(2)?.as_str()),
        title: clean_title(captures.get(1)?.as_str()),
    })
}

/// Best guess at artist and title from a video title and its uploader.
///
/// "Artist - Title" style separators are trusted over "Title by Artist", which misfires more
/// often on compilations. With neither, the uploader is taken as the artist.
///
/// Meant for a raw video title. yt-dlp's own track/artist fields are already split and must not
/// go through this.
#[allow(dead_code)]
pub fn parse_track_metadata(raw_title: &str, raw_uploader: &str) -> TrackMetadata {
    let title = clean_title(raw_title);

    if let Some(meta) = split_on_separator(&title) {
        return meta;
    }
    if let Some(meta) = match_title_by_artist(&title) {
        return meta;
    }

    TrackMetadata { artist: clean_artist(raw_uploader), title }
}

/// Reads "Artist - Title.ext" back out of a downloaded file name. Returns None when there is
/// nothing usable as a title.
pub fn infer_track_metadata_from_path(path: &std::path::Path) -> Option<TrackMetadata> {
    let name = path.file_name()?.to_string_lossy();
    // Everything after the last dot is the extension, so "/tmp/.mp3" has an empty stem
    let stem = name.rsplit_once('.').map_or(&*name, |(stem, _ext)| stem).trim();
    if stem.is_empty() {
        return None;
    }

    if let Some((artist, title)) = stem.split_once(" - ") {
        let title = clean_title(title);
        if !title.is_empty() {
            return Some(TrackMetadata { artist: clean_artist(artist), title });
        }
    }

    let title = clean_title(stem);
    if title.is_empty() {
        return None;
    }
    Some(TrackMetadata { artist: UNKNOWN_ARTIST.to_string(), title })
}

/// Layers the user's `--artist`/`--song` over whatever was fetched.
///
/// With both overrides blank the input is handed back untouched and `applied` is false.
pub fn apply_manual_metadata(
    base: Option<TrackMetadata>,
    artist_override: &str,
    song_override: &str,
) -> (Option<TrackMetadata>, bool) {
    if is_blank(artist_override) && is_blank(song_override) {
        return (base, false);
    }

    let mut combined = base.unwrap_or_default();
    if !is_blank(artist_override) {
        combined.artist = clean_artist(artist_override);
    }
    if !is_blank(song_override) {
        combined.title = clean_title(song_override);
    }
    if is_blank(&combined.artist) {
        combined.artist = UNKNOWN_ARTIST.to_string();
    }

    (Some(combined), true)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(artist: &str, title: &str) -> TrackMetadata {
        TrackMetadata { artist: artist.into(), title: title.into() }
    }

    #[test]
    fn artist_dash_title() {
        assert_eq!(
            parse_track_metadata(
                "Daft Punk - Harder Better Faster Stronger (Official Video)",
                "Random Channel"
            ),
            meta("Daft Punk", "Harder Better Faster Stronger")
        );
    }

    #[test]
    fn title_by_artist() {
        assert_eq!(
            parse_track_metadata("Believer by Imagine Dragons", "Imagine Dragons - Topic"),
            meta("Imagine Dragons", "Believer")
        );
        assert_eq!(
            parse_track_metadata("Song BY The Band [HD]", "x"),
            meta("The Band", "Song")
        );
    }

    #[test]
    fn falls_back_to_uploader() {
        assert_eq!(
            parse_track_metadata("Mystery Song", "Unknown Uploader VEVO"),
            meta("Unknown Uploader", "Mystery Song")
        );
        assert_eq!(parse_track_metadata("Mystery Song", ""), meta(UNKNOWN_ARTIST, "Mystery Song"));
    }

    #[test]
    fn separator_order() {
        // " - " beats " | " even though the pipe comes first in the string
        assert_eq!(parse_track_metadata("A | B - C", "x"), meta("A | B", "C"));
        assert_eq!(parse_track_metadata("Artist – Title", "x"), meta("Artist", "Title"));
        assert_eq!(parse_track_metadata("Artist — Title", "x"), meta("Artist", "Title"));
        assert_eq!(parse_track_metadata("Artist | Title", "x"), meta("Artist", "Title"));
        assert_eq!(parse_track_metadata("Artist: Title", "x"), meta("Artist", "Title"));
        // Separators win over "by"
        assert_eq!(
            parse_track_metadata("Composer - Written by Someone", "x"),
            meta("Composer", "Written by Someone")
        );
    }

    #[test]
    fn annotation_only_title_side() {
        // The annotation goes first, which leaves no separator to split on
        assert_eq!(parse_track_metadata("Band - (Official Video)", "Chan"), meta("Chan", "Band -"));
    }

    #[test]
    fn infer_from_path() {
        assert_eq!(
            infer_track_metadata_from_path("/tmp/Daft Punk - One More Time.mp3".as_ref()),
            Some(meta("Daft Punk", "One More Time"))
        );
        assert_eq!(
            infer_track_metadata_from_path("/tmp/Just A Title.mp3".as_ref()),
            Some(meta(UNKNOWN_ARTIST, "Just A Title"))
        );
        assert_eq!(
            infer_track_metadata_from_path("/tmp/Band - (Official Audio).mp3".as_ref()),
            Some(meta(UNKNOWN_ARTIST, "Band -"))
        );
        assert_eq!(infer_track_metadata_from_path("/tmp/.mp3".as_ref()), None);
        assert_eq!(infer_track_metadata_from_path("/tmp/  .mp3".as_ref()), None);
        assert_eq!(infer_track_metadata_from_path("".as_ref()), None);
    }

    #[test]
    fn manual_overrides_noop_is_identity() {
        let (out, applied) = apply_manual_metadata(None, "", "");
        assert!(out.is_none());
        assert!(!applied);

        // Same allocation comes back, not a rebuilt copy
        let base = meta("A", "T");
        let title_ptr = base.title.as_ptr();
        let (out, applied) = apply_manual_metadata(Some(base), "  ", "");
        assert!(!applied);
        let out = out.unwrap();
        assert_eq!(out, meta("A", "T"));
        assert_eq!(out.title.as_ptr(), title_ptr);
    }

    #[test]
    fn manual_overrides_replace_fields() {
        let base = Some(meta("Fetched", "Fetched Title"));

        let (out, applied) = apply_manual_metadata(base.clone(), "Band VEVO", "");
        assert!(applied);
        assert_eq!(out, Some(meta("Band", "Fetched Title")));

        let (out, _) = apply_manual_metadata(base, "", "New Song (Official Audio)");
        assert_eq!(out, Some(meta("Fetched", "New Song")));

        let (out, _) = apply_manual_metadata(None, "", "Only Song");
        assert_eq!(out, Some(meta(UNKNOWN_ARTIST, "Only Song")));
    }
}
