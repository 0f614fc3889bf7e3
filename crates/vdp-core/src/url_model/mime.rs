//! MIME type and quality-label inference from media URLs.

use regex::Regex;
use std::sync::OnceLock;

/// MIME type guessed from the file extension appearing in `src`.
pub fn mime_from_src(src: &str) -> &'static str {
    if src.contains(".mp4") {
        "video/mp4"
    } else if src.contains(".webm") {
        "video/webm"
    } else if src.contains(".ogg") || src.contains(".ogv") {
        "video/ogg"
    } else if src.contains(".m3u8") {
        "application/x-mpegURL"
    } else if src.contains(".mpd") {
        "application/dash+xml"
    } else {
        "video/mp4"
    }
}

/// File extension (with dot) for a MIME type; unknown types download as `.mp4`.
pub fn extension_for_mime(mime_type: &str) -> &'static str {
    if mime_type.contains("mp4") {
        ".mp4"
    } else if mime_type.contains("webm") {
        ".webm"
    } else if mime_type.contains("ogg") {
        ".ogg"
    } else {
        ".mp4"
    }
}

fn resolution_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d+)p").expect("resolution regex"))
}

/// `"<digits>p"` label taken from the URL (e.g. `720p` from `clip_720p.mp4`).
pub fn resolution_label(src: &str) -> Option<String> {
    resolution_re()
        .captures(src)
        .map(|caps| format!("{}p", &caps[1]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mime_by_extension() {
        assert_eq!(mime_from_src("https://e.x/a.mp4"), "video/mp4");
        assert_eq!(mime_from_src("https://e.x/a.webm"), "video/webm");
        assert_eq!(mime_from_src("https://e.x/a.ogv"), "video/ogg");
        assert_eq!(mime_from_src("https://e.x/a.ogg"), "video/ogg");
        assert_eq!(mime_from_src("https://e.x/live.m3u8?t=1"), "application/x-mpegURL");
        assert_eq!(mime_from_src("https://e.x/manifest.mpd"), "application/dash+xml");
        assert_eq!(mime_from_src("https://e.x/blob"), "video/mp4");
    }

    #[test]
    fn extension_by_mime() {
        assert_eq!(extension_for_mime("video/webm"), ".webm");
        assert_eq!(extension_for_mime("video/ogg"), ".ogg");
        assert_eq!(extension_for_mime("application/dash+xml"), ".mp4");
    }

    #[test]
    fn resolution_from_url() {
        assert_eq!(resolution_label("https://e.x/clip_720p.mp4").as_deref(), Some("720p"));
        assert_eq!(resolution_label("https://e.x/1080p/clip.mp4").as_deref(), Some("1080p"));
        assert_eq!(resolution_label("https://e.x/clip.mp4"), None);
    }
}
