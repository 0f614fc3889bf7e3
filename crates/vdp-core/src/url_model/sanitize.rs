//! Download file names derived from video titles.

use super::mime::extension_for_mime;

/// Titles are cut to this many characters before the extension is appended.
pub const MAX_TITLE_CHARS: usize = 100;

/// Replaces path-hostile characters (`/ \ : * ? " < > |` and control characters)
/// with `_` and truncates to [`MAX_TITLE_CHARS`] characters.
pub fn sanitize_title(title: &str) -> String {
    title
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .take(MAX_TITLE_CHARS)
        .collect()
}

/// `<sanitized title><ext>`, falling back to `video` for an empty title.
pub fn file_name_for(title: &str, mime_type: &str) -> String {
    let mut stem = sanitize_title(title.trim());
    if stem.is_empty() {
        stem.push_str("video");
    }
    format!("{}{}", stem, extension_for_mime(mime_type))
}
