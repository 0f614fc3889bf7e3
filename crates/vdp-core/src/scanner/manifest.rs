//! Manifest-link pass: HLS (`.m3u8`) and DASH (`.mpd`) URLs in raw markup.
//!
//! The patterns only find the extension plus an optional query string and the
//! delimiter that ends the token. The rest of the URL is recovered by walking
//! backward from the match to the nearest quote, whitespace or parenthesis, so
//! URLs inside attributes, inline scripts and CSS `url(...)` are all found.

use regex::Regex;
use std::sync::OnceLock;

use crate::url_model::PageLocation;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestFormat {
    Hls,
    Dash,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestMatch {
    pub format: ManifestFormat,
    /// Absolute, validated URL.
    pub url: String,
}

fn hls_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"\.m3u8(\?[^"'\s]*)?["'\s]"#).expect("hls regex"))
}

fn dash_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"\.mpd(\?[^"'\s]*)?["'\s]"#).expect("dash regex"))
}

/// Same whitespace notion as `\s` in the patterns, so both directions agree.
fn is_token_boundary(c: char) -> bool {
    matches!(c, '"' | '\'' | '(' | ')') || c.is_whitespace()
}

/// Finds manifest URLs in `markup`, HLS matches first, each in document order.
///
/// Tokens that do not resolve to a valid URL are dropped. Duplicates are kept;
/// the caller decides what is already known.
pub fn find_manifest_urls(markup: &str, location: &PageLocation) -> Vec<ManifestMatch> {
    let mut found = Vec::new();
    for (format, re) in [(ManifestFormat::Hls, hls_re()), (ManifestFormat::Dash, dash_re())] {
        for m in re.find_iter(markup) {
            let token = token_before(markup, m.start(), m.as_str());
            match location.resolve(token) {
                Some(url) => found.push(ManifestMatch { format, url }),
                None => tracing::debug!(token, "discarding unresolvable manifest token"),
            }
        }
    }
    found
}

/// Text from the last token boundary before the match at `start` up to
/// (excluding) the delimiter that ends `matched`.
///
/// The delimiter may be multi-byte whitespace (NBSP, U+3000), so both cuts are
/// taken at char indices.
fn token_before<'a>(markup: &'a str, start: usize, matched: &str) -> &'a str {
    let begin = markup[..start]
        .char_indices()
        .rev()
        .find(|&(_, c)| is_token_boundary(c))
        .map(|(i, c)| i + c.len_utf8())
        .unwrap_or(0);
    let delimiter = matched
        .char_indices()
        .last()
        .map(|(i, _)| i)
        .unwrap_or(matched.len());
    markup[begin..start + delimiter].trim()
}
