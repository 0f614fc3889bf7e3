//! Page locations, relative-to-absolute URL resolution, and file naming.
//!
//! Resolution follows the scanner's rules rather than full RFC 3986 joining:
//! absolute `http(s)` URLs are kept, protocol-relative URLs inherit the page
//! protocol, root-relative URLs join the origin, and anything else joins the
//! directory of the current path. The result is then validated and normalized
//! by `url::Url` so every pass of a scan compares URLs in the same form.

mod mime;
mod sanitize;

pub use mime::{extension_for_mime, mime_from_src, resolution_label};
pub use sanitize::{file_name_for, sanitize_title, MAX_TITLE_CHARS};

use url::Url;

/// The parts of a page URL the resolver needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLocation {
    /// Full page URL.
    pub href: String,
    /// Scheme with trailing colon, e.g. `https:`.
    pub protocol: String,
    /// `scheme://host[:port]`.
    pub origin: String,
    /// Path component, always starting with `/` for hierarchical URLs.
    pub pathname: String,
}

impl PageLocation {
    pub fn parse(page_url: &str) -> Result<Self, url::ParseError> {
        let url = Url::parse(page_url)?;
        Ok(Self {
            href: url.to_string(),
            protocol: format!("{}:", url.scheme()),
            origin: url.origin().ascii_serialization(),
            pathname: url.path().to_string(),
        })
    }

    /// Directory of the current path, with trailing slash (`/videos/` for `/videos/page.html`).
    pub fn directory(&self) -> String {
        let mut parts: Vec<&str> = self.pathname.split('/').collect();
        parts.pop();
        format!("{}/", parts.join("/"))
    }

    /// Makes `raw` absolute against this page. Empty input stays empty.
    pub fn make_absolute(&self, raw: &str) -> String {
        let raw = raw.trim();
        if raw.is_empty() {
            return String::new();
        }
        if raw.starts_with("http://") || raw.starts_with("https://") {
            return raw.to_string();
        }
        if raw.starts_with("//") {
            return format!("{}{}", self.protocol, raw);
        }
        if raw.starts_with('/') {
            format!("{}{}", self.origin, raw)
        } else {
            format!("{}{}{}", self.origin, self.directory(), raw)
        }
    }

    /// Makes `raw` absolute and validates it. Returns the normalized URL.
    pub fn resolve(&self, raw: &str) -> Option<String> {
        normalize_url(&self.make_absolute(raw))
    }
}

/// Parses and re-serializes `candidate`; `None` if it is not a valid URL.
pub fn normalize_url(candidate: &str) -> Option<String> {
    if candidate.is_empty() {
        return None;
    }
    Url::parse(candidate).ok().map(String::from)
}
