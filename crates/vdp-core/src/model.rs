//! Video descriptors exchanged between the page context and the popup.
//!
//! Descriptors are plain values: they cross context boundaries as serialized
//! copies and are rebuilt from scratch on every scan.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Third-party player hosts recognized in embedded iframes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Youtube,
    Vimeo,
    Facebook,
}

impl Platform {
    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Youtube => "youtube",
            Platform::Vimeo => "vimeo",
            Platform::Facebook => "facebook",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a descriptor was discovered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoKind {
    /// A `<video>` element in the page.
    Native,
    /// An `.m3u8` link found in the markup.
    Hls,
    /// An `.mpd` link found in the markup.
    Dash,
    Youtube,
    Vimeo,
    Facebook,
}

impl VideoKind {
    pub fn embed(platform: Platform) -> Self {
        match platform {
            Platform::Youtube => VideoKind::Youtube,
            Platform::Vimeo => VideoKind::Vimeo,
            Platform::Facebook => VideoKind::Facebook,
        }
    }

    /// The embed platform, if this kind needs the dispatcher before download.
    pub fn platform(self) -> Option<Platform> {
        match self {
            VideoKind::Youtube => Some(Platform::Youtube),
            VideoKind::Vimeo => Some(Platform::Vimeo),
            VideoKind::Facebook => Some(Platform::Facebook),
            VideoKind::Native | VideoKind::Hls | VideoKind::Dash => None,
        }
    }

    /// Short upper-case tag for list rendering.
    pub fn tag(self) -> &'static str {
        match self {
            VideoKind::Native => "HTML5",
            VideoKind::Hls => "HLS",
            VideoKind::Dash => "DASH",
            VideoKind::Youtube => "YOUTUBE",
            VideoKind::Vimeo => "VIMEO",
            VideoKind::Facebook => "FACEBOOK",
        }
    }
}

/// One selectable rendition of a descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityOption {
    /// Absent for embeds pending resolution.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub label: String,
    pub mime_type: String,
    /// Free-form: "Unknown", "Varies", or an estimate.
    pub size_hint: String,
}

impl QualityOption {
    pub fn new(url: Option<String>, label: &str, mime_type: &str, size_hint: &str) -> Self {
        Self {
            url,
            label: label.to_string(),
            mime_type: mime_type.to_string(),
            size_hint: size_hint.to_string(),
        }
    }

    /// Second half of the MIME type ("mp4" for "video/mp4"), for display.
    pub fn format_name(&self) -> &str {
        self.mime_type
            .split_once('/')
            .map(|(_, sub)| sub)
            .unwrap_or(&self.mime_type)
    }
}

/// One discovered video candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoDescriptor {
    pub id: String,
    pub kind: VideoKind,
    pub source_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform_id: Option<String>,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    pub qualities: Vec<QualityOption>,
}

impl VideoDescriptor {
    /// True if `url` is this descriptor's source or any of its quality URLs.
    pub fn references(&self, url: &str) -> bool {
        self.source_url == url
            || self
                .qualities
                .iter()
                .any(|q| q.url.as_deref() == Some(url))
    }

    /// Injects a `Default` option pointing at the source when nothing was found.
    pub(crate) fn ensure_quality(&mut self) {
        if self.qualities.is_empty() {
            let url = (!self.source_url.is_empty()).then(|| self.source_url.clone());
            self.qualities
                .push(QualityOption::new(url, "Default", "video/mp4", "Unknown"));
        }
    }

    /// Kind tag plus duration and dimensions, e.g. `HTML5 • 1:05 • 1280x720`.
    pub fn meta_line(&self) -> String {
        let mut meta = self.kind.tag().to_string();
        if let Some(secs) = self.duration_seconds {
            let formatted = format_duration(secs);
            if !formatted.is_empty() {
                meta.push_str(" • ");
                meta.push_str(&formatted);
            }
        }
        if let (Some(w), Some(h)) = (self.width, self.height) {
            if w > 0 && h > 0 {
                meta.push_str(&format!(" • {}x{}", w, h));
            }
        }
        meta
    }
}

/// `m:ss` below an hour, `h:mm:ss` above; empty for zero, negative or non-finite input.
pub fn format_duration(seconds: f64) -> String {
    if !seconds.is_finite() || seconds <= 0.0 {
        return String::new();
    }
    let total = seconds.floor() as u64;
    let hrs = total / 3600;
    let mins = (total % 3600) / 60;
    let secs = total % 60;
    if hrs > 0 {
        format!("{}:{:02}:{:02}", hrs, mins, secs)
    } else {
        format!("{}:{:02}", mins, secs)
    }
}
