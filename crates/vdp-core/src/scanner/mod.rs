//! Page scanner: builds the list of video candidates for a loaded page.
//!
//! Three passes share one result list: `<video>` elements, manifest links in
//! the raw markup, then embedded players. A URL already present anywhere in
//! the list (as a source or a quality URL) is never added twice. Defects in a
//! single element are logged and skip that element only.

mod context;
mod embed;
mod manifest;
mod native;
mod thumbnail;

pub use context::{LocalTab, PageContext};
pub use manifest::{find_manifest_urls, ManifestFormat, ManifestMatch};
pub use thumbnail::{capture_thumbnail, FrameGrabber, VideoElement};

use scraper::Html;

use crate::error::VdpError;
use crate::model::{QualityOption, VideoDescriptor, VideoKind};
use crate::page::PageDocument;

/// Accumulates descriptors across passes, rejecting already-seen URLs.
#[derive(Debug, Default)]
pub(crate) struct ScanResults {
    videos: Vec<VideoDescriptor>,
}

impl ScanResults {
    /// True if any collected descriptor references `url`.
    pub(crate) fn contains_url(&self, url: &str) -> bool {
        !url.is_empty() && self.videos.iter().any(|v| v.references(url))
    }

    /// `<prefix>_<position>`; unique because the list only grows.
    pub(crate) fn next_id(&self, prefix: &str) -> String {
        format!("{}_{}", prefix, self.videos.len())
    }

    /// Appends `video` unless its source or one of its quality URLs is already known.
    pub(crate) fn push(&mut self, video: VideoDescriptor) -> bool {
        let duplicate = self.contains_url(&video.source_url)
            || video
                .qualities
                .iter()
                .filter_map(|q| q.url.as_deref())
                .any(|u| self.contains_url(u));
        if duplicate {
            tracing::debug!(url = %video.source_url, "skipping already collected video");
            return false;
        }
        self.videos.push(video);
        true
    }

    pub(crate) fn len(&self) -> usize {
        self.videos.len()
    }

    /// Guarantees at least one quality per descriptor.
    pub(crate) fn finish(self) -> Vec<VideoDescriptor> {
        let mut videos = self.videos;
        for video in &mut videos {
            video.ensure_quality();
        }
        videos
    }
}

/// Scans `page` and returns every video candidate, in discovery order.
///
/// Fails only when there is no document to inspect.
pub fn scan(page: &PageDocument) -> Result<Vec<VideoDescriptor>, VdpError> {
    if page.markup.trim().is_empty() {
        return Err(VdpError::ScanUnavailable("document unavailable".to_string()));
    }

    let document = Html::parse_document(&page.markup);
    let mut results = ScanResults::default();

    native::scan_native(&document, page, &mut results);
    let native_count = results.len();

    for found in find_manifest_urls(&page.markup, &page.location) {
        let video = manifest_descriptor(&results, page, found);
        if results.push(video) {
            tracing::debug!("found manifest stream");
        }
    }
    let manifest_count = results.len() - native_count;

    embed::scan_embeds(&document, page, &mut results);
    let embed_count = results.len() - native_count - manifest_count;

    tracing::info!(
        native = native_count,
        manifests = manifest_count,
        embeds = embed_count,
        "scanned {}",
        page.location.href
    );
    Ok(results.finish())
}

fn manifest_descriptor(results: &ScanResults, page: &PageDocument, found: ManifestMatch) -> VideoDescriptor {
    let (kind, prefix, fallback_title, label, mime) = match found.format {
        ManifestFormat::Hls => (
            VideoKind::Hls,
            "hls",
            "HLS Stream",
            "Auto (HLS)",
            "application/x-mpegURL",
        ),
        ManifestFormat::Dash => (
            VideoKind::Dash,
            "dash",
            "DASH Stream",
            "Auto (DASH)",
            "application/dash+xml",
        ),
    };
    VideoDescriptor {
        id: results.next_id(prefix),
        kind,
        source_url: found.url.clone(),
        platform_id: None,
        title: page.title_or(fallback_title).to_string(),
        thumbnail_url: None,
        duration_seconds: None,
        width: None,
        height: None,
        qualities: vec![QualityOption::new(Some(found.url), label, mime, "Varies")],
    }
}

#[cfg(test)]
mod tests;
