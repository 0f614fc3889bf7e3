//! Frame capture for `<video>` elements that are already playing in the page.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use scraper::{Html, Selector};

use super::native::dimension_value;
use crate::error::VdpError;
use crate::page::PageDocument;

/// JPEG quality requested from the grabber.
const THUMBNAIL_QUALITY: f32 = 0.7;

/// A `<video>` element matched for capture.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoElement {
    pub src: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

/// Draws the current frame of a decoding element (the page's canvas).
pub trait FrameGrabber: Send + Sync {
    /// Returns the frame encoded as JPEG at `quality` (0.0..=1.0).
    /// Errors carry a user-facing reason, e.g. a cross-origin tainted canvas.
    fn capture_jpeg(&self, element: &VideoElement, quality: f32) -> Result<Vec<u8>, String>;
}

/// Captures the element whose source is `source_url` as a `data:` URL.
pub fn capture_thumbnail(
    page: &PageDocument,
    grabber: Option<&dyn FrameGrabber>,
    source_url: &str,
) -> Result<String, VdpError> {
    let element = find_element(page, source_url)
        .ok_or_else(|| VdpError::ThumbnailUnavailable("Video element not found".to_string()))?;
    let grabber = grabber.ok_or_else(|| {
        VdpError::ThumbnailUnavailable("Frame capture is not available in this page".to_string())
    })?;
    let jpeg = grabber
        .capture_jpeg(&element, THUMBNAIL_QUALITY)
        .map_err(VdpError::ThumbnailUnavailable)?;
    Ok(format!("data:image/jpeg;base64,{}", STANDARD.encode(jpeg)))
}

/// First `<video>` whose own `src`, or first `<source>`, resolves to `source_url`.
fn find_element(page: &PageDocument, source_url: &str) -> Option<VideoElement> {
    let document = Html::parse_document(&page.markup);
    let video_sel = Selector::parse("video").ok()?;
    let source_sel = Selector::parse("source").ok()?;

    document.select(&video_sel).find_map(|video| {
        let resolved = |raw: Option<&str>| raw.and_then(|r| page.location.resolve(r));
        let own = resolved(video.value().attr("src"));
        let first_source = resolved(
            video
                .select(&source_sel)
                .next()
                .and_then(|s| s.value().attr("src")),
        );
        let matched = [own, first_source]
            .into_iter()
            .flatten()
            .find(|url| url == source_url)?;
        let dimension = |attr: &str| {
            video
                .value()
                .attr(attr)
                .and_then(dimension_value)
        };
        Some(VideoElement {
            src: matched,
            width: dimension("width"),
            height: dimension("height"),
        })
    })
}
