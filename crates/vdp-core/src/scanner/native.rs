//! `<video>` element pass.

use scraper::{ElementRef, Html, Selector};
use thiserror::Error;

use super::ScanResults;
use crate::model::{QualityOption, VideoDescriptor, VideoKind};
use crate::page::PageDocument;
use crate::url_model::{mime_from_src, resolution_label};

/// Why a single element was dropped from the scan.
#[derive(Debug, Error)]
enum ElementDefect {
    #[error("unresolvable URL {0:?}")]
    BadUrl(String),
    #[error("invalid {attr} attribute {value:?}")]
    BadNumber { attr: &'static str, value: String },
}

pub(super) fn scan_native(document: &Html, page: &PageDocument, results: &mut ScanResults) {
    let video_sel = Selector::parse("video").expect("video selector");
    let source_sel = Selector::parse("source").expect("source selector");

    for (index, video) in document.select(&video_sel).enumerate() {
        match native_descriptor(index, video, &source_sel, page, results) {
            Ok(Some(descriptor)) => {
                tracing::debug!(url = %descriptor.source_url, "found video element");
                results.push(descriptor);
            }
            Ok(None) => tracing::debug!(index, "skipping video element without source"),
            Err(defect) => tracing::warn!(index, "skipping video element: {}", defect),
        }
    }
}

fn native_descriptor(
    index: usize,
    video: ElementRef<'_>,
    source_sel: &Selector,
    page: &PageDocument,
    results: &ScanResults,
) -> Result<Option<VideoDescriptor>, ElementDefect> {
    let own_src = non_empty_attr(video, "src");
    let sources: Vec<ElementRef<'_>> = video.select(source_sel).collect();
    if own_src.is_none() && sources.is_empty() {
        return Ok(None);
    }

    let own_url = own_src.map(|raw| resolve(page, raw)).transpose()?;

    let mut qualities = Vec::with_capacity(sources.len().max(1));
    for source in &sources {
        let Some(raw) = non_empty_attr(*source, "src") else {
            continue;
        };
        let url = resolve(page, raw)?;
        let label = non_empty_attr(*source, "data-quality")
            .or_else(|| non_empty_attr(*source, "title"))
            .map(str::to_string)
            .or_else(|| resolution_label(&url))
            .unwrap_or_else(|| "Default".to_string());
        let mime = non_empty_attr(*source, "type").unwrap_or("video/mp4");
        qualities.push(QualityOption::new(Some(url), &label, mime, "Unknown"));
    }
    if sources.is_empty() {
        if let Some(url) = &own_url {
            let label = resolution_label(url).unwrap_or_else(|| "Default".to_string());
            qualities.push(QualityOption::new(
                Some(url.clone()),
                &label,
                mime_from_src(url),
                "Unknown",
            ));
        }
    }

    let source_url = own_url
        .or_else(|| qualities.first().and_then(|q| q.url.clone()))
        .unwrap_or_default();

    let fallback_title = format!("Video {}", index + 1);
    let title = non_empty_attr(video, "title")
        .unwrap_or_else(|| page.title_or(&fallback_title))
        .to_string();

    let thumbnail_url = non_empty_attr(video, "poster").and_then(|raw| page.location.resolve(raw));

    Ok(Some(VideoDescriptor {
        id: results.next_id("video"),
        kind: VideoKind::Native,
        source_url,
        platform_id: None,
        title,
        thumbnail_url,
        duration_seconds: parse_duration(video)?,
        width: parse_dimension(video, "width")?,
        height: parse_dimension(video, "height")?,
        qualities,
    }))
}

fn non_empty_attr<'a>(element: ElementRef<'a>, name: &str) -> Option<&'a str> {
    element
        .value()
        .attr(name)
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

fn resolve(page: &PageDocument, raw: &str) -> Result<String, ElementDefect> {
    page.location
        .resolve(raw)
        .ok_or_else(|| ElementDefect::BadUrl(raw.to_string()))
}

/// HTML non-negative integer rules: leading digits count, trailing junk (`640px`) is ignored.
fn parse_dimension(element: ElementRef<'_>, attr: &'static str) -> Result<Option<u32>, ElementDefect> {
    let Some(value) = non_empty_attr(element, attr) else {
        return Ok(None);
    };
    dimension_value(value).map(Some).ok_or_else(|| ElementDefect::BadNumber {
        attr,
        value: value.to_string(),
    })
}

/// Leading digits of a `width`/`height` value (`640px` → 640); `None` without any.
pub(super) fn dimension_value(value: &str) -> Option<u32> {
    let value = value.trim();
    let end = value
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(value.len());
    value[..end].parse().ok()
}

fn parse_duration(element: ElementRef<'_>) -> Result<Option<f64>, ElementDefect> {
    let Some(value) = non_empty_attr(element, "data-duration") else {
        return Ok(None);
    };
    match value.parse::<f64>() {
        Ok(secs) if secs.is_finite() && secs >= 0.0 => Ok(Some(secs)),
        _ => Err(ElementDefect::BadNumber {
            attr: "data-duration",
            value: value.to_string(),
        }),
    }
}
