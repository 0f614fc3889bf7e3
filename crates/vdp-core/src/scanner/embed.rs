//! Embedded-player pass: YouTube, Vimeo and Facebook iframes.
//!
//! Embeds carry the extracted platform id; the download URL is produced later
//! by the dispatcher. Quality options are placeholders without URLs and
//! without size estimates.

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::OnceLock;
use url::Url;

use super::ScanResults;
use crate::model::{Platform, QualityOption, VideoDescriptor, VideoKind};
use crate::page::PageDocument;

const YOUTUBE_SELECTOR: &str =
    r#"iframe[src*="youtube.com/embed"], iframe[src*="youtube-nocookie.com/embed"]"#;
const VIMEO_SELECTOR: &str = r#"iframe[src*="player.vimeo.com/video"]"#;
const FACEBOOK_SELECTOR: &str = r#"iframe[src*="facebook.com/plugins/video"]"#;

fn youtube_id_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"/embed/([A-Za-z0-9_-]+)").expect("youtube id regex"))
}

fn vimeo_id_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"/video/([0-9]+)").expect("vimeo id regex"))
}

pub(super) fn scan_embeds(document: &Html, page: &PageDocument, results: &mut ScanResults) {
    for platform in [Platform::Youtube, Platform::Vimeo, Platform::Facebook] {
        let css = match platform {
            Platform::Youtube => YOUTUBE_SELECTOR,
            Platform::Vimeo => VIMEO_SELECTOR,
            Platform::Facebook => FACEBOOK_SELECTOR,
        };
        let selector = Selector::parse(css).expect("embed selector");
        for iframe in document.select(&selector) {
            match embed_descriptor(platform, iframe, page, results) {
                Some(descriptor) => {
                    tracing::debug!(%platform, id = ?descriptor.platform_id, "found embed");
                    results.push(descriptor);
                }
                None => tracing::debug!(%platform, "skipping embed without usable id"),
            }
        }
    }
}

fn embed_descriptor(
    platform: Platform,
    iframe: ElementRef<'_>,
    page: &PageDocument,
    results: &ScanResults,
) -> Option<VideoDescriptor> {
    let raw_src = iframe.value().attr("src")?.trim();
    let src = page.location.resolve(raw_src)?;
    let platform_id = platform_id(platform, &src)?;

    let fallback_title = match platform {
        Platform::Youtube => "YouTube Video",
        Platform::Vimeo => "Vimeo Video",
        Platform::Facebook => "Facebook Video",
    };
    let title = iframe
        .value()
        .attr("title")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| page.title_or(fallback_title))
        .to_string();

    let thumbnail_url = match platform {
        Platform::Youtube => Some(format!("https://img.youtube.com/vi/{}/mqdefault.jpg", platform_id)),
        Platform::Vimeo | Platform::Facebook => None,
    };

    Some(VideoDescriptor {
        id: results.next_id(platform.as_str()),
        kind: VideoKind::embed(platform),
        source_url: src,
        platform_id: Some(platform_id),
        title,
        thumbnail_url,
        duration_seconds: None,
        width: None,
        height: None,
        qualities: placeholder_qualities(platform),
    })
}

/// Id the dispatcher needs: the YouTube video id, the numeric Vimeo id, or the
/// video page URL a Facebook plugin points at (`href` query parameter).
fn platform_id(platform: Platform, src: &str) -> Option<String> {
    match platform {
        Platform::Youtube => youtube_id_re().captures(src).map(|c| c[1].to_string()),
        Platform::Vimeo => vimeo_id_re().captures(src).map(|c| c[1].to_string()),
        Platform::Facebook => {
            let href = Url::parse(src).ok().and_then(|u| {
                u.query_pairs()
                    .find(|(k, _)| k == "href")
                    .map(|(_, v)| v.into_owned())
            });
            Some(href.filter(|h| !h.is_empty()).unwrap_or_else(|| src.to_string()))
        }
    }
}

fn placeholder_qualities(platform: Platform) -> Vec<QualityOption> {
    match platform {
        Platform::Youtube => ["720p", "480p", "360p"]
            .iter()
            .map(|label| QualityOption::new(None, label, "video/mp4", "Unknown"))
            .collect(),
        Platform::Vimeo | Platform::Facebook => ["HD", "SD"]
            .iter()
            .map(|label| QualityOption::new(None, label, "video/mp4", "Varies"))
            .collect(),
    }
}
