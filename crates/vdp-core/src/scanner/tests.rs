//! Whole-scan tests over small page snapshots.

use super::*;
use crate::model::{Platform, VideoKind};

fn page(markup: &str) -> PageDocument {
    PageDocument::new("https://example.com/videos/page.html", markup).unwrap()
}

#[test]
fn native_video_with_src_gets_default_quality() {
    let videos = scan(&page(
        r#"<html><head><title>Holiday</title></head><body><video src="a.mp4"></video></body></html>"#,
    ))
    .unwrap();
    assert_eq!(videos.len(), 1);
    let v = &videos[0];
    assert_eq!(v.kind, VideoKind::Native);
    assert_eq!(v.id, "video_0");
    assert_eq!(v.source_url, "https://example.com/videos/a.mp4");
    assert_eq!(v.title, "Holiday");
    assert_eq!(v.qualities.len(), 1);
    assert_eq!(v.qualities[0].label, "Default");
    assert_eq!(v.qualities[0].mime_type, "video/mp4");
    assert_eq!(v.qualities[0].url.as_deref(), Some("https://example.com/videos/a.mp4"));
}

#[test]
fn source_children_become_qualities_in_order() {
    let videos = scan(&page(
        r#"<video title="Trailer" poster="/p.jpg" width="1280" height="720" data-duration="95.5">
             <source src="/t_1080p.mp4" type="video/mp4">
             <source src="/t_hd.webm" type="video/webm" data-quality="HD">
             <source src="/t_low.mp4" title="Low">
             <source src="/t_plain.mp4">
           </video>"#,
    ))
    .unwrap();
    assert_eq!(videos.len(), 1);
    let v = &videos[0];
    assert_eq!(v.title, "Trailer");
    assert_eq!(v.source_url, "https://example.com/t_1080p.mp4");
    assert_eq!(v.thumbnail_url.as_deref(), Some("https://example.com/p.jpg"));
    assert_eq!(v.width, Some(1280));
    assert_eq!(v.height, Some(720));
    assert_eq!(v.duration_seconds, Some(95.5));
    let labels: Vec<&str> = v.qualities.iter().map(|q| q.label.as_str()).collect();
    assert_eq!(labels, vec!["1080p", "HD", "Low", "Default"]);
    assert_eq!(v.qualities[1].mime_type, "video/webm");
    assert_eq!(v.qualities[3].mime_type, "video/mp4");
}

#[test]
fn video_without_any_source_is_skipped() {
    let videos = scan(&page("<title>x</title><video autoplay></video>")).unwrap();
    assert!(videos.is_empty());
}

#[test]
fn malformed_element_is_dropped_alone() {
    let videos = scan(&page(
        r#"<video src="/bad.mp4" width="wide"></video>
           <video src="/good.mp4" width="640px"></video>"#,
    ))
    .unwrap();
    assert_eq!(videos.len(), 1);
    assert_eq!(videos[0].source_url, "https://example.com/good.mp4");
    assert_eq!(videos[0].width, Some(640));
    // Fallback title uses the element position among all <video> elements.
    assert_eq!(videos[0].title, "Video 2");
}

#[test]
fn mime_inferred_from_own_src() {
    let videos = scan(&page(r#"<video src="/clip.ogv"></video><video src="/live.m3u8"></video>"#)).unwrap();
    assert_eq!(videos[0].qualities[0].mime_type, "video/ogg");
    assert_eq!(videos[1].qualities[0].mime_type, "application/x-mpegURL");
}

#[test]
fn manifest_in_source_and_markup_reported_once() {
    let videos = scan(&page(
        r#"<video><source src="/live/master.m3u8" type="application/x-mpegURL"></video>
           <script>var fallback = "/live/master.m3u8";</script>"#,
    ))
    .unwrap();
    assert_eq!(videos.len(), 1);
    assert_eq!(videos[0].kind, VideoKind::Native);
}

#[test]
fn manifest_links_become_stream_descriptors() {
    let videos = scan(&page(
        r#"<title>Live</title>
           <script>
             player.load("https://cdn.example.com/a/master.m3u8?sig=1");
             player.load("https://cdn.example.com/a/master.m3u8?sig=1");
             dash.load('/dash/stream.mpd');
           </script>"#,
    ))
    .unwrap();
    assert_eq!(videos.len(), 2);
    assert_eq!(videos[0].kind, VideoKind::Hls);
    assert_eq!(videos[0].id, "hls_0");
    assert_eq!(videos[0].title, "Live");
    assert_eq!(videos[0].qualities[0].label, "Auto (HLS)");
    assert_eq!(videos[0].qualities[0].size_hint, "Varies");
    assert_eq!(videos[1].kind, VideoKind::Dash);
    assert_eq!(videos[1].id, "dash_1");
    assert_eq!(videos[1].source_url, "https://example.com/dash/stream.mpd");
    assert_eq!(videos[1].qualities[0].mime_type, "application/dash+xml");
}

#[test]
fn manifest_fallback_titles() {
    let videos = scan(&page(r#"<a href="/x.m3u8">x</a><a href="/y.mpd">y</a>"#)).unwrap();
    assert_eq!(videos[0].title, "HLS Stream");
    assert_eq!(videos[1].title, "DASH Stream");
}

#[test]
fn embeds_are_detected_per_platform() {
    let videos = scan(&page(
        r#"<title>Embeds</title>
           <iframe src="https://www.facebook.com/plugins/video.php?href=https%3A%2F%2Fwww.facebook.com%2Fp%2Fvideos%2F9%2F"></iframe>
           <iframe title="Talk" src="https://player.vimeo.com/video/76979871"></iframe>
           <iframe src="https://www.youtube-nocookie.com/embed/abc_123-x?autoplay=1"></iframe>
           <iframe src="https://www.youtube.com/embed/"></iframe>"#,
    ))
    .unwrap();
    let kinds: Vec<VideoKind> = videos.iter().map(|v| v.kind).collect();
    assert_eq!(kinds, vec![VideoKind::Youtube, VideoKind::Vimeo, VideoKind::Facebook]);

    let yt = &videos[0];
    assert_eq!(yt.id, "youtube_0");
    assert_eq!(yt.platform_id.as_deref(), Some("abc_123-x"));
    assert_eq!(yt.title, "Embeds");
    assert_eq!(
        yt.thumbnail_url.as_deref(),
        Some("https://img.youtube.com/vi/abc_123-x/mqdefault.jpg")
    );
    assert_eq!(yt.qualities.len(), 3);
    assert_eq!(yt.kind.platform(), Some(Platform::Youtube));

    let vimeo = &videos[1];
    assert_eq!(vimeo.title, "Talk");
    assert_eq!(vimeo.platform_id.as_deref(), Some("76979871"));
    assert!(vimeo.thumbnail_url.is_none());

    let fb = &videos[2];
    assert_eq!(fb.platform_id.as_deref(), Some("https://www.facebook.com/p/videos/9/"));
    assert_eq!(fb.qualities.len(), 2);
}

#[test]
fn every_descriptor_has_a_quality_and_unique_id() {
    let videos = scan(&page(
        r#"<video src="/a.mp4"></video>
           <video><source src="/b.mp4"></video>
           <a href="/c.m3u8">c</a>
           <iframe src="https://www.youtube.com/embed/zzz"></iframe>"#,
    ))
    .unwrap();
    assert_eq!(videos.len(), 4);
    assert!(videos.iter().all(|v| !v.qualities.is_empty()));
    let mut ids: Vec<&str> = videos.iter().map(|v| v.id.as_str()).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 4);
}

#[test]
fn rescanning_unchanged_page_is_stable() {
    let p = page(
        r#"<video src="/a.mp4"></video><a href="/c.m3u8">c</a>
           <iframe src="https://player.vimeo.com/video/42"></iframe>"#,
    );
    let first = scan(&p).unwrap();
    let second = scan(&p).unwrap();
    assert_eq!(first.len(), second.len());
    for (a, b) in first.iter().zip(&second) {
        assert_eq!(a.source_url, b.source_url);
        assert_eq!(a.qualities, b.qualities);
    }
}

#[test]
fn page_without_videos_is_empty() {
    let videos = scan(&page("<html><head><title>Blog</title></head><body><p>text</p><img src=a.png></body></html>")).unwrap();
    assert!(videos.is_empty());
}

#[test]
fn blank_document_is_unavailable() {
    let err = scan(&page("   ")).unwrap_err();
    assert!(matches!(err, VdpError::ScanUnavailable(_)));
}

#[test]
fn duplicate_native_sources_are_listed_once() {
    let videos = scan(&page(r#"<video src="/a.mp4"></video><video src="/a.mp4"></video>"#)).unwrap();
    assert_eq!(videos.len(), 1);
}

#[test]
fn manifest_followed_by_non_breaking_space_is_scanned() {
    let videos = scan(&page("<p>Stream: https://cdn.example.com/live.m3u8\u{a0}(HD)</p>")).unwrap();
    assert_eq!(videos.len(), 1);
    assert_eq!(videos[0].kind, VideoKind::Hls);
    assert_eq!(videos[0].source_url, "https://cdn.example.com/live.m3u8");
}
