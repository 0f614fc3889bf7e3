//! `vdp scan` – list the videos found on a page.

use anyhow::Result;
use vdp_core::config::VdpConfig;
use vdp_core::download::CurlDownloads;
use vdp_core::model::VideoDescriptor;
use vdp_core::popup::PopupState;

use super::page::{popup, PageSource};

pub async fn run_scan(cfg: &VdpConfig, source: &PageSource, json: bool) -> Result<()> {
    let page = source.load(&cfg.user_agent).await?;
    let downloads = CurlDownloads::new(std::env::current_dir()?, cfg.user_agent.clone());
    let mut popup = popup(cfg, page, downloads);

    let state = popup.open().await.clone();
    match state {
        PopupState::NoVideosFound { message } if !json => println!("{}", message),
        _ if json => println!("{}", serde_json::to_string_pretty(popup.videos())?),
        _ => print_videos(popup.videos()),
    }
    Ok(())
}

pub(super) fn print_videos(videos: &[VideoDescriptor]) {
    for (i, video) in videos.iter().enumerate() {
        println!("{:>3}. {}  [{}]", i + 1, video.title, video.meta_line());
        for (j, quality) in video.qualities.iter().enumerate() {
            println!(
                "       {}) {:<12} {:<10} {}",
                j + 1,
                quality.label,
                quality.format_name(),
                quality.size_hint
            );
        }
    }
}
