//! `vdp download` – scan a page, pick a video and quality, download it.

use anyhow::{bail, Result};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;
use vdp_core::config::VdpConfig;
use vdp_core::download::CurlDownloads;
use vdp_core::popup::PopupState;

use super::page::{popup, PageSource};
use super::scan::print_videos;

#[derive(Debug, Clone)]
pub struct DownloadArgs {
    pub page: PageSource,
    /// 1-based, as printed by `vdp scan`.
    pub video: Option<usize>,
    /// 1-based.
    pub quality: Option<usize>,
    pub dir: Option<PathBuf>,
    pub yes: bool,
}

pub async fn run_download(cfg: &VdpConfig, args: &DownloadArgs) -> Result<()> {
    let video = to_index("--video", args.video)?;
    let quality = to_index("--quality", args.quality)?;
    let dir = match args.dir.clone().or_else(|| cfg.download_dir.clone()) {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    let page = args.page.load(&cfg.user_agent).await?;
    let mut downloads = CurlDownloads::new(&dir, cfg.user_agent.clone());
    if !args.yes {
        downloads = downloads.with_confirm(confirm_on_stdin);
    }
    let mut popup = popup(cfg, page, downloads);

    if let PopupState::NoVideosFound { message } = popup.open().await {
        bail!("{}", message);
    }
    if args.video.is_none() && popup.videos().len() > 1 {
        print_videos(popup.videos());
        println!("Downloading video 1; pass --video N to pick another.");
    }
    popup.select_video(video)?;
    popup.select_quality(quality)?;
    if let Some((video, quality)) = popup.selected() {
        tracing::info!(title = %video.title, quality = %quality.label, "downloading");
    }

    let (tx, rx) = mpsc::channel(32);
    let printer = tokio::spawn(print_progress(rx));
    let state = popup.download(Some(&tx)).await?.clone();
    drop(tx);
    let _ = printer.await;

    match state {
        PopupState::DownloadComplete { message } => {
            println!("{}", message);
            // The popup may stop watching before the transfer ends; finish it before exiting.
            popup.downloads().wait_idle().await;
            Ok(())
        }
        PopupState::DownloadFailed { reason } => bail!("{}", reason),
        other => bail!("download ended in unexpected state: {}", other.name()),
    }
}

fn to_index(flag: &str, value: Option<usize>) -> Result<usize> {
    match value {
        None => Ok(0),
        Some(0) => bail!("{} starts at 1", flag),
        Some(n) => Ok(n - 1),
    }
}

async fn print_progress(mut rx: mpsc::Receiver<u8>) {
    let mut printed = false;
    while let Some(pct) = rx.recv().await {
        print!("\rDownloading... {:>3}%", pct);
        let _ = io::stdout().flush();
        printed = true;
    }
    if printed {
        println!();
    }
}

/// Asks on the terminal before saving; an empty answer means yes.
fn confirm_on_stdin(path: &Path) -> bool {
    print!("Save to {}? [Y/n] ", path.display());
    let _ = io::stdout().flush();
    let mut answer = String::new();
    if io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_ascii_lowercase().as_str(), "" | "y" | "yes")
}
