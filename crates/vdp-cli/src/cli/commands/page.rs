//! Shared setup: load the page and wire the popup to in-process contexts.

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use vdp_core::config::VdpConfig;
use vdp_core::dispatcher::{spawn_background, BackgroundEndpoint, RedirectDispatcher};
use vdp_core::download::CurlDownloads;
use vdp_core::page::{fetch_page, PageDocument};
use vdp_core::popup::Popup;
use vdp_core::scanner::LocalTab;

pub type CliPopup = Popup<LocalTab, BackgroundEndpoint, CurlDownloads>;

/// Where the page markup comes from.
#[derive(Debug, Clone)]
pub struct PageSource {
    pub url: String,
    pub file: Option<PathBuf>,
}

impl PageSource {
    pub async fn load(&self, user_agent: &str) -> Result<PageDocument> {
        let markup = match &self.file {
            Some(path) => std::fs::read_to_string(path)
                .with_context(|| format!("read {}", path.display()))?,
            None => {
                let url = self.url.clone();
                let user_agent = user_agent.to_string();
                tokio::task::spawn_blocking(move || fetch_page(&url, &user_agent))
                    .await
                    .context("page fetch task failed")?
                    .with_context(|| format!("fetch {}", self.url))?
            }
        };
        tracing::debug!(url = %self.url, bytes = markup.len(), "page loaded");
        PageDocument::new(&self.url, markup)
    }
}

pub fn background(cfg: &VdpConfig) -> BackgroundEndpoint {
    spawn_background(Arc::new(RedirectDispatcher::new(cfg.helpers.clone())))
}

/// A popup over `page` that saves into `downloads`.
pub fn popup(cfg: &VdpConfig, page: PageDocument, downloads: CurlDownloads) -> CliPopup {
    Popup::new(LocalTab::new(page), background(cfg), downloads, cfg.timing.clone())
}
