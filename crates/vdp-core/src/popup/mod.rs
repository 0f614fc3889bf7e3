//! Popup controller: scan → select → resolve → download.
//!
//! `Popup` owns the current descriptor list and an explicit [`PopupState`];
//! every user action is a method that checks the state and moves it forward.
//! Methods take `&mut self`, so a rescan cannot overlap a scan still in
//! flight: dropping a pending scan future cancels it.

mod download;
mod state;

pub use state::{PopupState, Selection, TransitionError};

use std::future::Future;

use crate::bridge::BridgeError;
use crate::config::TimingConfig;
use crate::download::DownloadService;
use crate::error::VdpError;
use crate::model::{QualityOption, VideoDescriptor, VideoKind};

const SCAN_TIMED_OUT: &str = "Scan timed out. Try refreshing the page.";
const INJECT_FAILED: &str = "Could not analyze page. Try refreshing the page first.";

/// The tab whose page is being scanned, seen from the popup.
pub trait PageTab: Send + Sync {
    /// `getVideos`; `Err(BridgeError::Unreachable)` when no page context is loaded.
    fn get_videos(&self) -> impl Future<Output = Result<Vec<VideoDescriptor>, BridgeError>> + Send;

    /// `getVideoThumbnail`.
    fn get_video_thumbnail(&self, src: &str) -> impl Future<Output = Result<String, BridgeError>> + Send;

    /// Loads the page context into the tab if it is not running yet.
    fn inject(&self) -> impl Future<Output = anyhow::Result<()>> + Send;
}

/// The background context, seen from the popup.
pub trait Background: Send + Sync {
    /// `resolveUrl`.
    fn resolve_url(
        &self,
        platform: &str,
        id: &str,
        quality_label: &str,
    ) -> impl Future<Output = Result<String, BridgeError>> + Send;
}

pub struct Popup<T, B, D> {
    tab: T,
    background: B,
    downloads: D,
    timing: TimingConfig,
    state: PopupState,
    videos: Vec<VideoDescriptor>,
}

impl<T: PageTab, B: Background, D: DownloadService> Popup<T, B, D> {
    pub fn new(tab: T, background: B, downloads: D, timing: TimingConfig) -> Self {
        Self {
            tab,
            background,
            downloads,
            timing,
            state: PopupState::Scanning,
            videos: Vec::new(),
        }
    }

    pub fn state(&self) -> &PopupState {
        &self.state
    }

    /// Descriptors of the latest successful scan.
    pub fn videos(&self) -> &[VideoDescriptor] {
        &self.videos
    }

    pub fn downloads(&self) -> &D {
        &self.downloads
    }

    /// The picked video and quality, while one is selected or downloading.
    pub fn selected(&self) -> Option<(&VideoDescriptor, &QualityOption)> {
        let selection = self.state.selection()?;
        let video = self.videos.get(selection.video)?;
        let quality = video.qualities.get(selection.quality)?;
        Some((video, quality))
    }

    /// Opening the popup scans right away.
    pub async fn open(&mut self) -> &PopupState {
        self.rescan().await
    }

    /// Discards the current list and scans the page again.
    pub async fn rescan(&mut self) -> &PopupState {
        self.state = PopupState::Scanning;
        self.videos.clear();

        let outcome = tokio::time::timeout(self.timing.scan_timeout(), self.request_videos()).await;
        self.state = match outcome {
            Err(_) => {
                tracing::warn!("scan timed out after {:?}", self.timing.scan_timeout());
                PopupState::NoVideosFound {
                    message: SCAN_TIMED_OUT.to_string(),
                }
            }
            Ok(Err(e)) => PopupState::NoVideosFound {
                message: e.to_string(),
            },
            Ok(Ok(videos)) if videos.is_empty() => PopupState::NoVideosFound {
                message: VdpError::NoVideosFound.to_string(),
            },
            Ok(Ok(videos)) => {
                tracing::info!("listing {} videos", videos.len());
                self.videos = videos;
                PopupState::VideosListed
            }
        };
        &self.state
    }

    /// Asks the page context for descriptors, injecting it once if needed.
    async fn request_videos(&self) -> Result<Vec<VideoDescriptor>, VdpError> {
        match self.tab.get_videos().await {
            Ok(videos) => Ok(videos),
            Err(BridgeError::Unreachable) => {
                tracing::info!("page context not loaded, injecting it now");
                if let Err(e) = self.tab.inject().await {
                    tracing::error!("failed to inject page context: {:#}", e);
                    return Err(VdpError::ScanUnavailable(INJECT_FAILED.to_string()));
                }
                tokio::time::sleep(self.timing.inject_settle()).await;
                self.tab
                    .get_videos()
                    .await
                    .map_err(|e| VdpError::ScanUnavailable(format!("Could not analyze page: {}", e)))
            }
            Err(e) => Err(VdpError::ScanUnavailable(format!("Could not analyze page: {}", e))),
        }
    }

    /// Picks a listed video; its first quality is preselected.
    pub fn select_video(&mut self, index: usize) -> Result<&PopupState, TransitionError> {
        self.require("select a video", |s| matches!(s, PopupState::VideosListed))?;
        let video = self
            .videos
            .get(index)
            .ok_or(TransitionError::NoSuchVideo(index))?;
        if video.qualities.is_empty() {
            return Err(TransitionError::NoSuchQuality(0));
        }
        self.state = PopupState::QualitySelected {
            selection: Selection {
                video: index,
                quality: 0,
            },
        };
        Ok(&self.state)
    }

    /// Changes the quality of the selected video.
    pub fn select_quality(&mut self, index: usize) -> Result<&PopupState, TransitionError> {
        let selection = match &self.state {
            PopupState::QualitySelected { selection } => *selection,
            other => {
                return Err(TransitionError::NotAllowed {
                    action: "select a quality",
                    state: other.name(),
                })
            }
        };
        let count = self.videos[selection.video].qualities.len();
        if index >= count {
            return Err(TransitionError::NoSuchQuality(index));
        }
        self.state = PopupState::QualitySelected {
            selection: Selection {
                quality: index,
                ..selection
            },
        };
        Ok(&self.state)
    }

    /// Back to the video list from the quality selector or download status.
    pub fn back(&mut self) -> Result<&PopupState, TransitionError> {
        self.require("go back", |s| {
            matches!(
                s,
                PopupState::QualitySelected { .. }
                    | PopupState::Downloading { .. }
                    | PopupState::DownloadComplete { .. }
                    | PopupState::DownloadFailed { .. }
            )
        })?;
        self.state = PopupState::VideosListed;
        Ok(&self.state)
    }

    /// Thumbnail to preview for a listed video: the known one, or a frame
    /// captured from the page for native elements.
    pub async fn preview_thumbnail(&self, index: usize) -> Option<String> {
        let video = self.videos.get(index)?;
        if let Some(url) = &video.thumbnail_url {
            return Some(url.clone());
        }
        if video.kind != VideoKind::Native || video.source_url.is_empty() {
            return None;
        }
        match self.tab.get_video_thumbnail(&video.source_url).await {
            Ok(data_url) => Some(data_url),
            Err(e) => {
                tracing::debug!(url = %video.source_url, "no thumbnail: {}", e);
                None
            }
        }
    }

    fn require(
        &self,
        action: &'static str,
        allowed: impl Fn(&PopupState) -> bool,
    ) -> Result<(), TransitionError> {
        if allowed(&self.state) {
            Ok(())
        } else {
            Err(TransitionError::NotAllowed {
                action,
                state: self.state.name(),
            })
        }
    }
}
