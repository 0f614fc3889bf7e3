//! The download leg of the popup: resolve, start, follow progress.

use tokio::sync::mpsc;

use super::{Background, PageTab, Popup, PopupState, Selection, TransitionError};
use crate::download::{DownloadRequest, DownloadService, DownloadState};
use crate::error::VdpError;
use crate::model::{QualityOption, VideoDescriptor};
use crate::url_model::file_name_for;

const COMPLETED: &str = "Download completed successfully!";
const STARTED_ELSEWHERE: &str = "Download started in your browser. Check your downloads folder.";
const INVALID_URL: &str = "Invalid download URL";

impl<T: PageTab, B: Background, D: DownloadService> Popup<T, B, D> {
    /// Downloads the selected quality and follows it to a terminal state.
    ///
    /// Percentages are pushed to `progress` as they change; a full sink drops
    /// the update rather than stalling the download.
    ///
    /// Dropping the returned future stops tracking only: the transfer goes on,
    /// the event listener is released, the state stays `Downloading`, and
    /// `back()` returns to the list.
    pub async fn download(
        &mut self,
        progress: Option<&mpsc::Sender<u8>>,
    ) -> Result<&PopupState, TransitionError> {
        let selection = match &self.state {
            PopupState::QualitySelected { selection } => *selection,
            other => {
                return Err(TransitionError::NotAllowed {
                    action: "download",
                    state: other.name(),
                })
            }
        };
        let video = self.videos[selection.video].clone();
        let quality = video.qualities[selection.quality].clone();

        self.state = PopupState::Downloading {
            selection,
            percent: 0,
        };
        self.state = self.follow_download(selection, &video, &quality, progress).await;
        Ok(&self.state)
    }

    async fn download_url(
        &self,
        video: &VideoDescriptor,
        quality: &QualityOption,
    ) -> Result<String, String> {
        if let Some(platform) = video.kind.platform() {
            let id = video.platform_id.as_deref().unwrap_or_default();
            tracing::debug!(%platform, id, quality = %quality.label, "resolving embed");
            return self
                .background
                .resolve_url(platform.as_str(), id, &quality.label)
                .await
                .map_err(|e| e.to_string());
        }
        quality.url.clone().ok_or_else(|| INVALID_URL.to_string())
    }

    async fn follow_download(
        &mut self,
        selection: Selection,
        video: &VideoDescriptor,
        quality: &QualityOption,
        progress: Option<&mpsc::Sender<u8>>,
    ) -> PopupState {
        let url = match self.download_url(video, quality).await {
            Ok(url) => url,
            Err(reason) => {
                tracing::warn!(video = %video.id, "cannot download: {}", reason);
                return PopupState::DownloadFailed { reason };
            }
        };

        let filename = file_name_for(&video.title, &quality.mime_type);
        // Subscribe first so no notification of the new download is missed.
        let mut events = self.downloads.subscribe();
        let id = match self
            .downloads
            .start(DownloadRequest {
                url,
                filename,
                save_as: true,
            })
            .await
        {
            Ok(id) => id,
            Err(e) => {
                tracing::warn!(video = %video.id, "download rejected: {}", e);
                return PopupState::DownloadFailed {
                    reason: e.to_string(),
                };
            }
        };

        let stall = tokio::time::sleep(self.timing.progress_stall());
        tokio::pin!(stall);
        let mut percent = 0u8;
        let mut heard_back = false;

        loop {
            tokio::select! {
                delta = events.recv() => {
                    let Some(delta) = delta else {
                        return PopupState::DownloadFailed {
                            reason: VdpError::DownloadInterrupted("Download was interrupted".into()).to_string(),
                        };
                    };
                    if delta.id != id {
                        continue;
                    }
                    heard_back = true;
                    if let Some(pct) = delta.percent() {
                        if pct != percent {
                            percent = pct;
                            self.state = PopupState::Downloading { selection, percent };
                            if let Some(tx) = progress {
                                let _ = tx.try_send(pct);
                            }
                        }
                    }
                    match delta.state {
                        Some(DownloadState::Complete) => {
                            tracing::info!(download = %id, "download complete");
                            return PopupState::DownloadComplete {
                                message: COMPLETED.to_string(),
                            };
                        }
                        Some(DownloadState::Interrupted) => {
                            let reason = match delta.error.as_deref() {
                                Some(detail) if !detail.is_empty() => {
                                    format!("Download was interrupted: {}", detail)
                                }
                                _ => "Download was interrupted".to_string(),
                            };
                            return PopupState::DownloadFailed {
                                reason: VdpError::DownloadInterrupted(reason).to_string(),
                            };
                        }
                        Some(DownloadState::InProgress) | None => {}
                    }
                }
                _ = &mut stall, if !heard_back => {
                    tracing::info!(download = %id, "no progress reported, leaving download to the manager");
                    return PopupState::DownloadComplete {
                        message: STARTED_ELSEWHERE.to_string(),
                    };
                }
            }
        }
    }
}
