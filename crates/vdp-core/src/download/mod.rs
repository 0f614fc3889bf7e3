//! Download service: start a transfer by URL and file name, then follow it
//! through change notifications.
//!
//! Notifications mirror a browser download manager: each carries the download
//! id, an optional new state, and optional byte counters.

mod events;
mod transfer;

pub use events::{DownloadEvents, Subscription};
pub use transfer::CurlDownloads;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;

use crate::error::VdpError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DownloadId(pub u64);

impl fmt::Display for DownloadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DownloadState {
    InProgress,
    Complete,
    Interrupted,
}

/// One change notification for a download.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadDelta {
    pub id: DownloadId,
    #[serde(default)]
    pub state: Option<DownloadState>,
    #[serde(default)]
    pub bytes_received: Option<u64>,
    #[serde(default)]
    pub total_bytes: Option<u64>,
    /// Reason attached to an `Interrupted` state.
    #[serde(default)]
    pub error: Option<String>,
}

impl DownloadDelta {
    pub fn progress(id: DownloadId, bytes_received: u64, total_bytes: u64) -> Self {
        Self {
            id,
            state: None,
            bytes_received: Some(bytes_received),
            total_bytes: Some(total_bytes),
            error: None,
        }
    }

    pub fn state(id: DownloadId, state: DownloadState) -> Self {
        Self {
            id,
            state: Some(state),
            bytes_received: None,
            total_bytes: None,
            error: None,
        }
    }

    pub fn interrupted(id: DownloadId, error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::state(id, DownloadState::Interrupted)
        }
    }

    /// Rounded 0–100 percentage, when both counters are present and the total is known.
    pub fn percent(&self) -> Option<u8> {
        match (self.bytes_received, self.total_bytes) {
            (Some(received), Some(total)) if total > 0 => {
                let pct = (received as f64 / total as f64 * 100.0).round();
                Some(pct.clamp(0.0, 100.0) as u8)
            }
            _ => None,
        }
    }
}

/// What to download and how to name it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    pub url: String,
    /// Suggested file name, relative to the download directory.
    pub filename: String,
    /// Ask the user to confirm the destination before starting.
    pub save_as: bool,
}

/// A download manager the popup can hand URLs to.
pub trait DownloadService: Send + Sync {
    /// Starts a download; `Err` means the request was rejected before any transfer.
    fn start(&self, request: DownloadRequest) -> impl Future<Output = Result<DownloadId, VdpError>> + Send;

    /// Registers a listener for change notifications of every download.
    fn subscribe(&self) -> Subscription;
}
