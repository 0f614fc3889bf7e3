//! Popup states and the selection they carry.

use thiserror::Error;

/// Which video, and which of its qualities, the user picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub video: usize,
    pub quality: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PopupState {
    Scanning,
    NoVideosFound { message: String },
    VideosListed,
    QualitySelected { selection: Selection },
    Downloading { selection: Selection, percent: u8 },
    DownloadComplete { message: String },
    DownloadFailed { reason: String },
}

impl PopupState {
    pub fn name(&self) -> &'static str {
        match self {
            PopupState::Scanning => "scanning",
            PopupState::NoVideosFound { .. } => "no videos found",
            PopupState::VideosListed => "videos listed",
            PopupState::QualitySelected { .. } => "quality selected",
            PopupState::Downloading { .. } => "downloading",
            PopupState::DownloadComplete { .. } => "download complete",
            PopupState::DownloadFailed { .. } => "download failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            PopupState::DownloadComplete { .. } | PopupState::DownloadFailed { .. }
        )
    }

    pub fn selection(&self) -> Option<Selection> {
        match self {
            PopupState::QualitySelected { selection } | PopupState::Downloading { selection, .. } => {
                Some(*selection)
            }
            _ => None,
        }
    }
}

/// A user action that does not apply in the current state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("cannot {action} while {state}")]
    NotAllowed {
        action: &'static str,
        state: &'static str,
    },
    #[error("no video at index {0}")]
    NoSuchVideo(usize),
    #[error("no quality at index {0}")]
    NoSuchQuality(usize),
}
