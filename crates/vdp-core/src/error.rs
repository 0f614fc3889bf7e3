//! Error kinds shared by the scanner, dispatcher, download service and popup.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VdpError {
    /// Page context could not be reached, injected or scanned in time.
    #[error("{0}")]
    ScanUnavailable(String),

    /// Scan succeeded but the page has nothing to offer.
    #[error("No videos found on this page.")]
    NoVideosFound,

    #[error("Unsupported video type: {0}")]
    UnsupportedPlatform(String),

    #[error("{0}")]
    ResolutionFailed(String),

    #[error("{0}")]
    DownloadStartFailed(String),

    #[error("{0}")]
    DownloadInterrupted(String),

    #[error("{0}")]
    ThumbnailUnavailable(String),
}

pub type Result<T> = std::result::Result<T, VdpError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_user_facing() {
        assert_eq!(
            VdpError::UnsupportedPlatform("dailymotion".into()).to_string(),
            "Unsupported video type: dailymotion"
        );
        assert_eq!(
            VdpError::NoVideosFound.to_string(),
            "No videos found on this page."
        );
        assert_eq!(
            VdpError::DownloadInterrupted("Download was interrupted".into()).to_string(),
            "Download was interrupted"
        );
    }
}
