//! Dispatcher: turns a platform tag and an embed id into a download URL.
//!
//! The built-in [`RedirectDispatcher`] does not resolve media streams. It
//! builds a link to a public helper site for the platform, with no network
//! access. Anything smarter plugs in through [`UrlResolver`].

mod context;

pub use context::{spawn_background, BackgroundContext, BackgroundEndpoint};

use crate::config::HelperConfig;
use crate::error::VdpError;
use crate::model::Platform;

/// Strategy mapping `(platform, id, quality label)` to a URL.
pub trait UrlResolver: Send + Sync + 'static {
    fn resolve(&self, platform: &str, id: &str, quality_label: &str) -> Result<String, VdpError>;
}

/// Redirects YouTube and Vimeo ids to configurable helper sites.
#[derive(Debug, Clone, Default)]
pub struct RedirectDispatcher {
    helpers: HelperConfig,
}

impl RedirectDispatcher {
    pub fn new(helpers: HelperConfig) -> Self {
        Self { helpers }
    }
}

/// Platforms the redirect dispatcher knows how to handle.
fn supported_platform(platform: &str) -> Result<Platform, VdpError> {
    match platform {
        "youtube" => Ok(Platform::Youtube),
        "vimeo" => Ok(Platform::Vimeo),
        other => Err(VdpError::UnsupportedPlatform(other.to_string())),
    }
}

impl UrlResolver for RedirectDispatcher {
    fn resolve(&self, platform: &str, id: &str, quality_label: &str) -> Result<String, VdpError> {
        let platform = supported_platform(platform)?;
        let id = id.trim();
        if id.is_empty() {
            return Err(VdpError::ResolutionFailed(format!(
                "Failed to extract download URL: missing {} video id",
                platform
            )));
        }
        tracing::debug!(%platform, id, quality_label, "building helper redirect");
        let url = match platform {
            Platform::Youtube => format!(
                "{}/youtube/{}",
                self.helpers.youtube_base.trim_end_matches('/'),
                id
            ),
            Platform::Vimeo => format!(
                "{}/vimeo?url=https://vimeo.com/{}",
                self.helpers.vimeo_base.trim_end_matches('/'),
                id
            ),
            Platform::Facebook => return Err(VdpError::UnsupportedPlatform(platform.to_string())),
        };
        Ok(url)
    }
}
