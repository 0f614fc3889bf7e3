use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Popup timing knobs (optional section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingConfig {
    /// Give up on a scan (including inject + retry) after this many seconds.
    pub scan_timeout_secs: u64,
    /// Wait after injecting the page context before retrying the scan.
    pub inject_settle_ms: u64,
    /// Treat a download without any progress signal after this many seconds
    /// as handed off to the host and report it complete.
    pub progress_stall_secs: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            scan_timeout_secs: 10,
            inject_settle_ms: 1000,
            progress_stall_secs: 5,
        }
    }
}

impl TimingConfig {
    pub fn scan_timeout(&self) -> Duration {
        Duration::from_secs(self.scan_timeout_secs)
    }

    pub fn inject_settle(&self) -> Duration {
        Duration::from_millis(self.inject_settle_ms)
    }

    pub fn progress_stall(&self) -> Duration {
        Duration::from_secs(self.progress_stall_secs)
    }
}

/// Third-party helper sites the dispatcher redirects platform embeds to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HelperConfig {
    /// Base URL for YouTube ids; the id is appended as `/youtube/<id>`.
    pub youtube_base: String,
    /// Base URL for Vimeo ids; the id is passed as `/vimeo?url=https://vimeo.com/<id>`.
    pub vimeo_base: String,
}

impl Default for HelperConfig {
    fn default() -> Self {
        Self {
            youtube_base: "https://www.y2mate.com".to_string(),
            vimeo_base: "https://www.savethevideo.com".to_string(),
        }
    }
}

/// Global configuration loaded from `~/.config/vdp/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VdpConfig {
    /// User-Agent sent when fetching pages and media.
    pub user_agent: String,
    /// Where downloads land (None = current directory).
    #[serde(default)]
    pub download_dir: Option<PathBuf>,
    #[serde(default)]
    pub timing: TimingConfig,
    #[serde(default)]
    pub helpers: HelperConfig,
}

impl Default for VdpConfig {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (X11; Linux x86_64) vdp/0.1".to_string(),
            download_dir: None,
            timing: TimingConfig::default(),
            helpers: HelperConfig::default(),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("vdp")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<VdpConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = VdpConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: VdpConfig = toml::from_str(&data)?;
    Ok(cfg)
}
