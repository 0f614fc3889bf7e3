//! `vdp resolve` – print the dispatcher URL for an embed id.

use anyhow::Result;
use vdp_core::config::VdpConfig;
use vdp_core::popup::Background;

use super::page::background;

pub async fn run_resolve(cfg: &VdpConfig, platform: &str, id: &str, quality: &str) -> Result<()> {
    let url = background(cfg).resolve_url(platform, id, quality).await?;
    println!("{}", url);
    Ok(())
}
