//! CLI for VDP: scan a page for videos, download one, or resolve an embed.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;
use vdp_core::config;

use commands::{run_completions, run_download, run_resolve, run_scan, DownloadArgs, PageSource};

/// Top-level CLI for the VDP video downloader.
#[derive(Debug, Parser)]
#[command(name = "vdp")]
#[command(about = "VDP: find the videos on a web page and download them", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// List the videos found on a page.
    Scan {
        /// Page URL. Relative video links are resolved against it.
        url: String,

        /// Read the page markup from a saved HTML file instead of fetching it.
        #[arg(long, value_name = "PATH")]
        file: Option<PathBuf>,

        /// Print descriptors as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Scan a page and download one of its videos.
    Download {
        /// Page URL.
        url: String,

        /// Read the page markup from a saved HTML file instead of fetching it.
        #[arg(long, value_name = "PATH")]
        file: Option<PathBuf>,

        /// Video to download, as numbered by `vdp scan` (default 1).
        #[arg(long, value_name = "N")]
        video: Option<usize>,

        /// Quality to download, as numbered by `vdp scan` (default 1).
        #[arg(long, value_name = "N")]
        quality: Option<usize>,

        /// Directory to save into (default: config `download_dir`, else the current directory).
        #[arg(long, value_name = "DIR")]
        dir: Option<PathBuf>,

        /// Do not ask before saving.
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Print the download URL for an embedded player id.
    Resolve {
        /// Platform tag: youtube or vimeo.
        platform: String,

        /// Platform video id.
        id: String,

        /// Quality label passed to the dispatcher.
        #[arg(long, default_value = "720p")]
        quality: String,
    },

    /// Print a shell completion script.
    Completions {
        /// Target shell.
        shell: Shell,
    },
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        if let CliCommand::Completions { shell } = cli.command {
            run_completions(shell);
            return Ok(());
        }

        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Scan { url, file, json } => {
                run_scan(&cfg, &PageSource { url, file }, json).await?
            }
            CliCommand::Download {
                url,
                file,
                video,
                quality,
                dir,
                yes,
            } => {
                let args = DownloadArgs {
                    page: PageSource { url, file },
                    video,
                    quality,
                    dir,
                    yes,
                };
                run_download(&cfg, &args).await?
            }
            CliCommand::Resolve {
                platform,
                id,
                quality,
            } => run_resolve(&cfg, &platform, &id, &quality).await?,
            CliCommand::Completions { .. } => {}
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
