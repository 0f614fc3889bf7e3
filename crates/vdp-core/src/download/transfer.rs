//! libcurl-backed download service.
//!
//! Each download is a single GET written to `<name>.part` in the download
//! directory and renamed on success. Transfers run on the blocking pool and
//! report through [`DownloadEvents`].

use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;

use super::{
    DownloadDelta, DownloadEvents, DownloadId, DownloadRequest, DownloadService, DownloadState,
    Subscription,
};
use crate::error::VdpError;

/// Minimum spacing between byte-progress notifications.
const PROGRESS_INTERVAL: Duration = Duration::from_millis(250);

/// Decides whether a `save_as` download may go to the given path. May block
/// (e.g. on a terminal prompt); it runs on the blocking pool.
pub type ConfirmFn = Arc<dyn Fn(&Path) -> bool + Send + Sync + 'static>;

pub struct CurlDownloads {
    dir: PathBuf,
    user_agent: String,
    events: DownloadEvents,
    next_id: AtomicU64,
    confirm: Option<ConfirmFn>,
    transfers: Mutex<Vec<JoinHandle<()>>>,
}

impl CurlDownloads {
    pub fn new(dir: impl Into<PathBuf>, user_agent: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            user_agent: user_agent.into(),
            events: DownloadEvents::new(),
            next_id: AtomicU64::new(1),
            confirm: None,
            transfers: Mutex::new(Vec::new()),
        }
    }

    /// Prompt used for `save_as` requests; without one they start unconfirmed.
    pub fn with_confirm(mut self, confirm: impl Fn(&Path) -> bool + Send + Sync + 'static) -> Self {
        self.confirm = Some(Arc::new(confirm));
        self
    }

    pub fn events(&self) -> &DownloadEvents {
        &self.events
    }

    /// Waits for every transfer started so far, including ones the popup
    /// stopped tracking.
    pub async fn wait_idle(&self) {
        let handles: Vec<JoinHandle<()>> = std::mem::take(&mut *self.transfers.lock().unwrap());
        for handle in handles {
            let _ = handle.await;
        }
    }
}

impl DownloadService for CurlDownloads {
    async fn start(&self, request: DownloadRequest) -> Result<DownloadId, VdpError> {
        if url::Url::parse(&request.url).is_err() {
            return Err(VdpError::DownloadStartFailed("Invalid download URL".to_string()));
        }
        fs::create_dir_all(&self.dir).map_err(|e| {
            VdpError::DownloadStartFailed(format!("cannot create {}: {}", self.dir.display(), e))
        })?;

        let final_path = unique_path(&self.dir, &request.filename);
        if request.save_as {
            if let Some(confirm) = self.confirm.clone() {
                let path = final_path.clone();
                let approved = tokio::task::spawn_blocking(move || confirm(&path))
                    .await
                    .map_err(|e| VdpError::DownloadStartFailed(format!("confirmation failed: {}", e)))?;
                if !approved {
                    return Err(VdpError::DownloadStartFailed(
                        "Download canceled by user".to_string(),
                    ));
                }
            }
        }

        let part_path = part_path_for(&final_path);
        let file = File::create(&part_path).map_err(|e| {
            VdpError::DownloadStartFailed(format!("cannot create {}: {}", part_path.display(), e))
        })?;

        let id = DownloadId(self.next_id.fetch_add(1, Ordering::Relaxed));
        tracing::info!(download = %id, url = %request.url, "starting download to {}", final_path.display());

        let events = self.events.clone();
        let url = request.url;
        let user_agent = self.user_agent.clone();
        let handle = tokio::task::spawn_blocking(move || {
            let outcome = run_transfer(id, &url, &user_agent, file, &events)
                .and_then(|written| {
                    fs::rename(&part_path, &final_path)
                        .with_context(|| format!("rename to {}", final_path.display()))?;
                    Ok(written)
                });
            match outcome {
                Ok(written) => {
                    tracing::info!(download = %id, bytes = written, "download completed: {}", final_path.display());
                    events.publish(DownloadDelta::progress(id, written, written));
                    events.publish(DownloadDelta::state(id, DownloadState::Complete));
                }
                Err(e) => {
                    tracing::warn!(download = %id, "download interrupted: {:#}", e);
                    let _ = fs::remove_file(&part_path);
                    events.publish(DownloadDelta::interrupted(id, format!("{:#}", e)));
                }
            }
        });
        let mut transfers = self.transfers.lock().unwrap();
        transfers.retain(|h| !h.is_finished());
        transfers.push(handle);
        Ok(id)
    }

    fn subscribe(&self) -> Subscription {
        self.events.subscribe()
    }
}

/// Performs the GET, streaming into `file`. Returns the number of bytes written.
fn run_transfer(
    id: DownloadId,
    url: &str,
    user_agent: &str,
    mut file: File,
    events: &DownloadEvents,
) -> Result<u64> {
    let mut written: u64 = 0;
    let mut write_error: Option<std::io::Error> = None;
    let mut last_report: Option<Instant> = None;
    let mut last_received: u64 = 0;

    let mut easy = curl::easy::Easy::new();
    easy.url(url).context("invalid URL")?;
    easy.useragent(user_agent)?;
    easy.follow_location(true)?;
    easy.max_redirections(10)?;
    easy.connect_timeout(Duration::from_secs(30))?;
    easy.low_speed_limit(1024)?;
    easy.low_speed_time(Duration::from_secs(60))?;
    easy.progress(true)?;

    {
        let mut transfer = easy.transfer();
        transfer.write_function(|data| match file.write_all(data) {
            Ok(()) => {
                written += data.len() as u64;
                Ok(data.len())
            }
            Err(e) => {
                write_error = Some(e);
                Ok(0) // abort transfer
            }
        })?;
        transfer.progress_function(|dltotal, dlnow, _, _| {
            let (total, now) = (dltotal as u64, dlnow as u64);
            let due = last_report.map_or(true, |t| t.elapsed() >= PROGRESS_INTERVAL);
            if total > 0 && now != last_received && (due || now >= total) {
                events.publish(DownloadDelta::progress(id, now, total));
                last_report = Some(Instant::now());
                last_received = now;
            }
            true
        })?;
        let performed = transfer.perform();
        drop(transfer);
        if let Some(e) = write_error.take() {
            return Err(e).context("write download file");
        }
        performed.context("GET request failed")?;
    }

    let code = easy.response_code().context("no response code")?;
    if !(200..300).contains(&code) {
        anyhow::bail!("GET {} returned HTTP {}", url, code);
    }
    file.flush().context("flush download file")?;
    Ok(written)
}

/// `<dir>/<name>`, or `<stem> (n)<ext>` when that name (or its `.part`) is taken.
fn unique_path(dir: &Path, filename: &str) -> PathBuf {
    let candidate = dir.join(filename);
    if !candidate.exists() && !part_path_for(&candidate).exists() {
        return candidate;
    }
    let (stem, ext) = match filename.rfind('.') {
        Some(dot) if dot > 0 => filename.split_at(dot),
        _ => (filename, ""),
    };
    (1u32..)
        .map(|n| dir.join(format!("{} ({}){}", stem, n, ext)))
        .find(|p| !p.exists() && !part_path_for(p).exists())
        .unwrap_or(candidate)
}

fn part_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".part");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn unique_path_adds_counter() {
        let dir = tempdir().unwrap();
        assert_eq!(unique_path(dir.path(), "clip.mp4"), dir.path().join("clip.mp4"));
        fs::write(dir.path().join("clip.mp4"), b"x").unwrap();
        assert_eq!(unique_path(dir.path(), "clip.mp4"), dir.path().join("clip (1).mp4"));
        fs::write(dir.path().join("clip (1).mp4.part"), b"x").unwrap();
        assert_eq!(unique_path(dir.path(), "clip.mp4"), dir.path().join("clip (2).mp4"));
    }

    #[test]
    fn unique_path_without_extension() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("video"), b"x").unwrap();
        assert_eq!(unique_path(dir.path(), "video"), dir.path().join("video (1)"));
    }

    #[test]
    fn part_suffix() {
        assert_eq!(
            part_path_for(Path::new("/tmp/a.mp4")),
            PathBuf::from("/tmp/a.mp4.part")
        );
    }

    #[tokio::test]
    async fn rejects_invalid_url_before_transfer() {
        let dir = tempdir().unwrap();
        let downloads = CurlDownloads::new(dir.path(), "test");
        let err = downloads
            .start(DownloadRequest {
                url: "not a url".into(),
                filename: "a.mp4".into(),
                save_as: false,
            })
            .await
            .unwrap_err();
        assert_eq!(err, VdpError::DownloadStartFailed("Invalid download URL".into()));
    }

    #[tokio::test]
    async fn declined_confirmation_rejects_start() {
        let dir = tempdir().unwrap();
        let downloads = CurlDownloads::new(dir.path(), "test").with_confirm(|_| false);
        let err = downloads
            .start(DownloadRequest {
                url: "http://127.0.0.1:9/a.mp4".into(),
                filename: "a.mp4".into(),
                save_as: true,
            })
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Download canceled by user");
        assert!(!dir.path().join("a.mp4.part").exists());
    }

    #[tokio::test]
    async fn confirmation_runs_off_the_runtime_thread() {
        let dir = tempdir().unwrap();
        let runtime_thread = std::thread::current().id();
        let prompted_on = Arc::new(Mutex::new(None));
        let seen = Arc::clone(&prompted_on);
        let downloads = CurlDownloads::new(dir.path(), "test").with_confirm(move |_| {
            *seen.lock().unwrap() = Some(std::thread::current().id());
            false
        });
        let err = downloads
            .start(DownloadRequest {
                url: "http://127.0.0.1:9/a.mp4".into(),
                filename: "a.mp4".into(),
                save_as: true,
            })
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Download canceled by user");
        let prompted_on = prompted_on.lock().unwrap().expect("confirm was called");
        assert_ne!(prompted_on, runtime_thread);
    }

    #[tokio::test]
    async fn finished_transfers_are_pruned() {
        let dir = tempdir().unwrap();
        let closed_port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let url = format!("http://127.0.0.1:{}/a.mp4", closed_port);
        let downloads = CurlDownloads::new(dir.path(), "test");
        let request = DownloadRequest {
            url,
            filename: "a.mp4".into(),
            save_as: false,
        };

        let mut events = downloads.subscribe();
        let first = downloads.start(request.clone()).await.unwrap();
        loop {
            let delta = events.recv().await.unwrap();
            if delta.id == first && delta.state == Some(DownloadState::Interrupted) {
                break;
            }
        }
        while !downloads.transfers.lock().unwrap().iter().all(|h| h.is_finished()) {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        downloads.start(request).await.unwrap();
        assert_eq!(downloads.transfers.lock().unwrap().len(), 1);
        downloads.wait_idle().await;
        assert!(downloads.transfers.lock().unwrap().is_empty());
    }
}
