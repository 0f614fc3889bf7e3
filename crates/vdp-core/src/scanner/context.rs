//! The page context: answers scanner messages for one loaded page, and the
//! tab handle the popup uses to reach (and if needed inject) it.

use std::future::Future;
use std::sync::{Arc, Mutex};

use super::{capture_thumbnail, scan, FrameGrabber};
use crate::bridge::{spawn_context, BridgeError, Endpoint, MessageHandler};
use crate::messages::{error_reply, ok_reply, Request, ThumbnailPayload, VideosPayload};
use crate::model::VideoDescriptor;
use crate::page::PageDocument;
use crate::popup::PageTab;

/// Message handler living in the page context.
pub struct PageContext {
    page: PageDocument,
    grabber: Option<Arc<dyn FrameGrabber>>,
}

impl PageContext {
    pub fn new(page: PageDocument, grabber: Option<Arc<dyn FrameGrabber>>) -> Self {
        Self { page, grabber }
    }
}

impl MessageHandler for PageContext {
    fn handle(&mut self, request: Request) -> String {
        match request {
            Request::GetVideos => match scan(&self.page) {
                Ok(videos) => {
                    tracing::debug!("sending {} videos to popup", videos.len());
                    ok_reply(&VideosPayload { videos })
                }
                Err(e) => {
                    tracing::error!("error analyzing videos: {}", e);
                    error_reply(&e.to_string())
                }
            },
            Request::GetVideoThumbnail { src } => {
                match capture_thumbnail(&self.page, self.grabber.as_deref(), &src) {
                    Ok(thumbnail) => ok_reply(&ThumbnailPayload { thumbnail }),
                    Err(e) => error_reply(&e.to_string()),
                }
            }
            other => error_reply(&format!("unsupported action: {}", other.action())),
        }
    }
}

/// A tab showing `page`. The page context starts only when injected.
pub struct LocalTab {
    page: PageDocument,
    grabber: Option<Arc<dyn FrameGrabber>>,
    endpoint: Mutex<Option<Endpoint>>,
}

impl LocalTab {
    pub fn new(page: PageDocument) -> Self {
        Self {
            page,
            grabber: None,
            endpoint: Mutex::new(None),
        }
    }

    pub fn with_grabber(mut self, grabber: Arc<dyn FrameGrabber>) -> Self {
        self.grabber = Some(grabber);
        self
    }

    pub fn page(&self) -> &PageDocument {
        &self.page
    }

    /// True while a page context is running for this tab.
    pub fn is_injected(&self) -> bool {
        self.endpoint
            .lock()
            .unwrap()
            .as_ref()
            .map(|e| !e.is_closed())
            .unwrap_or(false)
    }

    fn current_endpoint(&self) -> Result<Endpoint, BridgeError> {
        self.endpoint
            .lock()
            .unwrap()
            .clone()
            .ok_or(BridgeError::Unreachable)
    }
}

impl PageTab for LocalTab {
    fn get_videos(&self) -> impl Future<Output = Result<Vec<VideoDescriptor>, BridgeError>> + Send {
        let endpoint = self.current_endpoint();
        async move {
            let payload: VideosPayload = endpoint?.request(&Request::GetVideos).await?;
            Ok(payload.videos)
        }
    }

    fn get_video_thumbnail(&self, src: &str) -> impl Future<Output = Result<String, BridgeError>> + Send {
        let endpoint = self.current_endpoint();
        let request = Request::GetVideoThumbnail {
            src: src.to_string(),
        };
        async move {
            let payload: ThumbnailPayload = endpoint?.request(&request).await?;
            Ok(payload.thumbnail)
        }
    }

    fn inject(&self) -> impl Future<Output = anyhow::Result<()>> + Send {
        let result = {
            let mut slot = self.endpoint.lock().unwrap();
            if slot.as_ref().map(|e| !e.is_closed()).unwrap_or(false) {
                tracing::debug!("page context already active");
            } else {
                let handler = PageContext::new(self.page.clone(), self.grabber.clone());
                let (endpoint, _task) = spawn_context("page", handler);
                *slot = Some(endpoint);
                tracing::info!("page context injected for {}", self.page.location.href);
            }
            Ok(())
        };
        async move { result }
    }
}
