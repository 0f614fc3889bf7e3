//! The background context: serves `resolveUrl` for the popup.

use std::future::Future;
use std::sync::Arc;

use super::UrlResolver;
use crate::bridge::{spawn_context, BridgeError, Endpoint, MessageHandler};
use crate::messages::{error_reply, ok_reply, DirectUrlPayload, Request};
use crate::popup::Background;

/// Message handler living in the background context.
pub struct BackgroundContext {
    resolver: Arc<dyn UrlResolver>,
}

impl BackgroundContext {
    pub fn new(resolver: Arc<dyn UrlResolver>) -> Self {
        Self { resolver }
    }
}

impl MessageHandler for BackgroundContext {
    fn handle(&mut self, request: Request) -> String {
        match request {
            Request::ResolveUrl {
                platform,
                id,
                quality_label,
            } => match self.resolver.resolve(&platform, &id, &quality_label) {
                Ok(direct_url) => ok_reply(&DirectUrlPayload { direct_url }),
                Err(e) => {
                    tracing::warn!(platform = %platform, "resolve failed: {}", e);
                    error_reply(&e.to_string())
                }
            },
            other => error_reply(&format!("unsupported action: {}", other.action())),
        }
    }
}

/// Popup-side handle to the background context.
#[derive(Clone)]
pub struct BackgroundEndpoint {
    endpoint: Endpoint,
}

/// Starts the background context with `resolver`.
pub fn spawn_background(resolver: Arc<dyn UrlResolver>) -> BackgroundEndpoint {
    let (endpoint, _task) = spawn_context("background", BackgroundContext::new(resolver));
    BackgroundEndpoint { endpoint }
}

impl Background for BackgroundEndpoint {
    fn resolve_url(
        &self,
        platform: &str,
        id: &str,
        quality_label: &str,
    ) -> impl Future<Output = Result<String, BridgeError>> + Send {
        let endpoint = self.endpoint.clone();
        let request = Request::ResolveUrl {
            platform: platform.to_string(),
            id: id.to_string(),
            quality_label: quality_label.to_string(),
        };
        async move {
            let payload: DirectUrlPayload = endpoint.request(&request).await?;
            Ok(payload.direct_url)
        }
    }
}
