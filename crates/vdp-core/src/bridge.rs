//! Message bridge between contexts.
//!
//! Each context (page, background) is a tokio task draining an mpsc inbox.
//! A request travels as a JSON string with a oneshot reply sender, so the two
//! sides never share memory: descriptors are copied by serialization.

use serde::de::DeserializeOwned;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::messages::{decode_reply, error_reply, Request};

const INBOX_CAPACITY: usize = 16;

#[derive(Debug, Error)]
pub enum BridgeError {
    /// No context is listening (never injected, or already torn down).
    #[error("Could not establish connection. Receiving end does not exist.")]
    Unreachable,
    /// The context dropped the request without replying.
    #[error("The message port closed before a response was received.")]
    NoReply,
    #[error("message codec: {0}")]
    Codec(#[from] serde_json::Error),
    /// The context replied `{ success: false, error }`; carries the error verbatim.
    #[error("{0}")]
    Remote(String),
}

/// One in-flight request.
pub struct Envelope {
    pub body: String,
    pub reply: oneshot::Sender<String>,
}

/// Handles requests inside a context. Returns the encoded reply.
pub trait MessageHandler: Send + 'static {
    fn handle(&mut self, request: Request) -> String;
}

/// Sending side of a context's inbox.
#[derive(Clone)]
pub struct Endpoint {
    tx: mpsc::Sender<Envelope>,
}

impl Endpoint {
    /// True once the context task has stopped.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    /// Sends `request` and waits for the typed reply payload.
    pub async fn request<T: DeserializeOwned>(&self, request: &Request) -> Result<T, BridgeError> {
        let body = serde_json::to_string(request)?;
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(Envelope {
                body,
                reply: reply_tx,
            })
            .await
            .map_err(|_| BridgeError::Unreachable)?;
        let raw = reply_rx.await.map_err(|_| BridgeError::NoReply)?;
        decode_reply::<T>(&raw)?.map_err(BridgeError::Remote)
    }
}

/// Starts a context task running `handler`. The task ends when every
/// `Endpoint` clone has been dropped.
pub fn spawn_context<H: MessageHandler>(name: &'static str, mut handler: H) -> (Endpoint, JoinHandle<()>) {
    let (tx, mut rx) = mpsc::channel::<Envelope>(INBOX_CAPACITY);
    let handle = tokio::spawn(async move {
        tracing::debug!(context = name, "context started");
        while let Some(envelope) = rx.recv().await {
            let reply = match serde_json::from_str::<Request>(&envelope.body) {
                Ok(request) => {
                    tracing::debug!(context = name, action = request.action(), "received message");
                    handler.handle(request)
                }
                Err(e) => {
                    tracing::warn!(context = name, "malformed request: {}", e);
                    error_reply(&format!("malformed request: {}", e))
                }
            };
            let _ = envelope.reply.send(reply);
        }
        tracing::debug!(context = name, "context inbox closed");
    });
    (Endpoint { tx }, handle)
}
