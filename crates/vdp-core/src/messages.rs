//! Typed request/response messages exchanged between contexts.
//!
//! Requests are tagged by `action`; replies are `{ "success": true, ...payload }`
//! or `{ "success": false, "error": "..." }`.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::model::VideoDescriptor;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Request {
    /// Page context: scan the document.
    GetVideos,
    /// Page context: capture the current frame of the element playing `src`.
    GetVideoThumbnail { src: String },
    /// Background context: build a download URL for a platform embed.
    #[serde(rename_all = "camelCase")]
    ResolveUrl {
        platform: String,
        id: String,
        quality_label: String,
    },
}

impl Request {
    pub fn action(&self) -> &'static str {
        match self {
            Request::GetVideos => "getVideos",
            Request::GetVideoThumbnail { .. } => "getVideoThumbnail",
            Request::ResolveUrl { .. } => "resolveUrl",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideosPayload {
    pub videos: Vec<VideoDescriptor>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThumbnailPayload {
    /// `data:image/jpeg;base64,...`
    pub thumbnail: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectUrlPayload {
    pub direct_url: String,
}

/// Decoded reply; `payload` is present only on success.
#[derive(Debug, Clone, Deserialize)]
pub struct Reply<T> {
    pub success: bool,
    #[serde(flatten)]
    pub payload: Option<T>,
    #[serde(default)]
    pub error: Option<String>,
}

impl<T> Reply<T> {
    pub fn into_result(self) -> Result<T, String> {
        match (self.success, self.payload) {
            (true, Some(payload)) => Ok(payload),
            _ => Err(self
                .error
                .unwrap_or_else(|| "malformed reply".to_string())),
        }
    }
}

/// Decodes a raw reply body into the payload or the remote error text.
pub fn decode_reply<T: DeserializeOwned>(raw: &str) -> Result<Result<T, String>, serde_json::Error> {
    let reply: Reply<T> = serde_json::from_str(raw)?;
    Ok(reply.into_result())
}

/// Encodes a success reply carrying `payload`'s fields.
pub fn ok_reply<T: Serialize>(payload: &T) -> String {
    match serde_json::to_value(payload) {
        Ok(serde_json::Value::Object(mut fields)) => {
            fields.insert("success".to_string(), serde_json::Value::Bool(true));
            serde_json::Value::Object(fields).to_string()
        }
        Ok(_) => error_reply("reply payload is not an object"),
        Err(e) => error_reply(&format!("encode reply: {}", e)),
    }
}

pub fn error_reply(message: &str) -> String {
    serde_json::json!({ "success": false, "error": message }).to_string()
}
