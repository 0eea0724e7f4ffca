//! Request and response bodies

use serde::{Deserialize, Serialize};

use crate::error::AlertError;

/// Message returned when an event carries no usable key
pub const MISSING_KEY_MESSAGE: &str = "'object_key' missing";

/// Inbound upload notification.
///
/// The key may arrive as `object_key` or, for older senders, as `key`.
/// Unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadEvent {
    #[serde(default)]
    pub object_key: Option<String>,
    #[serde(default)]
    pub key: Option<String>,
}

impl UploadEvent {
    pub fn with_object_key(key: impl Into<String>) -> Self {
        Self {
            object_key: Some(key.into()),
            key: None,
        }
    }

    /// Parse a raw request body; an empty body is an event without a key.
    ///
    /// Both an empty body and malformed JSON are client errors (400), not
    /// internal failures.
    pub fn from_slice(body: &[u8]) -> Result<Self, AlertError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        serde_json::from_slice(body)
            .map_err(|e| AlertError::Validation(format!("Invalid JSON payload: {}", e)))
    }

    /// First non-empty key, `object_key` before `key`
    pub fn resolve_key(&self) -> Option<&str> {
        [self.object_key.as_deref(), self.key.as_deref()]
            .into_iter()
            .flatten()
            .find(|k| !k.is_empty())
    }
}

/// Body of every `/s3-event` response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertResponse {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl AlertResponse {
    pub fn ok(page: impl Into<String>) -> Self {
        Self {
            status: "ok".to_string(),
            page: Some(page.into()),
            message: None,
        }
    }

    pub fn error(message: impl Into<String>, page: Option<String>) -> Self {
        Self {
            status: "error".to_string(),
            page,
            message: Some(message.into()),
        }
    }
}
