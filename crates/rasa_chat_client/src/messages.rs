//! REST webhook message types. Client → server is a single JSON object,
//! server → client is a JSON array of reply items.

use serde::{Deserialize, Serialize};

/// Sender id used when none is configured.
pub const DEFAULT_SENDER: &str = "user";

/// Client → server: one user message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundMessage {
    pub sender: String,
    pub message: String,
}

impl OutboundMessage {
    pub fn new(sender: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
            message: message.into(),
        }
    }
}

/// Server → client: one element of the reply array.
///
/// Only `text` is rendered. The other fields the webhook may emit are kept
/// so callers can inspect them; a field of an unexpected type reads as
/// absent without affecting its siblings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResponseItem {
    pub recipient_id: Option<String>,
    pub text: Option<String>,
    pub image: Option<String>,
    pub buttons: Vec<serde_json::Value>,
    pub custom: Option<serde_json::Value>,
}

impl ResponseItem {
    pub fn from_json(value: &serde_json::Value) -> Self {
        let string = |key: &str| value.get(key).and_then(|v| v.as_str()).map(str::to_string);
        Self {
            recipient_id: string("recipient_id"),
            text: string("text"),
            image: string("image"),
            buttons: value
                .get("buttons")
                .and_then(|b| b.as_array())
                .cloned()
                .unwrap_or_default(),
            custom: value.get("custom").filter(|c| !c.is_null()).cloned(),
        }
    }

    /// The Markdown text to render, if this item carries any.
    /// An empty string counts as no text.
    pub fn markdown(&self) -> Option<&str> {
        self.text.as_deref().filter(|t| !t.is_empty())
    }
}

/// Decode a reply body. The top level must be an array; elements that are
/// not objects decode to items without text.
pub fn parse_reply(body: &str) -> Result<Vec<ResponseItem>, String> {
    let value: serde_json::Value = serde_json::from_str(body).map_err(|e| e.to_string())?;
    let items = value
        .as_array()
        .ok_or_else(|| format!("expected a JSON array, got {}", json_kind(&value)))?;
    Ok(items.iter().map(ResponseItem::from_json).collect())
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
