//! Uniform success/error envelope returned by every tool.
//!
//! Callers distinguish success from failure by `isError` alone; the single text
//! block carries either pretty-printed upstream JSON or an `Error: `-prefixed
//! message. This shape is the public contract of all 30 tools.

use rmcp::model::{CallToolResult, Content};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextBlock {
    #[serde(rename = "type")]
    pub kind: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    pub content: Vec<TextBlock>,
    #[serde(rename = "isError", default, skip_serializing_if = "std::ops::Not::not")]
    pub is_error: bool,
}

impl Envelope {
    pub fn text(&self) -> &str {
        self.content.first().map(|b| b.text.as_str()).unwrap_or("")
    }
}

/// Wrap a successful upstream payload.
pub fn ok(data: &Value) -> Envelope {
    let text = serde_json::to_string_pretty(data).unwrap_or_else(|_| data.to_string());
    Envelope {
        content: vec![TextBlock {
            kind: "text".into(),
            text,
        }],
        is_error: false,
    }
}

/// Wrap a caught failure.
pub fn err(message: impl Into<String>) -> Envelope {
    Envelope {
        content: vec![TextBlock {
            kind: "text".into(),
            text: format!("Error: {}", message.into()),
        }],
        is_error: true,
    }
}

impl From<Envelope> for CallToolResult {
    fn from(env: Envelope) -> Self {
        let blocks: Vec<Content> = env.content.into_iter().map(|b| Content::text(b.text)).collect();
        if env.is_error {
            CallToolResult::error(blocks)
        } else {
            CallToolResult::success(blocks)
        }
    }
}
