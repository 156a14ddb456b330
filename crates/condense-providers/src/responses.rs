//! Responses-style input conversion
//!
//! The compaction endpoint takes a flat list of `{role, content}` items
//! where structured content uses the `input_*` part types. Chat-style parts
//! are rewritten, parts already in that shape and anything unrecognized are
//! passed through untouched.

use condense_context::CompactionConfig;
use condense_protocol::{ContentItem, Message, MessageContent, Role};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponsesRole {
    User,
    Assistant,
    System,
}

impl From<&Role> for ResponsesRole {
    fn from(role: &Role) -> Self {
        match role {
            Role::User => Self::User,
            Role::Assistant => Self::Assistant,
            Role::System | Role::Tool | Role::Other(_) => Self::System,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponsesInputItem {
    pub role: ResponsesRole,
    pub content: MessageContent,
}

/// Body of a compaction request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompactRequest {
    pub model: String,
    pub input: Vec<ResponsesInputItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
}

/// Successful compaction response
#[derive(Debug, Clone, Deserialize)]
pub struct CompactResponse {
    pub output: Vec<Value>,
    #[serde(default)]
    pub usage: Option<CompactUsage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CompactUsage {
    #[serde(default)]
    pub total_tokens: Option<usize>,
}

impl CompactResponse {
    pub fn total_tokens(&self) -> Option<usize> {
        self.usage.as_ref().and_then(|usage| usage.total_tokens)
    }
}

pub fn convert_item(item: &ContentItem) -> ContentItem {
    match item {
        ContentItem::Text { text, .. } => ContentItem::InputText {
            text: text.clone(),
            extra: Map::new(),
        },
        ContentItem::ImageUrl { image_url, .. } => ContentItem::InputImage {
            image_url: Some(image_url.to_value()),
            detail: image_url.detail().map(str::to_string),
            extra: Map::new(),
        },
        ContentItem::File { file, .. } => ContentItem::InputFile {
            filename: file.filename.clone(),
            file_data: file.file_data.clone(),
            file_id: file.file_id.clone(),
            extra: Map::new(),
        },
        ContentItem::Unknown(value) => match content_text(value) {
            Some(text) => ContentItem::InputText {
                text: text.to_string(),
                extra: Map::new(),
            },
            None => item.clone(),
        },
        ContentItem::InputText { .. }
        | ContentItem::InputImage { .. }
        | ContentItem::InputFile { .. } => item.clone(),
    }
}

/// Text parts that carry their text under `content` instead of `text`
fn content_text(value: &Value) -> Option<&str> {
    if value.get("type").and_then(Value::as_str) != Some("text") {
        return None;
    }
    value.get("content").and_then(Value::as_str)
}

fn convert_message(message: &Message) -> ResponsesInputItem {
    let content = match &message.content {
        MessageContent::Text(text) => MessageContent::Text(text.clone()),
        MessageContent::Items(items) => {
            MessageContent::Items(items.iter().map(convert_item).collect())
        }
    };

    ResponsesInputItem {
        role: ResponsesRole::from(&message.role),
        content,
    }
}

/// Rewrite a history into responses input items, one per message
pub fn convert_to_responses_input(messages: &[Message]) -> Vec<ResponsesInputItem> {
    messages.iter().map(convert_message).collect()
}

/// Build the request body. Caller instructions are forwarded only when the
/// config preserves them; a configured compaction prompt is appended after
/// them.
pub fn build_compact_request(
    model: &str,
    messages: &[Message],
    instructions: Option<&str>,
    config: &CompactionConfig,
) -> CompactRequest {
    let caller = instructions.filter(|_| config.preserve_instructions);
    let parts: Vec<&str> = caller
        .into_iter()
        .chain(config.compaction_prompt.as_deref())
        .filter(|part| !part.is_empty())
        .collect();

    CompactRequest {
        model: model.to_string(),
        input: convert_to_responses_input(messages),
        instructions: if parts.is_empty() {
            None
        } else {
            Some(parts.join("\n\n"))
        },
    }
}
