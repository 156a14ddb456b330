//! Token estimation over message content
//!
//! Uses a fixed ~4 characters per token heuristic. This is an approximation,
//! not a tokenizer, and totals will not match what a provider bills.
//! Payloads that look like embedded binary (data URIs, long base64 runs)
//! are charged a flat [`IMAGE_TOKEN_ESTIMATE`] instead of their length.

use condense_protocol::{ContentItem, Message, MessageContent};
use serde_json::Value;

/// Flat charge for an image, file attachment or binary-looking string
pub const IMAGE_TOKEN_ESTIMATE: usize = 1000;

pub const CHARS_PER_TOKEN: usize = 4;

const DATA_URI_IMAGE_PREFIX: &str = "data:image/";

/// Strings at or below this many chars are never treated as raw base64
const BASE64_MIN_CHARS: usize = 1000;

/// Leading chars inspected for the base64 alphabet
const BASE64_PROBE_CHARS: usize = 100;

/// How a tagged item is charged
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ItemCharge {
    Flat,
    TextField,
    Fields,
}

/// Ordered tag rules, first match wins. Tags not listed fall back to
/// [`ItemCharge::Fields`].
const TAG_CHARGES: &[(&str, ItemCharge)] = &[
    ("image", ItemCharge::Flat),
    ("image_url", ItemCharge::Flat),
    ("input_image", ItemCharge::Flat),
    ("file", ItemCharge::Flat),
    ("input_file", ItemCharge::Flat),
    ("text", ItemCharge::TextField),
    ("input_text", ItemCharge::TextField),
];

fn charge_for_tag(tag: Option<&str>) -> ItemCharge {
    tag.and_then(|tag| {
        TAG_CHARGES
            .iter()
            .find(|(candidate, _)| *candidate == tag)
            .map(|(_, charge)| *charge)
    })
    .unwrap_or(ItemCharge::Fields)
}

fn is_base64_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '+' | '/' | '=')
}

/// Whether a string looks like an encoded image or blob rather than prose.
///
/// Long non-binary text whose first 100 chars happen to be base64-clean
/// (hashes, minified code) is misclassified and undercounted.
pub fn is_image_like(text: &str) -> bool {
    if text.starts_with(DATA_URI_IMAGE_PREFIX) {
        return true;
    }

    text.len() > BASE64_MIN_CHARS
        && text.chars().count() > BASE64_MIN_CHARS
        && text.chars().take(BASE64_PROBE_CHARS).all(is_base64_char)
}

/// Estimate tokens for a string (~4 chars per token, rounded up)
pub fn estimate_text_tokens(text: &str) -> usize {
    if is_image_like(text) {
        return IMAGE_TOKEN_ESTIMATE;
    }
    text.chars().count().div_ceil(CHARS_PER_TOKEN)
}

/// Estimate tokens for arbitrary JSON.
///
/// Strings are measured, arrays are charged entry by entry using the item
/// tag rules, objects sum their values. Numbers, booleans and null cost
/// nothing.
pub fn estimate_value_tokens(value: &Value) -> usize {
    match value {
        Value::String(text) => estimate_text_tokens(text),
        Value::Array(entries) => estimate_entries_tokens(entries),
        Value::Object(fields) => fields.values().map(estimate_value_tokens).sum(),
        Value::Null | Value::Bool(_) | Value::Number(_) => 0,
    }
}

/// Estimate a list of JSON entries, such as a compaction response's output
pub fn estimate_entries_tokens(entries: &[Value]) -> usize {
    entries.iter().map(estimate_entry_tokens).sum()
}

fn estimate_entry_tokens(entry: &Value) -> usize {
    let Some(fields) = entry.as_object() else {
        return estimate_value_tokens(entry);
    };

    match charge_for_tag(fields.get("type").and_then(Value::as_str)) {
        ItemCharge::Flat => IMAGE_TOKEN_ESTIMATE,
        ItemCharge::TextField => match fields.get("text").or_else(|| fields.get("content")) {
            Some(Value::String(text)) => estimate_text_tokens(text),
            Some(other) => estimate_value_tokens(other),
            None => 0,
        },
        ItemCharge::Fields => estimate_value_tokens(entry),
    }
}

/// Estimate tokens for one content item
pub fn estimate_item_tokens(item: &ContentItem) -> usize {
    match item {
        ContentItem::Text { text, .. } | ContentItem::InputText { text, .. } => {
            estimate_text_tokens(text)
        }
        ContentItem::ImageUrl { .. }
        | ContentItem::InputImage { .. }
        | ContentItem::File { .. }
        | ContentItem::InputFile { .. } => IMAGE_TOKEN_ESTIMATE,
        ContentItem::Unknown(value) => estimate_entry_tokens(value),
    }
}

pub fn estimate_content_tokens(content: &MessageContent) -> usize {
    match content {
        MessageContent::Text(text) => estimate_text_tokens(text),
        MessageContent::Items(items) => items.iter().map(estimate_item_tokens).sum(),
    }
}

pub fn estimate_message_tokens(message: &Message) -> usize {
    estimate_content_tokens(&message.content)
}

/// Estimate the whole history plus optional system instructions
pub fn estimate_messages_tokens(messages: &[Message], instructions: Option<&str>) -> usize {
    let history: usize = messages.iter().map(estimate_message_tokens).sum();
    history + instructions.map(estimate_text_tokens).unwrap_or(0)
}
