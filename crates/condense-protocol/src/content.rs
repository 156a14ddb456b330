//! Content items for structured messages

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// A single tagged unit within a structured message.
///
/// Chat-style items (`text`, `image_url`, `file`) and their responses-style
/// counterparts (`input_text`, `input_image`, `input_file`) are typed. Any
/// other shape, including a known tag whose fields don't match, lands in
/// [`ContentItem::Unknown`] with every field kept as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentItem {
    Text {
        text: String,
        #[serde(flatten)]
        extra: Map<String, Value>,
    },
    ImageUrl {
        image_url: ImageUrl,
        #[serde(flatten)]
        extra: Map<String, Value>,
    },
    File {
        file: FileData,
        #[serde(flatten)]
        extra: Map<String, Value>,
    },
    InputText {
        text: String,
        #[serde(flatten)]
        extra: Map<String, Value>,
    },
    InputImage {
        /// `Some(Value::Null)` for an explicit null, `None` when absent
        #[serde(
            default,
            deserialize_with = "present",
            skip_serializing_if = "Option::is_none"
        )]
        image_url: Option<Value>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        detail: Option<String>,
        #[serde(flatten)]
        extra: Map<String, Value>,
    },
    InputFile {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        filename: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        file_data: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        file_id: Option<String>,
        #[serde(flatten)]
        extra: Map<String, Value>,
    },
    #[serde(untagged)]
    Unknown(Value),
}

/// Any value that is present, null included
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl ContentItem {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text {
            text: text.into(),
            extra: Map::new(),
        }
    }

    pub fn image_url(url: impl Into<String>) -> Self {
        Self::ImageUrl {
            image_url: ImageUrl::Url(url.into()),
            extra: Map::new(),
        }
    }

    pub fn file(filename: impl Into<String>, file_data: impl Into<String>) -> Self {
        Self::File {
            file: FileData {
                filename: Some(filename.into()),
                file_data: Some(file_data.into()),
                file_id: None,
                extra: Map::new(),
            },
            extra: Map::new(),
        }
    }

    pub fn input_text(text: impl Into<String>) -> Self {
        Self::InputText {
            text: text.into(),
            extra: Map::new(),
        }
    }

    /// The `type` tag of this item, if it carries one
    pub fn type_tag(&self) -> Option<&str> {
        match self {
            Self::Text { .. } => Some("text"),
            Self::ImageUrl { .. } => Some("image_url"),
            Self::File { .. } => Some("file"),
            Self::InputText { .. } => Some("input_text"),
            Self::InputImage { .. } => Some("input_image"),
            Self::InputFile { .. } => Some("input_file"),
            Self::Unknown(value) => value.get("type").and_then(Value::as_str),
        }
    }

    /// Whether the item is already in the responses input shape
    pub fn is_input_item(&self) -> bool {
        matches!(
            self,
            Self::InputText { .. } | Self::InputImage { .. } | Self::InputFile { .. }
        )
    }
}

/// Image reference carried by an `image_url` item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ImageUrl {
    Url(String),
    Detailed(ImageUrlDetail),
    Other(Value),
}

impl ImageUrl {
    /// The nested URL when there is one, otherwise the raw value
    pub fn to_value(&self) -> Value {
        match self {
            Self::Url(url) => Value::String(url.clone()),
            Self::Detailed(detail) => Value::String(detail.url.clone()),
            Self::Other(value) => value.clone(),
        }
    }

    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Detailed(detail) => detail.detail.as_deref(),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageUrlDetail {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Inline attachment carried by a `file` item
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_id: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_text_item_serialization() {
        let item = ContentItem::text("Hello");
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json, json!({"type": "text", "text": "Hello"}));
    }

    #[test]
    fn test_image_url_shapes() {
        let plain: ContentItem =
            serde_json::from_value(json!({"type": "image_url", "image_url": "https://x/y.png"}))
                .unwrap();
        let nested: ContentItem = serde_json::from_value(json!({
            "type": "image_url",
            "image_url": {"url": "https://x/y.png", "detail": "high"}
        }))
        .unwrap();

        match (&plain, &nested) {
            (
                ContentItem::ImageUrl { image_url: a, .. },
                ContentItem::ImageUrl { image_url: b, .. },
            ) => {
                assert_eq!(a.to_value(), json!("https://x/y.png"));
                assert_eq!(b.to_value(), json!("https://x/y.png"));
                assert_eq!(b.detail(), Some("high"));
            }
            _ => panic!("expected image_url items"),
        }
    }

    #[test]
    fn test_unrecognized_tag_is_preserved() {
        let raw = json!({
            "type": "media",
            "mimeType": "video/mp4",
            "data": "AAAA",
            "nested": {"k": [1, 2, 3]}
        });
        let item: ContentItem = serde_json::from_value(raw.clone()).unwrap();

        assert!(matches!(item, ContentItem::Unknown(_)));
        assert_eq!(item.type_tag(), Some("media"));
        assert_eq!(serde_json::to_value(&item).unwrap(), raw);
    }

    #[test]
    fn test_known_tag_with_unexpected_fields_falls_back() {
        let raw = json!({"type": "text", "content": "no text field here"});
        let item: ContentItem = serde_json::from_value(raw.clone()).unwrap();

        assert_eq!(item, ContentItem::Unknown(raw));
        assert_eq!(item.type_tag(), Some("text"));
    }

    #[test]
    fn test_extension_fields_survive() {
        let raw = json!({
            "type": "input_image",
            "image_url": "data:image/png;base64,AAAA",
            "detail": "low",
            "cache_control": {"type": "ephemeral"}
        });
        let item: ContentItem = serde_json::from_value(raw.clone()).unwrap();

        assert!(item.is_input_item());
        assert_eq!(serde_json::to_value(&item).unwrap(), raw);
    }

    #[test]
    fn test_input_image_null_and_missing_url() {
        let explicit = json!({"type": "input_image", "image_url": null});
        let item: ContentItem = serde_json::from_value(explicit.clone()).unwrap();
        assert!(matches!(
            item,
            ContentItem::InputImage {
                image_url: Some(Value::Null),
                ..
            }
        ));
        assert_eq!(serde_json::to_value(&item).unwrap(), explicit);

        let missing = json!({"type": "input_image", "detail": "low"});
        let item: ContentItem = serde_json::from_value(missing.clone()).unwrap();
        assert!(matches!(
            item,
            ContentItem::InputImage {
                image_url: None,
                ..
            }
        ));
        assert_eq!(serde_json::to_value(&item).unwrap(), missing);
    }

    #[test]
    fn test_file_item() {
        let item = ContentItem::file("report.pdf", "data:application/pdf;base64,JVBER");
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["type"], "file");
        assert_eq!(json["file"]["filename"], "report.pdf");
        assert!(json["file"].get("file_id").is_none());
    }
}
