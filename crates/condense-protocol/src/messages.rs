//! Message types for conversation history

use serde::{Deserialize, Serialize};

use crate::ContentItem;

/// Role of a message participant
///
/// Message-class names are accepted on input: `human` reads as [`Role::User`]
/// and `ai` as [`Role::Assistant`]. Any other name (`developer`, `function`)
/// is kept as [`Role::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    #[serde(alias = "human")]
    User,
    #[serde(alias = "ai")]
    Assistant,
    Tool,
    #[serde(untagged)]
    Other(String),
}

/// A message in the conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: MessageContent,
}

impl Message {
    pub fn new(role: Role, content: impl Into<MessageContent>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, MessageContent::Text(content.into()))
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, MessageContent::Text(content.into()))
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, MessageContent::Text(content.into()))
    }

    pub fn with_items(role: Role, items: Vec<ContentItem>) -> Self {
        Self::new(role, MessageContent::Items(items))
    }
}

/// Content of a message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Items(Vec<ContentItem>),
}

impl MessageContent {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Items(_) => None,
        }
    }

    pub fn items(&self) -> &[ContentItem] {
        match self {
            Self::Text(_) => &[],
            Self::Items(items) => items,
        }
    }
}

impl From<String> for MessageContent {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for MessageContent {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<Vec<ContentItem>> for MessageContent {
    fn from(items: Vec<ContentItem>) -> Self {
        Self::Items(items)
    }
}
