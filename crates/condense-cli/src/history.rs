//! History file loading

use std::path::Path;

use anyhow::{Context, Result};
use condense_protocol::Message;
use serde::Deserialize;

/// Either a bare message array or an object carrying instructions too
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum HistoryFile {
    Messages(Vec<Message>),
    Document {
        messages: Vec<Message>,
        #[serde(default)]
        instructions: Option<String>,
    },
}

#[derive(Debug)]
pub struct History {
    pub messages: Vec<Message>,
    pub instructions: Option<String>,
}

impl History {
    pub fn load(path: &Path, instructions: Option<String>) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read history file: {}", path.display()))?;
        Self::parse(&content, instructions)
            .with_context(|| format!("Failed to parse history file: {}", path.display()))
    }

    fn parse(content: &str, instructions: Option<String>) -> Result<Self> {
        let history = match serde_json::from_str(content)? {
            HistoryFile::Messages(messages) => Self {
                messages,
                instructions: None,
            },
            HistoryFile::Document {
                messages,
                instructions,
            } => Self {
                messages,
                instructions,
            },
        };

        Ok(Self {
            instructions: instructions.or(history.instructions),
            ..history
        })
    }

    pub fn instructions(&self) -> Option<&str> {
        self.instructions.as_deref()
    }
}
