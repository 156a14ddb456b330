//! Helpers for reading error responses

use serde::Deserialize;
use serde_json::Value;

/// Read a non-2xx response body and summarise it for logging
pub async fn parse_error_body(response: reqwest::Response) -> String {
    match response.text().await {
        Ok(text) => summarize_error_body(&text),
        Err(_) => "Failed to read error response body".to_string(),
    }
}

/// Structured `{"error": {...}}` bodies are condensed to their fields,
/// anything else is returned as-is
pub fn summarize_error_body(text: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(text) {
        Ok(envelope) => envelope.error.to_string(),
        Err(_) => text.to_string(),
    }
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(rename = "type")]
    error_type: Option<String>,
    message: Option<String>,
    code: Option<Value>,
}

impl std::fmt::Display for ErrorDetail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut parts = Vec::new();

        match &self.code {
            Some(Value::String(code)) => parts.push(format!("code: {}", code)),
            Some(Value::Null) | None => {}
            Some(code) => parts.push(format!("code: {}", code)),
        }
        if let Some(error_type) = &self.error_type {
            parts.push(format!("type: {}", error_type));
        }
        if let Some(message) = &self.message {
            parts.push(format!("message: {}", message));
        }

        if parts.is_empty() {
            write!(f, "Unknown error")
        } else {
            write!(f, "{}", parts.join(", "))
        }
    }
}
