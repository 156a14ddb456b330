//! Compaction client

use std::time::Duration;

use async_trait::async_trait;
use condense_context::{
    estimate_entries_tokens, estimate_messages_tokens, CompactionPolicy, PolicyDecision,
};
use condense_protocol::Message;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;
use secrecy::ExposeSecret;

use crate::responses::{build_compact_request, CompactRequest, CompactResponse};
use crate::{
    parse_error_body, CompactionClientConfig, CompactionResult, ContextCompactor, ProviderError,
};

/// Client for the responses compaction endpoint.
///
/// Holds only immutable state, so one instance can serve concurrent
/// `compact` calls.
pub struct CompactionClient {
    client: Client,
    config: CompactionClientConfig,
    policy: CompactionPolicy,
}

impl CompactionClient {
    pub fn new(config: CompactionClientConfig) -> Result<Self, ProviderError> {
        config.compaction.validate()?;

        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            format!("Bearer {}", config.api_key.expose_secret())
                .parse()
                .map_err(|_| ProviderError::Configuration("Invalid API key format".into()))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_seconds()))
            .build()?;

        let policy = CompactionPolicy::for_model(&config.model, config.compaction.clone());

        Ok(Self {
            client,
            config,
            policy,
        })
    }

    pub fn config(&self) -> &CompactionClientConfig {
        &self.config
    }

    pub fn policy(&self) -> &CompactionPolicy {
        &self.policy
    }

    fn endpoint(&self) -> String {
        format!("{}/responses/compact", self.config.base_url())
    }

    /// Token estimate for a history and its instructions
    pub fn estimate(&self, messages: &[Message], instructions: Option<&str>) -> usize {
        estimate_messages_tokens(messages, instructions)
    }

    pub fn evaluate(
        &self,
        messages: &[Message],
        instructions: Option<&str>,
    ) -> (usize, PolicyDecision) {
        let tokens = self.estimate(messages, instructions);
        (tokens, self.policy.evaluate(tokens))
    }

    async fn request_compaction(
        &self,
        request: &CompactRequest,
    ) -> Result<CompactResponse, ProviderError> {
        let response = self
            .client
            .post(self.endpoint())
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = parse_error_body(response).await;
            return Err(ProviderError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| {
            ProviderError::InvalidResponse(format!("failed to decode compaction response: {}", e))
        })
    }

    pub async fn compact(
        &self,
        messages: &[Message],
        instructions: Option<&str>,
    ) -> CompactionResult {
        let (original_tokens, decision) = self.evaluate(messages, instructions);

        if !decision.is_triggered() {
            tracing::debug!(
                model = %self.config.model,
                original_tokens,
                %decision,
                "skipping compaction"
            );
            return CompactionResult::NotCompacted { original_tokens };
        }

        let request = build_compact_request(
            &self.config.model,
            messages,
            instructions,
            &self.config.compaction,
        );

        tracing::debug!(
            model = %self.config.model,
            original_tokens,
            items = request.input.len(),
            "requesting compaction"
        );

        let response = match self.request_compaction(&request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(
                    model = %self.config.model,
                    original_tokens,
                    retryable = e.is_retryable(),
                    error = %e,
                    "compaction failed, continuing uncompacted"
                );
                return CompactionResult::NotCompacted { original_tokens };
            }
        };

        let compacted_tokens = response
            .total_tokens()
            .unwrap_or_else(|| estimate_entries_tokens(&response.output));

        tracing::info!(
            model = %self.config.model,
            original_tokens,
            compacted_tokens,
            "conversation compacted"
        );

        CompactionResult::Compacted {
            compacted_input: response.output,
            original_tokens,
            compacted_tokens,
        }
    }
}

#[async_trait]
impl ContextCompactor for CompactionClient {
    async fn compact(&self, messages: &[Message], instructions: Option<&str>) -> CompactionResult {
        CompactionClient::compact(self, messages, instructions).await
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    fn provider(&self) -> &str {
        "openai"
    }
}
