// ABOUTME: Anthropic Messages API provider for the reasoning client interface
// ABOUTME: Sends role-tagged messages with caller metadata and returns content-block envelopes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Anthropic Provider
//!
//! ## Configuration
//!
//! - `ANTHROPIC_API_KEY`: API key (required)
//! - `ANTHROPIC_BASE_URL`: Base URL (default: <https://api.anthropic.com/v1>)

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};

use super::{
    ContentBlock, LlmCapabilities, MessageEnvelope, MessageRole, ReasoningClient,
    ReasoningRequest, TokenUsage,
};
use crate::errors::{AppError, ErrorCode};

/// Environment variable for the API key
const ANTHROPIC_API_KEY_ENV: &str = "ANTHROPIC_API_KEY";

/// Environment variable for the base URL
const ANTHROPIC_BASE_URL_ENV: &str = "ANTHROPIC_BASE_URL";

/// Default API base URL
const DEFAULT_BASE_URL: &str = "https://api.anthropic.com/v1";

/// Default model
const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";

/// API version header value
const API_VERSION: &str = "2023-06-01";

/// `max_tokens` is mandatory on this API
const DEFAULT_MAX_TOKENS: u32 = 4096;

/// Connection timeout
const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Request timeout (long structured answers take a while)
const REQUEST_TIMEOUT_SECS: u64 = 300;

/// Service name used in error messages
const SERVICE_NAME: &str = "Anthropic";

// ============================================================================
// API Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    messages: Vec<AnthropicMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    metadata: Option<AnthropicMetadata<'a>>,
}

#[derive(Debug, Serialize)]
struct AnthropicMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct AnthropicMetadata<'a> {
    user_id: &'a str,
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    id: String,
    model: String,
    content: Vec<ContentBlock>,
    #[serde(default)]
    stop_reason: Option<String>,
    #[serde(default)]
    usage: Option<AnthropicUsage>,
}

#[derive(Debug, Deserialize)]
struct AnthropicUsage {
    input_tokens: u32,
    output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct AnthropicErrorResponse {
    error: AnthropicErrorDetail,
}

#[derive(Debug, Deserialize)]
struct AnthropicErrorDetail {
    #[serde(rename = "type")]
    error_type: String,
    message: String,
}

// ============================================================================
// Provider
// ============================================================================

/// Configuration for the Anthropic provider
#[derive(Debug, Clone)]
pub struct AnthropicConfig {
    /// API base URL
    pub base_url: String,
    /// API key
    pub api_key: String,
    /// Model used when the request does not name one
    pub default_model: String,
}

impl AnthropicConfig {
    /// Configuration with the default endpoint and model
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            api_key: api_key.into(),
            default_model: DEFAULT_MODEL.to_owned(),
        }
    }
}

/// Anthropic Messages API client
pub struct AnthropicProvider {
    client: Client,
    config: AnthropicConfig,
}

impl AnthropicProvider {
    /// Create a provider with the given configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: AnthropicConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| AppError::internal(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    /// Create a provider from environment variables
    ///
    /// # Errors
    ///
    /// Returns a config error if `ANTHROPIC_API_KEY` is not set.
    pub fn from_env() -> Result<Self, AppError> {
        let api_key = env::var(ANTHROPIC_API_KEY_ENV)
            .ok()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                AppError::config(format!("{ANTHROPIC_API_KEY_ENV} environment variable not set"))
            })?;
        let mut config = AnthropicConfig::new(api_key);
        if let Ok(base_url) = env::var(ANTHROPIC_BASE_URL_ENV) {
            config.base_url = base_url;
        }

        info!(
            "Initializing Anthropic provider: base_url={}, model={}",
            config.base_url, config.default_model
        );
        Self::new(config)
    }

    fn api_url(&self, endpoint: &str) -> String {
        format!("{}/{endpoint}", self.config.base_url.trim_end_matches('/'))
    }

    /// Build the wire request; system messages move to the top-level field
    fn build_request<'a>(
        request: &'a ReasoningRequest,
        model: &'a str,
        caller: &'a str,
    ) -> AnthropicRequest<'a> {
        let messages = request
            .messages
            .iter()
            .filter_map(|m| match m.role {
                MessageRole::System => None,
                MessageRole::User => Some(AnthropicMessage {
                    role: "user",
                    content: &m.content,
                }),
                MessageRole::Assistant => Some(AnthropicMessage {
                    role: "assistant",
                    content: &m.content,
                }),
            })
            .collect();

        AnthropicRequest {
            model,
            max_tokens: request.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            system: request.system_prompt(),
            messages,
            temperature: request.temperature,
            metadata: (!caller.is_empty()).then_some(AnthropicMetadata { user_id: caller }),
        }
    }

    /// Map an error status and body onto the external error codes
    fn parse_error_response(status: StatusCode, body: &str) -> AppError {
        let detail = serde_json::from_str::<AnthropicErrorResponse>(body).map_or_else(
            |_| body.chars().take(200).collect::<String>(),
            |r| format!("{} - {}", r.error.error_type, r.error.message),
        );

        match status.as_u16() {
            401 | 403 => AppError::new(
                ErrorCode::ExternalAuthFailed,
                format!("{SERVICE_NAME} authentication failed: {detail}"),
            ),
            429 => AppError::new(
                ErrorCode::ExternalRateLimited,
                format!("{SERVICE_NAME} rate limit reached: {detail}"),
            ),
            500..=599 => AppError::external_unavailable(SERVICE_NAME, format!("({status}) {detail}")),
            _ => AppError::external_service(SERVICE_NAME, format!("API error ({status}): {detail}")),
        }
    }
}

#[async_trait]
impl ReasoningClient for AnthropicProvider {
    fn name(&self) -> &'static str {
        "anthropic"
    }

    fn capabilities(&self) -> LlmCapabilities {
        LlmCapabilities::CALLER_METADATA
    }

    fn default_model(&self) -> &str {
        &self.config.default_model
    }

    #[instrument(skip(self, request), fields(model = %request.model.as_deref().unwrap_or(&self.config.default_model)))]
    async fn send(
        &self,
        request: &ReasoningRequest,
        caller: &str,
    ) -> Result<MessageEnvelope, AppError> {
        let model = request
            .model
            .as_deref()
            .unwrap_or(&self.config.default_model);
        let wire_request = Self::build_request(request, model, caller);

        debug!(
            "Sending message request to Anthropic with {} messages",
            wire_request.messages.len()
        );

        let response = self
            .client
            .post(self.api_url("messages"))
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", API_VERSION)
            .header("Content-Type", "application/json")
            .json(&wire_request)
            .send()
            .await
            .map_err(|e| {
                error!("Failed to send request to Anthropic: {}", e);
                if e.is_connect() || e.is_timeout() {
                    AppError::external_unavailable(SERVICE_NAME, format!("Failed to connect: {e}"))
                } else {
                    AppError::external_service(SERVICE_NAME, format!("Request failed: {e}"))
                }
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            error!("Failed to read Anthropic response: {}", e);
            AppError::external_service(SERVICE_NAME, format!("Failed to read response: {e}"))
        })?;

        if !status.is_success() {
            return Err(Self::parse_error_response(status, &body));
        }

        let parsed: AnthropicResponse = serde_json::from_str(&body).map_err(|e| {
            error!("Failed to parse Anthropic response: {}", e);
            AppError::external_service(SERVICE_NAME, format!("Failed to parse response: {e}"))
        })?;

        let envelope = MessageEnvelope {
            id: Some(parsed.id),
            model: parsed.model,
            content: parsed.content,
            stop_reason: parsed.stop_reason,
            usage: parsed.usage.map(|u| TokenUsage {
                input_tokens: u.input_tokens,
                output_tokens: u.output_tokens,
            }),
        };
        if envelope.is_truncated() {
            warn!(
                "Anthropic response truncated at max_tokens ({} blocks)",
                envelope.content.len()
            );
        }
        Ok(envelope)
    }
}
