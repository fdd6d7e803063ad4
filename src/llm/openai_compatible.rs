// ABOUTME: OpenAI-compatible chat completions provider for Groq and local endpoints
// ABOUTME: Converts chat completion responses into the content-block envelope
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # `OpenAI`-Compatible Provider
//!
//! One implementation serves Groq (cloud) and local servers such as Ollama,
//! vLLM and `LocalAI`.
//!
//! ## Configuration
//!
//! Groq:
//! - `GROQ_API_KEY`: API key (required)
//!
//! Local:
//! - `LOCAL_LLM_BASE_URL`: Base URL (default: <http://localhost:11434/v1> for Ollama)
//! - `LOCAL_LLM_MODEL`: Model to use (default: `qwen2.5:14b-instruct`)
//! - `LOCAL_LLM_API_KEY`: API key (optional, empty for local servers)

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};

use super::{
    ChatMessage, ContentBlock, LlmCapabilities, MessageEnvelope, ReasoningClient,
    ReasoningRequest, TokenUsage,
};
use crate::errors::{AppError, ErrorCode};

// ============================================================================
// Configuration Constants
// ============================================================================

/// Environment variable for the Groq API key
const GROQ_API_KEY_ENV: &str = "GROQ_API_KEY";

/// Groq base URL
const GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Groq default model
const GROQ_DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";

/// Environment variable for local LLM base URL
const LOCAL_LLM_BASE_URL_ENV: &str = "LOCAL_LLM_BASE_URL";

/// Environment variable for local LLM model
const LOCAL_LLM_MODEL_ENV: &str = "LOCAL_LLM_MODEL";

/// Environment variable for local LLM API key (optional)
const LOCAL_LLM_API_KEY_ENV: &str = "LOCAL_LLM_API_KEY";

/// Default base URL (Ollama)
const DEFAULT_BASE_URL: &str = "http://localhost:11434/v1";

/// Default model for local inference
const DEFAULT_MODEL: &str = "qwen2.5:14b-instruct";

/// Connection timeout (lenient for local servers)
const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Request timeout (local inference can be slow)
const REQUEST_TIMEOUT_SECS: u64 = 300;

// ============================================================================
// API Request/Response Types (OpenAI-compatible format)
// ============================================================================

#[derive(Debug, Serialize)]
struct OpenAiRequest {
    model: String,
    messages: Vec<OpenAiMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    user: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct OpenAiMessage {
    role: String,
    content: String,
}

impl From<&ChatMessage> for OpenAiMessage {
    fn from(msg: &ChatMessage) -> Self {
        Self {
            role: msg.role.as_str().to_owned(),
            content: msg.content.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    #[serde(default)]
    id: Option<String>,
    choices: Vec<OpenAiChoice>,
    #[serde(default)]
    usage: Option<OpenAiUsage>,
    model: String,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiResponseMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiUsage {
    #[serde(rename = "prompt_tokens")]
    prompt: u32,
    #[serde(rename = "completion_tokens")]
    completion: u32,
}

#[derive(Debug, Deserialize)]
struct OpenAiErrorResponse {
    error: OpenAiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct OpenAiErrorDetail {
    message: String,
    #[serde(rename = "type")]
    error_type: Option<String>,
}

// ============================================================================
// Provider Configuration
// ============================================================================

/// Configuration for the `OpenAI`-compatible provider
#[derive(Debug, Clone)]
pub struct OpenAiCompatibleConfig {
    /// Base URL for the API (e.g., <http://localhost:11434/v1>)
    pub base_url: String,
    /// API key (optional for local servers)
    pub api_key: Option<String>,
    /// Default model to use
    pub default_model: String,
    /// Provider name for logging and errors
    pub provider_name: &'static str,
    /// Capabilities of this provider
    pub capabilities: LlmCapabilities,
}

impl OpenAiCompatibleConfig {
    /// Configuration for Groq
    #[must_use]
    pub fn groq(api_key: impl Into<String>) -> Self {
        Self {
            base_url: GROQ_BASE_URL.to_owned(),
            api_key: Some(api_key.into()),
            default_model: GROQ_DEFAULT_MODEL.to_owned(),
            provider_name: "groq",
            capabilities: LlmCapabilities::JSON_MODE | LlmCapabilities::CALLER_METADATA,
        }
    }

    /// Configuration for a local Ollama instance
    #[must_use]
    pub fn ollama(model: &str) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            api_key: None,
            default_model: model.to_owned(),
            provider_name: "ollama",
            capabilities: LlmCapabilities::empty(),
        }
    }
}

impl Default for OpenAiCompatibleConfig {
    fn default() -> Self {
        Self::ollama(DEFAULT_MODEL)
    }
}

// ============================================================================
// Provider Implementation
// ============================================================================

/// Generic `OpenAI`-compatible reasoning provider
pub struct OpenAiCompatibleProvider {
    client: Client,
    config: OpenAiCompatibleConfig,
}

impl OpenAiCompatibleProvider {
    /// Create a new provider with the given configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: OpenAiCompatibleConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| AppError::internal(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    /// Create a Groq provider from `GROQ_API_KEY`
    ///
    /// # Errors
    ///
    /// Returns a config error if `GROQ_API_KEY` is not set.
    pub fn groq_from_env() -> Result<Self, AppError> {
        let api_key = env::var(GROQ_API_KEY_ENV)
            .ok()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                AppError::config(format!("{GROQ_API_KEY_ENV} environment variable not set"))
            })?;
        let config = OpenAiCompatibleConfig::groq(api_key);
        info!(
            "Initializing Groq provider: base_url={}, model={}",
            config.base_url, config.default_model
        );
        Self::new(config)
    }

    /// Create a local provider from `LOCAL_LLM_*` variables
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn local_from_env() -> Result<Self, AppError> {
        let base_url =
            env::var(LOCAL_LLM_BASE_URL_ENV).unwrap_or_else(|_| DEFAULT_BASE_URL.to_owned());
        let default_model =
            env::var(LOCAL_LLM_MODEL_ENV).unwrap_or_else(|_| DEFAULT_MODEL.to_owned());
        let api_key = env::var(LOCAL_LLM_API_KEY_ENV)
            .ok()
            .filter(|k| !k.is_empty());

        // Detect the server from its conventional port
        let provider_name = if base_url.contains(":11434") {
            "ollama"
        } else if base_url.contains(":8000") {
            "vllm"
        } else if base_url.contains(":8080") {
            "localai"
        } else {
            "local"
        };

        let config = OpenAiCompatibleConfig {
            base_url,
            api_key,
            default_model,
            provider_name,
            capabilities: LlmCapabilities::empty(),
        };
        info!(
            "Initializing {} provider: base_url={}, model={}",
            config.provider_name, config.base_url, config.default_model
        );
        Self::new(config)
    }

    fn api_url(&self, endpoint: &str) -> String {
        format!("{}/{endpoint}", self.config.base_url.trim_end_matches('/'))
    }

    fn add_auth_header(&self, request: RequestBuilder) -> RequestBuilder {
        if let Some(ref api_key) = self.config.api_key {
            request.header("Authorization", format!("Bearer {api_key}"))
        } else {
            request
        }
    }

    fn parse_error_response(provider: &str, status: StatusCode, body: &str) -> AppError {
        if let Ok(error_response) = serde_json::from_str::<OpenAiErrorResponse>(body) {
            let error_type = error_response
                .error
                .error_type
                .unwrap_or_else(|| "unknown".to_owned());
            let message = error_response.error.message;

            match status.as_u16() {
                401 | 403 => AppError::new(
                    ErrorCode::ExternalAuthFailed,
                    format!("{provider} authentication failed: {message}"),
                ),
                429 => AppError::new(
                    ErrorCode::ExternalRateLimited,
                    format!("{provider} rate limit reached: {message}"),
                ),
                500..=599 => AppError::external_unavailable(provider, message),
                _ => AppError::external_service(provider, format!("{error_type} - {message}")),
            }
        } else {
            // Local servers often answer with plain text
            match status.as_u16() {
                502..=504 => AppError::external_unavailable(
                    provider,
                    "Server is not responding. Is Ollama/vLLM running?",
                ),
                _ => AppError::external_service(
                    provider,
                    format!(
                        "API error ({status}): {}",
                        body.chars().take(200).collect::<String>()
                    ),
                ),
            }
        }
    }

    /// Build the wire request, applying only what this server supports
    fn build_request(&self, request: &ReasoningRequest, caller: &str) -> OpenAiRequest {
        let capabilities = self.config.capabilities;
        OpenAiRequest {
            model: request
                .model
                .clone()
                .unwrap_or_else(|| self.config.default_model.clone()),
            messages: request.messages.iter().map(OpenAiMessage::from).collect(),
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            user: capabilities
                .supports_caller_metadata()
                .then(|| caller.to_owned()),
            response_format: (request.json_output && capabilities.supports_json_mode()).then_some(
                ResponseFormat {
                    format_type: "json_object",
                },
            ),
        }
    }

    /// Convert a completion into an envelope; empty content yields no blocks
    fn into_envelope(response: OpenAiResponse) -> Result<MessageEnvelope, AppError> {
        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AppError::external_service("OpenAI-compatible", "API returned no choices"))?;

        let content = choice
            .message
            .content
            .filter(|text| !text.trim().is_empty())
            .map(ContentBlock::text)
            .into_iter()
            .collect();

        Ok(MessageEnvelope {
            id: response.id,
            model: response.model,
            content,
            stop_reason: choice.finish_reason,
            usage: response.usage.map(|u| TokenUsage {
                input_tokens: u.prompt,
                output_tokens: u.completion,
            }),
        })
    }
}

#[async_trait]
impl ReasoningClient for OpenAiCompatibleProvider {
    fn name(&self) -> &'static str {
        self.config.provider_name
    }

    fn capabilities(&self) -> LlmCapabilities {
        self.config.capabilities
    }

    fn default_model(&self) -> &str {
        &self.config.default_model
    }

    #[instrument(skip(self, request), fields(provider = self.config.provider_name, model = %request.model.as_deref().unwrap_or(&self.config.default_model)))]
    async fn send(
        &self,
        request: &ReasoningRequest,
        caller: &str,
    ) -> Result<MessageEnvelope, AppError> {
        let provider = self.config.provider_name;
        let wire_request = self.build_request(request, caller);
        debug!(
            "Sending chat completion request to {provider} with {} messages",
            wire_request.messages.len()
        );

        let http_request = self
            .client
            .post(self.api_url("chat/completions"))
            .header("Content-Type", "application/json")
            .json(&wire_request);

        let response = self
            .add_auth_header(http_request)
            .send()
            .await
            .map_err(|e| {
                error!("Failed to send request to {provider}: {e}");
                if e.is_connect() || e.is_timeout() {
                    AppError::external_unavailable(
                        provider,
                        format!("Cannot connect to {}: {e}", self.config.base_url),
                    )
                } else {
                    AppError::external_service(provider, format!("Request failed: {e}"))
                }
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            error!("Failed to read {provider} response: {e}");
            AppError::external_service(provider, format!("Failed to read response: {e}"))
        })?;

        if !status.is_success() {
            return Err(Self::parse_error_response(provider, status, &body));
        }

        let parsed: OpenAiResponse = serde_json::from_str(&body).map_err(|e| {
            error!("Failed to parse {provider} response: {e}");
            AppError::external_service(provider, format!("Failed to parse response: {e}"))
        })?;

        let envelope = Self::into_envelope(parsed)?;
        if envelope.is_truncated() {
            warn!("{provider} response truncated at max_tokens");
        }
        Ok(envelope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_envelope_wraps_text() {
        let response: OpenAiResponse = serde_json::from_str(
            r#"{"id":"c1","model":"llama","choices":[{"message":{"content":"{\"x\":1}"},"finish_reason":"stop"}],
                "usage":{"prompt_tokens":5,"completion_tokens":2,"total_tokens":7}}"#,
        )
        .unwrap();
        let envelope = OpenAiCompatibleProvider::into_envelope(response).unwrap();

        assert_eq!(envelope.first_text(), Some("{\"x\":1}"));
        assert_eq!(envelope.usage.unwrap().total(), 7);
    }

    #[test]
    fn test_empty_content_has_no_text_block() {
        let response: OpenAiResponse = serde_json::from_str(
            r#"{"model":"llama","choices":[{"message":{"content":"  "},"finish_reason":"length"}]}"#,
        )
        .unwrap();
        let envelope = OpenAiCompatibleProvider::into_envelope(response).unwrap();

        assert!(envelope.first_text().is_none());
        assert!(envelope.is_truncated());
    }

    #[test]
    fn test_plain_text_gateway_error_is_unavailable() {
        let error = OpenAiCompatibleProvider::parse_error_response(
            "ollama",
            StatusCode::BAD_GATEWAY,
            "<html>bad gateway</html>",
        );
        assert_eq!(error.code, ErrorCode::ExternalServiceUnavailable);

        let error = OpenAiCompatibleProvider::parse_error_response(
            "groq",
            StatusCode::TOO_MANY_REQUESTS,
            r#"{"error":{"message":"Please try again in 2s","type":"tokens"}}"#,
        );
        assert_eq!(error.code, ErrorCode::ExternalRateLimited);
    }

    #[test]
    fn test_json_mode_and_caller_follow_capabilities() {
        let request = ReasoningRequest::new(vec![ChatMessage::user("plan")]).with_json_output();

        let groq = OpenAiCompatibleProvider::new(OpenAiCompatibleConfig::groq("key")).unwrap();
        let json = serde_json::to_value(groq.build_request(&request, "user-3")).unwrap();
        assert_eq!(json["response_format"]["type"], "json_object");
        assert_eq!(json["user"], "user-3");
        assert_eq!(json["model"], GROQ_DEFAULT_MODEL);

        let ollama = OpenAiCompatibleProvider::new(OpenAiCompatibleConfig::ollama("llama3")).unwrap();
        let json = serde_json::to_value(ollama.build_request(&request, "user-3")).unwrap();
        assert!(json.get("response_format").is_none());
        assert!(json.get("user").is_none());

        let prose = ReasoningRequest::new(vec![ChatMessage::user("chat")]);
        let json = serde_json::to_value(groq.build_request(&prose, "user-3")).unwrap();
        assert!(json.get("response_format").is_none());
    }
}
