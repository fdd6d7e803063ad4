// ABOUTME: Reasoning provider selector for runtime provider switching
// ABOUTME: Wraps Anthropic, Groq, or a local endpoint based on PIERRE_LLM_PROVIDER
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Provider Selector
//!
//! Set `PIERRE_LLM_PROVIDER`:
//! - `anthropic` (default): requires `ANTHROPIC_API_KEY`
//! - `groq`: requires `GROQ_API_KEY`
//! - `local`/`ollama`/`vllm`/`localai`: uses `LOCAL_LLM_*` variables

use async_trait::async_trait;
use tracing::{debug, info};

use super::{
    AnthropicProvider, LlmCapabilities, MessageEnvelope, OpenAiCompatibleProvider,
    ReasoningClient, ReasoningRequest,
};
use crate::config::LlmProviderType;
use crate::errors::AppError;

/// Reasoning client chosen at runtime
pub enum ReasoningProvider {
    /// Anthropic Messages API
    Anthropic(AnthropicProvider),
    /// Groq chat completions
    Groq(OpenAiCompatibleProvider),
    /// Local `OpenAI`-compatible server
    Local(OpenAiCompatibleProvider),
}

impl ReasoningProvider {
    /// Create the provider named by `PIERRE_LLM_PROVIDER`
    ///
    /// # Errors
    ///
    /// Returns a config error if the selected provider's API key is missing.
    pub fn from_env() -> Result<Self, AppError> {
        let provider_type = LlmProviderType::from_env();
        info!(
            "Initializing reasoning provider: {} (set {} to change)",
            provider_type,
            LlmProviderType::ENV_VAR
        );

        let provider = Self::create(provider_type)?;
        debug!(
            "Provider {} initialized with model: {}",
            provider.name(),
            provider.default_model()
        );
        Ok(provider)
    }

    /// Create a provider of a specific type from its environment variables
    ///
    /// # Errors
    ///
    /// Returns a config error if the provider's API key is missing.
    pub fn create(provider_type: LlmProviderType) -> Result<Self, AppError> {
        match provider_type {
            LlmProviderType::Anthropic => Ok(Self::Anthropic(AnthropicProvider::from_env()?)),
            LlmProviderType::Groq => Ok(Self::Groq(OpenAiCompatibleProvider::groq_from_env()?)),
            LlmProviderType::Local => Ok(Self::Local(OpenAiCompatibleProvider::local_from_env()?)),
        }
    }

    /// Provider type of this instance
    #[must_use]
    pub const fn provider_type(&self) -> LlmProviderType {
        match self {
            Self::Anthropic(_) => LlmProviderType::Anthropic,
            Self::Groq(_) => LlmProviderType::Groq,
            Self::Local(_) => LlmProviderType::Local,
        }
    }

    fn inner(&self) -> &dyn ReasoningClient {
        match self {
            Self::Anthropic(p) => p,
            Self::Groq(p) | Self::Local(p) => p,
        }
    }
}

#[async_trait]
impl ReasoningClient for ReasoningProvider {
    fn name(&self) -> &'static str {
        self.inner().name()
    }

    fn capabilities(&self) -> LlmCapabilities {
        self.inner().capabilities()
    }

    fn default_model(&self) -> &str {
        self.inner().default_model()
    }

    async fn send(
        &self,
        request: &ReasoningRequest,
        caller: &str,
    ) -> Result<MessageEnvelope, AppError> {
        self.inner().send(request, caller).await
    }
}
