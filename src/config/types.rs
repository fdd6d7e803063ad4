// ABOUTME: Reasoning provider selection read from the environment
// ABOUTME: LlmProviderType enum with parsing, defaults, and model override lookup
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};
use std::env;
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Reasoning provider used by the generation pipeline
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LlmProviderType {
    /// Anthropic Messages API (default)
    #[default]
    Anthropic,
    /// Groq via its `OpenAI`-compatible endpoint
    Groq,
    /// Local `OpenAI`-compatible endpoint (Ollama, vLLM, `LocalAI`)
    Local,
}

impl LlmProviderType {
    /// Environment variable name for provider selection
    pub const ENV_VAR: &'static str = "PIERRE_LLM_PROVIDER";

    /// Environment variable for model selection
    pub const MODEL_ENV_VAR: &'static str = "PIERRE_LLM_MODEL";

    /// Parse from string with fallback to default
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "groq" => Self::Groq,
            "local" | "ollama" | "vllm" | "localai" => Self::Local,
            _ => Self::Anthropic, // Default fallback (including "anthropic" and "claude")
        }
    }

    /// Load from environment variable
    #[must_use]
    pub fn from_env() -> Self {
        env::var(Self::ENV_VAR)
            .map(|s| Self::from_str_or_default(&s))
            .unwrap_or_default()
    }

    /// Model override from `PIERRE_LLM_MODEL`, `None` when unset or blank
    #[must_use]
    pub fn model_from_env() -> Option<String> {
        env::var(Self::MODEL_ENV_VAR)
            .ok()
            .filter(|model| !model.trim().is_empty())
    }
}

impl Display for LlmProviderType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Anthropic => write!(f, "anthropic"),
            Self::Groq => write!(f, "groq"),
            Self::Local => write!(f, "local"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_parsing() {
        assert_eq!(LlmProviderType::from_str_or_default("GROQ"), LlmProviderType::Groq);
        assert_eq!(LlmProviderType::from_str_or_default("ollama"), LlmProviderType::Local);
        assert_eq!(
            LlmProviderType::from_str_or_default("anthropic"),
            LlmProviderType::Anthropic
        );
        assert_eq!(
            LlmProviderType::from_str_or_default("something-else"),
            LlmProviderType::Anthropic
        );
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        for provider in [
            LlmProviderType::Anthropic,
            LlmProviderType::Groq,
            LlmProviderType::Local,
        ] {
            assert_eq!(
                LlmProviderType::from_str_or_default(&provider.to_string()),
                provider
            );
        }
    }
}
