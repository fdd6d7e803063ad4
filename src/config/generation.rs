// ABOUTME: Generation pipeline tuning read from the environment
// ABOUTME: Token budget, temperature, fan-out width, and the optional final review stage
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

use super::types::LlmProviderType;
use crate::errors::{AppError, AppResult};

/// Environment variable for the per-stage completion token budget
pub const MAX_TOKENS_ENV_VAR: &str = "PIERRE_GENERATION_MAX_TOKENS";
/// Environment variable for sampling temperature
pub const TEMPERATURE_ENV_VAR: &str = "PIERRE_GENERATION_TEMPERATURE";
/// Environment variable for the number of concurrent stage iterations
pub const CONCURRENCY_ENV_VAR: &str = "PIERRE_GENERATION_CONCURRENCY";
/// Environment variable enabling the final review stage
pub const FINAL_REVIEW_ENV_VAR: &str = "PIERRE_GENERATION_FINAL_REVIEW";

/// Default completion token budget per stage
pub const DEFAULT_MAX_TOKENS: u32 = 4096;
/// Default sampling temperature
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
/// Default fan-out width (sequential)
pub const DEFAULT_CONCURRENCY: usize = 1;

/// Pipeline settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Model override, provider default when `None`
    pub model: Option<String>,
    /// Completion token budget per stage call
    pub max_tokens: u32,
    /// Sampling temperature
    pub temperature: f32,
    /// Independent per-day and per-phase iterations in flight at once
    pub concurrency: usize,
    /// Run the final review stage after assembly
    pub final_review: bool,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model: None,
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            concurrency: DEFAULT_CONCURRENCY,
            final_review: false,
        }
    }
}

impl GenerationConfig {
    /// Load from environment, unset variables keep their defaults
    ///
    /// # Errors
    ///
    /// Returns a config error when a variable is set but cannot be parsed, or
    /// when the temperature or concurrency is out of range.
    pub fn from_env() -> AppResult<Self> {
        let defaults = Self::default();
        let temperature = parse_env(TEMPERATURE_ENV_VAR, defaults.temperature)?;
        if !(0.0..=2.0).contains(&temperature) {
            return Err(AppError::config(format!(
                "{TEMPERATURE_ENV_VAR} must be between 0.0 and 2.0, got {temperature}"
            )));
        }
        let concurrency = parse_env(CONCURRENCY_ENV_VAR, defaults.concurrency)?;
        if concurrency == 0 {
            return Err(AppError::config(format!(
                "{CONCURRENCY_ENV_VAR} must be at least 1"
            )));
        }

        Ok(Self {
            model: LlmProviderType::model_from_env(),
            max_tokens: parse_env(MAX_TOKENS_ENV_VAR, defaults.max_tokens)?,
            temperature,
            concurrency,
            final_review: env::var(FINAL_REVIEW_ENV_VAR)
                .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
                .unwrap_or(false),
        })
    }

    /// Builder-style concurrency override
    #[must_use]
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Builder-style final review toggle
    #[must_use]
    pub const fn with_final_review(mut self, enabled: bool) -> Self {
        self.final_review = enabled;
        self
    }
}

fn parse_env<T: FromStr>(name: &str, default: T) -> AppResult<T> {
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|_| AppError::config(format!("Invalid value for {name}: '{raw}'"))),
        _ => Ok(default),
    }
}
