// ABOUTME: Tests for environment-driven configuration of generation, database and providers
// ABOUTME: Serialized because they mutate process environment variables
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use std::env;
use std::path::PathBuf;

use pierre_programs::config::generation::{
    CONCURRENCY_ENV_VAR, FINAL_REVIEW_ENV_VAR, MAX_TOKENS_ENV_VAR, TEMPERATURE_ENV_VAR,
};
use pierre_programs::config::{DatabaseConfig, DatabaseUrl, GenerationConfig, LlmProviderType};
use pierre_programs::errors::ErrorCode;
use pierre_programs::llm::{ReasoningClient, ReasoningProvider};
use serial_test::serial;

const GENERATION_VARS: [&str; 5] = [
    MAX_TOKENS_ENV_VAR,
    TEMPERATURE_ENV_VAR,
    CONCURRENCY_ENV_VAR,
    FINAL_REVIEW_ENV_VAR,
    LlmProviderType::MODEL_ENV_VAR,
];

fn clear(vars: &[&str]) {
    for var in vars {
        env::remove_var(var);
    }
}

#[test]
#[serial]
fn test_generation_config_defaults_when_unset() {
    clear(&GENERATION_VARS);

    let config = GenerationConfig::from_env().unwrap();

    assert_eq!(config, GenerationConfig::default());
    assert_eq!(config.concurrency, 1);
    assert_eq!(config.max_tokens, 4096);
    assert!(!config.final_review);
    assert!(config.model.is_none());
}

#[test]
#[serial]
fn test_generation_config_reads_overrides() {
    clear(&GENERATION_VARS);
    env::set_var(MAX_TOKENS_ENV_VAR, "2048");
    env::set_var(TEMPERATURE_ENV_VAR, "0.2");
    env::set_var(CONCURRENCY_ENV_VAR, "3");
    env::set_var(FINAL_REVIEW_ENV_VAR, "TRUE");
    env::set_var(LlmProviderType::MODEL_ENV_VAR, "claude-test");

    let config = GenerationConfig::from_env().unwrap();
    clear(&GENERATION_VARS);

    assert_eq!(config.max_tokens, 2048);
    assert!((config.temperature - 0.2).abs() < f32::EPSILON);
    assert_eq!(config.concurrency, 3);
    assert!(config.final_review);
    assert_eq!(config.model.as_deref(), Some("claude-test"));
}

#[test]
#[serial]
fn test_generation_config_rejects_bad_values() {
    clear(&GENERATION_VARS);

    env::set_var(CONCURRENCY_ENV_VAR, "0");
    let error = GenerationConfig::from_env().unwrap_err();
    assert_eq!(error.code, ErrorCode::ConfigError);
    clear(&GENERATION_VARS);

    env::set_var(TEMPERATURE_ENV_VAR, "3.5");
    assert!(GenerationConfig::from_env().is_err());
    clear(&GENERATION_VARS);

    env::set_var(MAX_TOKENS_ENV_VAR, "lots");
    assert!(GenerationConfig::from_env().is_err());
    clear(&GENERATION_VARS);
}

#[test]
#[serial]
fn test_database_url_from_environment() {
    env::set_var("DATABASE_URL", "sqlite::memory:");
    assert!(DatabaseConfig::from_env().unwrap().url.is_memory());

    env::set_var("DATABASE_URL", "sqlite:./data/test.db");
    assert_eq!(
        DatabaseConfig::from_env().unwrap().url,
        DatabaseUrl::SQLite {
            path: PathBuf::from("./data/test.db")
        }
    );

    env::set_var("DATABASE_URL", "postgres://localhost/programs");
    assert!(DatabaseConfig::from_env().is_err());

    env::remove_var("DATABASE_URL");
    assert_eq!(DatabaseConfig::from_env().unwrap().url, DatabaseUrl::default());
}

#[test]
#[serial]
fn test_provider_selection_from_environment() {
    env::set_var(LlmProviderType::ENV_VAR, "ollama");
    env::set_var("LOCAL_LLM_MODEL", "llama3.1:8b");

    let provider = ReasoningProvider::from_env().unwrap();
    assert_eq!(provider.provider_type(), LlmProviderType::Local);
    assert_eq!(provider.default_model(), "llama3.1:8b");

    env::set_var(LlmProviderType::ENV_VAR, "anthropic");
    env::remove_var("ANTHROPIC_API_KEY");
    assert!(ReasoningProvider::from_env().is_err());

    env::remove_var(LlmProviderType::ENV_VAR);
    env::remove_var("LOCAL_LLM_MODEL");
}
