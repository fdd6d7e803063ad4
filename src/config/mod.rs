// ABOUTME: Environment-only configuration for providers, generation, and storage
// ABOUTME: Re-exports LlmProviderType, GenerationConfig, and DatabaseConfig
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Configuration module
//!
//! All settings come from environment variables; there is no config file.
//!
//! - **types**: reasoning provider selection (`PIERRE_LLM_PROVIDER`, `PIERRE_LLM_MODEL`)
//! - **generation**: token budget, temperature, fan-out, final review toggle
//! - **database**: program store location (`DATABASE_URL`)

/// Program store location
pub mod database;
/// Pipeline tuning
pub mod generation;
/// Provider selection
pub mod types;

pub use database::{DatabaseConfig, DatabaseUrl};
pub use generation::GenerationConfig;
pub use types::LlmProviderType;
