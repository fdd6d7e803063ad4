// ABOUTME: Main library entry point for Pierre program generation
// ABOUTME: Staged reasoning pipeline from intake answers to a persisted multi-phase training program
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Pierre Programs
//!
//! Turns a client's intake questionnaire into a multi-phase training and
//! nutrition program and stores it as one relational tree.
//!
//! ## Architecture
//!
//! - **Generation**: seven prompt/parse/validate stages driven by
//!   [`generation::ProgramGenerator`], each degrading to a documented default
//! - **LLM**: the [`llm::ReasoningClient`] boundary with Anthropic, Groq and
//!   local OpenAI-compatible providers
//! - **Database**: atomic persistence through [`database::ProgramStore`]
//! - **Config**: environment-driven provider, generation and database settings
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use pierre_programs::config::{DatabaseConfig, GenerationConfig};
//! use pierre_programs::database::Database;
//! use pierre_programs::generation::ProgramGenerator;
//! use pierre_programs::llm::ReasoningProvider;
//! use pierre_program_core::models::{IntakeRecord, ProgramFlags};
//!
//! #[tokio::main]
//! async fn main() -> pierre_programs::errors::AppResult<()> {
//!     let generator = ProgramGenerator::new(ReasoningProvider::from_env()?, GenerationConfig::from_env()?);
//!     let database = Database::new(&DatabaseConfig::from_env()?.url).await?;
//!
//!     let intake = IntakeRecord::new("hypertrophy").with_days_available(4);
//!     let program = generator.generate(&intake, "coach-42").await;
//!     let draft = program.into_draft("coach-42", ProgramFlags::default());
//!     let stored = database.programs().save_program_to_database(&draft).await?;
//!     println!("saved {}", stored.id);
//!     Ok(())
//! }
//! ```

/// Environment configuration
pub mod config;
/// Program storage
pub mod database;
/// Unified error types
pub mod errors;
/// Program generation pipeline
pub mod generation;
/// Reasoning service clients
pub mod llm;
/// Structured logging setup
pub mod logging;
