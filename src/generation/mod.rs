// ABOUTME: Program generation pipeline turning an intake record into a complete program
// ABOUTME: Prompts, parsing, defaults, validation, sequencing, sanitizing and the stage orchestrator
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Generation
//!
//! ```text
//! Intake ─▶ ProgramStructure ─▶ WorkoutStructure ─▶ WorkoutFocus (per day)
//!                                      │                  └─▶ Exercises (per day, sequenced)
//!                                      └─▶ PhaseDetail + PhaseNutrition (per phase)
//!                                                         └─▶ FinalReview (optional)
//! ```
//!
//! Every stage yields a [`StageOutcome`]: the accepted value or the stage
//! default, tagged with its [`Provenance`].

/// Hand-authored stage fallbacks
pub mod defaults;
/// Pipeline output and its conversion into a persistable draft
pub mod generated;
/// Stage orchestrator
pub mod orchestrator;
/// Stage outcome tagging
pub mod outcome;
/// Response decoding
pub mod parser;
/// Per-stage request builders
pub mod prompts;
/// Prompt-injection filtering of intake text
pub mod sanitizer;
/// Category ordering of workout exercises
pub mod sequencer;
/// Bounds pass over generated values
pub mod validation;

pub use generated::{
    DefaultedStage, GeneratedPhase, GeneratedProgram, GeneratedWorkout, GenerationMetadata,
};
pub use orchestrator::ProgramGenerator;
pub use outcome::{DefaultReason, Provenance, Stage, StageOutcome};
pub use sanitizer::{sanitize_intake, RiskLevel, SanitizationReport};
pub use sequencer::sequence_exercises;
