// ABOUTME: Domain models for program generation and persistence
// ABOUTME: Re-exports intake, stage structures, measure normalization, and persisted records
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Models
//!
//! - [`intake`]: questionnaire snapshot read by every stage
//! - [`program`]: structures produced by the generation stages
//! - [`measure`]: unit normalization and the legacy reps projection
//! - [`persisted`]: the draft handed to storage and the rows read back

/// Intake questionnaire snapshot
pub mod intake;
/// Measure normalization
pub mod measure;
/// Persistable tree and stored records
pub mod persisted;
/// Stage-shaped structures
pub mod program;

pub use intake::{
    EnvironmentPreference, EquipmentAccess, EquipmentType, ExperienceLevel, IntakeRecord,
    TrainingEnvironment, WorkoutStyle,
};
pub use measure::{legacy_reps, normalize_measure, MeasureUnit, NormalizedMeasure};
pub use persisted::{
    ExerciseLibraryEntry, PersistedExercise, PersistedProgram, PersistedWorkout,
    PersistedWorkoutPlan, PhaseDraft, ProgramDraft, ProgramFlags, WorkoutDraft,
};
pub use program::{
    ExerciseCategory, ExerciseSelectionRules, ExerciseSet, ExerciseSpec, FinalReview, Macros,
    Measure, MeasureType, PhaseDetail, PhaseNutrition, ProgramStructure, SessionBlock,
    WorkoutFocus, WorkoutStructure,
};
