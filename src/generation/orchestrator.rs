// ABOUTME: Runs the seven generation stages in dependency order against a reasoning client
// ABOUTME: Fans out per-day and per-phase iterations with bounded concurrency, order preserved
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Program Generator
//!
//! Stage dependencies form a chain: program structure, weekly layout, one
//! focus per training day, exercises per focus, then detail and nutrition per
//! phase. Iterations inside a stage are independent and run through a
//! `buffered` stream, so results come back in day and phase order whatever
//! the concurrency setting.
//!
//! No stage returns an error. A failed call or unusable answer is replaced by
//! the stage default and the substitution is recorded in the run metadata.

use futures_util::future;
use futures_util::stream::{self, StreamExt};
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument, warn};

use pierre_program_core::models::{
    ExerciseSet, ExerciseSpec, FinalReview, IntakeRecord, PhaseDetail, PhaseNutrition,
    ProgramStructure, WorkoutFocus, WorkoutStructure,
};

use super::generated::{GeneratedPhase, GeneratedProgram, GeneratedWorkout, GenerationMetadata};
use super::outcome::{DefaultReason, Stage, StageOutcome};
use super::prompts::{self, StagePrompt};
use super::sanitizer::{sanitize_intake, RiskLevel};
use super::sequencer::sequence_exercises;
use super::{defaults, parser, validation};
use crate::config::GenerationConfig;
use crate::llm::{ReasoningClient, ReasoningRequest};

/// Stage orchestrator over a reasoning client
pub struct ProgramGenerator<C: ReasoningClient> {
    client: C,
    config: GenerationConfig,
}

impl<C: ReasoningClient> ProgramGenerator<C> {
    /// Create a generator
    #[must_use]
    pub const fn new(client: C, config: GenerationConfig) -> Self {
        Self { client, config }
    }

    /// Underlying reasoning client
    #[must_use]
    pub const fn client(&self) -> &C {
        &self.client
    }

    /// Generation settings
    #[must_use]
    pub const fn config(&self) -> &GenerationConfig {
        &self.config
    }

    /// Model sent with every request
    #[must_use]
    pub fn model(&self) -> &str {
        self.config
            .model
            .as_deref()
            .unwrap_or_else(|| self.client.default_model())
    }

    fn request(&self, prompt: StagePrompt) -> ReasoningRequest {
        let request = ReasoningRequest::new(prompt.messages)
            .with_model(self.model())
            .with_temperature(self.config.temperature)
            .with_max_tokens(self.config.max_tokens);
        if self.client.capabilities().supports_json_mode() {
            request.with_json_output()
        } else {
            request
        }
    }

    /// One call, decode, validate; falls back to `default` on any failure
    async fn run_stage<T, V, D>(
        &self,
        prompt: StagePrompt,
        caller: &str,
        validate: V,
        default: D,
    ) -> StageOutcome<T>
    where
        T: DeserializeOwned,
        V: FnOnce(T) -> Result<T, DefaultReason>,
        D: FnOnce() -> T,
    {
        let stage = prompt.stage;
        let request = self.request(prompt);

        let (decoded, usage) = match self.client.send(&request, caller).await {
            Ok(envelope) => (parser::decode_envelope::<T>(&envelope), envelope.usage),
            Err(error) => (Err(DefaultReason::from(error)), None),
        };

        match decoded.and_then(validate) {
            Ok(value) => {
                debug!(stage = %stage, "Stage answer accepted");
                StageOutcome::generated(value, usage)
            }
            Err(reason) => {
                warn!(stage = %stage, reason = %reason, "Stage answer unusable, using default");
                StageOutcome::defaulted(default(), reason, usage)
            }
        }
    }

    /// Stage 1: overall program shape
    #[instrument(skip_all, fields(stage = "program_structure"))]
    pub async fn get_program_structure(
        &self,
        intake: &IntakeRecord,
        caller: &str,
    ) -> StageOutcome<ProgramStructure> {
        self.run_stage(
            prompts::program_structure(intake),
            caller,
            |structure| Ok(validation::program_structure(structure)),
            defaults::program_structure,
        )
        .await
    }

    /// Stage 2: weekly layout
    #[instrument(skip_all, fields(stage = "workout_structure"))]
    pub async fn get_workout_structure(
        &self,
        intake: &IntakeRecord,
        program: &ProgramStructure,
        caller: &str,
    ) -> StageOutcome<WorkoutStructure> {
        self.run_stage(
            prompts::workout_structure(intake, program),
            caller,
            |workout| Ok(validation::workout_structure(workout)),
            defaults::workout_structure,
        )
        .await
    }

    /// Stage 3: one training day
    #[instrument(skip_all, fields(stage = "workout_focus", day_number = day_number))]
    pub async fn get_workout_focus(
        &self,
        intake: &IntakeRecord,
        program: &ProgramStructure,
        workout: &WorkoutStructure,
        day_number: u32,
        caller: &str,
    ) -> StageOutcome<WorkoutFocus> {
        let rules = &workout.exercise_selection_rules;
        self.run_stage(
            prompts::workout_focus(intake, program, workout, day_number),
            caller,
            |focus| Ok(validation::workout_focus(focus, day_number, rules)),
            || defaults::workout_focus(day_number, workout),
        )
        .await
    }

    /// Stage 4: exercises for one day, sequenced by category
    #[instrument(skip_all, fields(stage = "exercises", day_number = focus.day_number))]
    pub async fn get_exercises_for_focus(
        &self,
        intake: &IntakeRecord,
        program: &ProgramStructure,
        workout: &WorkoutStructure,
        focus: &WorkoutFocus,
        caller: &str,
    ) -> StageOutcome<Vec<ExerciseSpec>> {
        let rules = &workout.exercise_selection_rules;
        let environment = intake.environment.primary;
        let outcome = self
            .run_stage(
                prompts::exercises_for_focus(intake, program, workout, focus),
                caller,
                |set: ExerciseSet| {
                    validation::exercises(set.exercises, environment, rules)
                        .map(|exercises| ExerciseSet { exercises })
                },
                || ExerciseSet {
                    exercises: defaults::exercise_set(environment, rules),
                },
            )
            .await;
        StageOutcome {
            value: sequence_exercises(outcome.value.exercises),
            provenance: outcome.provenance,
            usage: outcome.usage,
        }
    }

    /// Stage 5: narrative for a zero-based phase
    #[instrument(skip_all, fields(stage = "phase_details", phase = phase_index + 1))]
    pub async fn get_phase_details(
        &self,
        intake: &IntakeRecord,
        program: &ProgramStructure,
        workout: &WorkoutStructure,
        phase_index: usize,
        caller: &str,
    ) -> StageOutcome<PhaseDetail> {
        self.run_stage(
            prompts::phase_details(intake, program, workout, phase_index),
            caller,
            |detail| Ok(validation::phase_detail(detail)),
            defaults::phase_detail,
        )
        .await
    }

    /// Stage 6: nutrition for a zero-based phase
    #[instrument(skip_all, fields(stage = "phase_nutrition", phase = phase_index + 1))]
    pub async fn get_phase_nutrition(
        &self,
        intake: &IntakeRecord,
        program: &ProgramStructure,
        phase_index: usize,
        caller: &str,
    ) -> StageOutcome<PhaseNutrition> {
        self.run_stage(
            prompts::phase_nutrition(intake, program, phase_index),
            caller,
            |plan| Ok(validation::phase_nutrition(plan)),
            defaults::phase_nutrition,
        )
        .await
    }

    /// Stage 7: informational review of the assembled program
    #[instrument(skip_all, fields(stage = "final_review"))]
    pub async fn get_final_review(
        &self,
        intake: &IntakeRecord,
        program: &GeneratedProgram,
        caller: &str,
    ) -> StageOutcome<FinalReview> {
        self.run_stage(
            prompts::final_review(intake, program),
            caller,
            Ok,
            defaults::final_review,
        )
        .await
    }

    /// Run every stage and assemble the program
    ///
    /// Intake free text is filtered for prompt injection first. The review
    /// stage runs only when enabled in [`GenerationConfig`].
    #[instrument(skip_all, fields(caller = %caller, model = %self.model()))]
    pub async fn generate(&self, intake: &IntakeRecord, caller: &str) -> GeneratedProgram {
        let (intake, report) = sanitize_intake(intake);
        if report.risk >= RiskLevel::Medium {
            warn!(
                risk = report.risk.as_str(),
                fields = ?report.modified_fields,
                phrases = ?report.suspicious_phrases,
                "Suspicious intake text filtered before prompting"
            );
        }

        let mut metadata = GenerationMetadata::start(self.client.name(), self.model());
        let concurrency = self.config.concurrency.max(1);

        let outcome = self.get_program_structure(&intake, caller).await;
        let structure = metadata.record(Stage::ProgramStructure, None, outcome);
        let outcome = self.get_workout_structure(&intake, &structure, caller).await;
        let workout_structure = metadata.record(Stage::WorkoutStructure, None, outcome);

        let (intake_ref, structure_ref, workout_ref) = (&intake, &structure, &workout_structure);

        let focus_outcomes: Vec<StageOutcome<WorkoutFocus>> =
            stream::iter(1..=workout_structure.days_per_week)
                .map(move |day| {
                    self.get_workout_focus(intake_ref, structure_ref, workout_ref, day, caller)
                })
                .buffered(concurrency)
                .collect()
                .await;
        let foci: Vec<WorkoutFocus> = focus_outcomes
            .into_iter()
            .map(|outcome| {
                let day = outcome.value.day_number;
                metadata.record(Stage::WorkoutFocus, Some(day), outcome)
            })
            .collect();

        let exercise_outcomes: Vec<StageOutcome<Vec<ExerciseSpec>>> = stream::iter(&foci)
            .map(move |focus| {
                self.get_exercises_for_focus(intake_ref, structure_ref, workout_ref, focus, caller)
            })
            .buffered(concurrency)
            .collect()
            .await;
        let workouts: Vec<GeneratedWorkout> = foci
            .into_iter()
            .zip(exercise_outcomes)
            .map(|(focus, outcome)| {
                let exercises = metadata.record(Stage::Exercises, Some(focus.day_number), outcome);
                GeneratedWorkout { focus, exercises }
            })
            .collect();

        let phase_outcomes: Vec<_> = stream::iter(0..structure.phase_durations.len())
            .map(move |index| {
                future::join(
                    self.get_phase_details(intake_ref, structure_ref, workout_ref, index, caller),
                    self.get_phase_nutrition(intake_ref, structure_ref, index, caller),
                )
            })
            .buffered(concurrency)
            .collect()
            .await;
        let phases: Vec<GeneratedPhase> = phase_outcomes
            .into_iter()
            .zip(&structure.phase_durations)
            .enumerate()
            .map(|(index, ((detail, nutrition), weeks))| {
                let phase = u32::try_from(index + 1).ok();
                GeneratedPhase {
                    index,
                    duration_weeks: *weeks,
                    detail: metadata.record(Stage::PhaseDetails, phase, detail),
                    nutrition: metadata.record(Stage::PhaseNutrition, phase, nutrition),
                }
            })
            .collect();

        let mut program = GeneratedProgram {
            structure,
            workout_structure,
            workouts,
            phases,
            review: None,
            metadata,
        };

        if self.config.final_review {
            let outcome = self.get_final_review(&intake, &program, caller).await;
            program.review = Some(program.metadata.record(Stage::FinalReview, None, outcome));
        }

        program.metadata.finish();
        info!(
            program = %program.structure.name,
            phases = program.phases.len(),
            workouts = program.workouts.len(),
            generated = program.metadata.generated_stages,
            defaulted = program.metadata.defaulted_stages.len(),
            total_tokens = program.metadata.usage.total(),
            elapsed_ms = program.metadata.elapsed_ms,
            "Program generation completed"
        );
        program
    }
}
