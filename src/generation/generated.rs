// ABOUTME: In-memory result of a pipeline run and its conversion into a persistable draft
// ABOUTME: GeneratedProgram with per-stage provenance metadata and token usage totals
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};
use serde::Serialize;

use pierre_program_core::models::{
    ExerciseSpec, FinalReview, PhaseDetail, PhaseDraft, PhaseNutrition, ProgramDraft,
    ProgramFlags, ProgramStructure, WorkoutDraft, WorkoutFocus, WorkoutStructure,
};

use super::outcome::{DefaultReason, Stage, StageOutcome};
use crate::llm::TokenUsage;

/// One training day with its sequenced exercises
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneratedWorkout {
    /// Day layout
    pub focus: WorkoutFocus,
    /// Exercises in session order
    pub exercises: Vec<ExerciseSpec>,
}

/// Narrative and nutrition for one phase
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneratedPhase {
    /// Zero-based phase index
    pub index: usize,
    /// Phase length in weeks
    pub duration_weeks: u32,
    /// Phase narrative
    pub detail: PhaseDetail,
    /// Phase nutrition
    pub nutrition: PhaseNutrition,
}

/// Stage that fell back to its default
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DefaultedStage {
    /// Stage identifier
    pub stage: Stage,
    /// Day number or 1-based phase number for iterated stages
    pub iteration: Option<u32>,
    /// Why the default was used
    pub reason: DefaultReason,
}

/// Facts about a pipeline run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationMetadata {
    /// Provider that served the calls
    pub provider: String,
    /// Model requested
    pub model: String,
    /// When the run started
    pub started_at: DateTime<Utc>,
    /// Wall-clock duration in milliseconds
    pub elapsed_ms: u64,
    /// Tokens summed over every call that reported usage
    pub usage: TokenUsage,
    /// Stage calls whose answer was accepted
    pub generated_stages: u32,
    /// Stage calls replaced by defaults
    pub defaulted_stages: Vec<DefaultedStage>,
}

impl GenerationMetadata {
    /// Empty metadata for a run starting now
    #[must_use]
    pub fn start(provider: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            model: model.into(),
            started_at: Utc::now(),
            elapsed_ms: 0,
            usage: TokenUsage::default(),
            generated_stages: 0,
            defaulted_stages: Vec::new(),
        }
    }

    /// Fold one stage outcome into the totals and return its value
    pub fn record<T>(&mut self, stage: Stage, iteration: Option<u32>, outcome: StageOutcome<T>) -> T {
        if let Some(usage) = outcome.usage {
            self.usage.input_tokens = self.usage.input_tokens.saturating_add(usage.input_tokens);
            self.usage.output_tokens = self.usage.output_tokens.saturating_add(usage.output_tokens);
        }
        if let Some(reason) = outcome.default_reason() {
            self.defaulted_stages.push(DefaultedStage {
                stage,
                iteration,
                reason: reason.clone(),
            });
        } else {
            self.generated_stages += 1;
        }
        outcome.into_value()
    }

    /// Stamp the elapsed time
    pub fn finish(&mut self) {
        let elapsed = Utc::now().signed_duration_since(self.started_at);
        self.elapsed_ms = u64::try_from(elapsed.num_milliseconds()).unwrap_or(0);
    }

    /// Whether any stage used the service's answer
    #[must_use]
    pub fn is_personalized(&self) -> bool {
        self.generated_stages > 0
    }
}

/// Everything a pipeline run produced
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneratedProgram {
    /// Stage 1 output
    pub structure: ProgramStructure,
    /// Stage 2 output
    pub workout_structure: WorkoutStructure,
    /// Stages 3 and 4, ordered by day number
    pub workouts: Vec<GeneratedWorkout>,
    /// Stages 5 and 6, ordered by phase
    pub phases: Vec<GeneratedPhase>,
    /// Stage 7 output, informational only
    pub review: Option<FinalReview>,
    /// Run metadata
    pub metadata: GenerationMetadata,
}

impl GeneratedProgram {
    /// Assemble the tree handed to storage
    ///
    /// The weekly workouts are attached to every phase. The review is not
    /// part of the draft.
    #[must_use]
    pub fn into_draft(self, author: &str, flags: ProgramFlags) -> ProgramDraft {
        let workouts: Vec<WorkoutDraft> = self
            .workouts
            .into_iter()
            .map(|workout| WorkoutDraft {
                focus: workout.focus,
                exercises: workout.exercises,
            })
            .collect();

        let phases = self
            .phases
            .into_iter()
            .map(|phase| PhaseDraft {
                phase: u32::try_from(phase.index + 1).unwrap_or(u32::MAX),
                duration_weeks: phase.duration_weeks,
                detail: phase.detail,
                nutrition: phase.nutrition,
                workouts: workouts.clone(),
            })
            .collect();

        ProgramDraft {
            name: self.structure.name,
            description: self.structure.description,
            created_by: author.to_owned(),
            flags,
            phases,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::defaults;
    use pierre_program_core::models::TrainingEnvironment;

    fn program_with_phases(count: u32) -> GeneratedProgram {
        let mut structure = defaults::program_structure();
        structure.phase_count = count;
        structure.phase_durations = vec![4; count as usize];
        let workout_structure = defaults::workout_structure();
        let workouts = (1..=workout_structure.days_per_week)
            .map(|day| GeneratedWorkout {
                focus: defaults::workout_focus(day, &workout_structure),
                exercises: defaults::exercise_set(
                    TrainingEnvironment::Gym,
                    &workout_structure.exercise_selection_rules,
                ),
            })
            .collect();
        let phases = (0..count as usize)
            .map(|index| GeneratedPhase {
                index,
                duration_weeks: 4,
                detail: defaults::phase_detail(),
                nutrition: defaults::phase_nutrition(),
            })
            .collect();

        GeneratedProgram {
            structure,
            workout_structure,
            workouts,
            phases,
            review: None,
            metadata: GenerationMetadata::start("test", "test-model"),
        }
    }

    #[test]
    fn test_draft_has_one_plan_per_phase() {
        let draft = program_with_phases(3).into_draft("coach-1", ProgramFlags::default());

        assert_eq!(draft.phases.len(), 3);
        assert_eq!(
            draft.phases.iter().map(|p| p.phase).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
        assert!(draft.phases.iter().all(|p| p.workouts.len() == 3));
        assert_eq!(draft.created_by, "coach-1");
        assert!(draft.flags.is_active);
    }

    #[test]
    fn test_metadata_counts_outcomes() {
        let mut metadata = GenerationMetadata::start("test", "test-model");
        let usage = Some(TokenUsage {
            input_tokens: 100,
            output_tokens: 50,
        });

        let value = metadata.record(
            Stage::ProgramStructure,
            None,
            StageOutcome::generated(1, usage),
        );
        metadata.record(
            Stage::WorkoutFocus,
            Some(2),
            StageOutcome::defaulted(0, DefaultReason::NoTextContent, usage),
        );

        assert_eq!(value, 1);
        assert_eq!(metadata.generated_stages, 1);
        assert_eq!(metadata.defaulted_stages.len(), 1);
        assert_eq!(metadata.defaulted_stages[0].iteration, Some(2));
        assert_eq!(metadata.usage.total(), 300);
        assert!(metadata.is_personalized());
    }
}
