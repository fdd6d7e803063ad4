// ABOUTME: Per-stage request builders embedding intake data, prior stage output and a JSON contract
// ABOUTME: Pure functions; the coach system prompt is loaded at compile time from markdown
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Stage Prompts
//!
//! Each builder returns the system prompt followed by one user message. The
//! user message carries the intake subset the stage needs, every prior
//! structure it depends on, and the exact JSON shape expected back.
//! Ordering and environment rules live in the prompt text only; the
//! sequencer is the sole mechanical check on the answer.

use serde::Serialize;

use pierre_program_core::models::{
    EnvironmentPreference, EquipmentAccess, ExerciseSelectionRules, ExperienceLevel,
    IntakeRecord, ProgramStructure, WorkoutFocus, WorkoutStructure,
};

use super::generated::GeneratedProgram;
use super::outcome::Stage;
use crate::llm::{ChatMessage, MessageRole};

/// Coach persona, output rules and prompt-injection guard
pub const PROGRAM_COACH_SYSTEM_PROMPT: &str = include_str!("program_coach.md");

const PROGRAM_STRUCTURE_CONTRACT: &str = r#"{
  "name": string,
  "description": string,
  "phaseCount": number,
  "phaseDurations": number[],
  "phaseProgression": string[],
  "overallGoals": string[]
}"#;

const WORKOUT_STRUCTURE_CONTRACT: &str = r#"{
  "daysPerWeek": number,
  "sessionDuration": number,
  "workoutStyle": { "primary": string, "secondary": string | null },
  "workoutDistribution": string[],
  "exerciseSelectionRules": {
    "exercisesPerWorkout": number,
    "defaultRestPeriod": number,
    "preferredMeasureType": "reps" | "time" | "distance"
  }
}"#;

const WORKOUT_FOCUS_CONTRACT: &str = r#"{
  "name": string,
  "focus": string,
  "warmup": { "duration": number, "activities": string[] },
  "cooldown": { "duration": number, "activities": string[] },
  "dayNumber": number,
  "targetExerciseCount": number,
  "structureType": "straight_sets" | "supersets" | "circuit"
}"#;

const EXERCISES_CONTRACT: &str = r#"{
  "exercises": [
    {
      "name": string,
      "sets": number,
      "category": "primary" | "secondary" | "isolation" | "other",
      "environment": string,
      "measure": { "type": "reps" | "time" | "distance", "value": number, "unit": "seconds" | "minutes" | "meters" | "km" | null },
      "restPeriod": number,
      "equipment": string[],
      "alternatives": string[],
      "intensity": string | null,
      "notes": string | null,
      "instructions": string[]
    }
  ]
}"#;

const PHASE_DETAIL_CONTRACT: &str = r#"{
  "phaseExplanation": string,
  "phaseExpectations": string,
  "phaseKeyPoints": string[],
  "splitType": string
}"#;

const PHASE_NUTRITION_CONTRACT: &str = r#"{
  "dailyCalories": number,
  "macros": { "protein": number, "carbs": number, "fats": number }
}"#;

const FINAL_REVIEW_CONTRACT: &str = r#"{
  "isComplete": boolean,
  "isSafe": boolean,
  "meetsClientNeeds": boolean,
  "suggestedAdjustments": string[],
  "warnings": string[],
  "finalRecommendations": string[]
}"#;

/// Messages for one stage call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagePrompt {
    /// Stage the messages are for
    pub stage: Stage,
    /// System prompt followed by the stage request
    pub messages: Vec<ChatMessage>,
}

impl StagePrompt {
    fn new(stage: Stage, body: String) -> Self {
        Self {
            stage,
            messages: vec![
                ChatMessage::system(PROGRAM_COACH_SYSTEM_PROMPT),
                ChatMessage::user(body),
            ],
        }
    }

    /// Text of the stage request
    #[must_use]
    pub fn user_content(&self) -> &str {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == MessageRole::User)
            .map_or("", |m| m.content.as_str())
    }
}

/// Intake subset used when choosing a day's focus
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FocusContext<'a> {
    goals: &'a str,
    experience: ExperienceLevel,
    preferences: &'a [String],
    injuries: &'a [String],
    days_per_week: u32,
    session_duration: u32,
    workout_style: &'a str,
    distribution: &'a [String],
    phase_progression: &'a [String],
}

/// Intake subset used when selecting exercises
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ExerciseContext<'a> {
    goals: &'a str,
    experience: ExperienceLevel,
    preferences: &'a [String],
    injuries: &'a [String],
    environment: &'a EnvironmentPreference,
    equipment: &'a EquipmentAccess,
    exercise_rules: &'a ExerciseSelectionRules,
    session_duration: u32,
    focus: &'a str,
    structure_type: &'a str,
    count: u32,
}

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_owned())
}

fn json_reply(contract: &str) -> String {
    format!("Provide a response ONLY in the following JSON format:\n{contract}")
}

/// Stage 1: overall program shape from the intake alone
#[must_use]
pub fn program_structure(intake: &IntakeRecord) -> StagePrompt {
    let body = format!(
        "Based on the following client data, create a program structure. \
         Use between 1 and 6 phases of 1 to 12 weeks each; phaseDurations must \
         contain exactly phaseCount entries.\n\
         CLIENT DATA:\n{}\n\n{}",
        to_json(intake),
        json_reply(PROGRAM_STRUCTURE_CONTRACT)
    );
    StagePrompt::new(Stage::ProgramStructure, body)
}

/// Stage 2: weekly layout
#[must_use]
pub fn workout_structure(intake: &IntakeRecord, program: &ProgramStructure) -> StagePrompt {
    let days_hint = intake.days_available.map_or_else(String::new, |days| {
        format!(" The client is available {days} days per week.")
    });
    let body = format!(
        "Based on the following client data and program structure, create a weekly \
         workout structure.{days_hint} workoutDistribution lists the focus of each \
         training day in order.\n\
         CLIENT DATA:\n{}\n\
         Program Structure: {}\n\n{}",
        to_json(intake),
        to_json(program),
        json_reply(WORKOUT_STRUCTURE_CONTRACT)
    );
    StagePrompt::new(Stage::WorkoutStructure, body)
}

/// Stage 3: one training day
#[must_use]
pub fn workout_focus(
    intake: &IntakeRecord,
    program: &ProgramStructure,
    workout: &WorkoutStructure,
    day_number: u32,
) -> StagePrompt {
    let context = FocusContext {
        goals: &intake.training_goal,
        experience: intake.experience_level,
        preferences: &intake.preferences,
        injuries: &intake.injuries,
        days_per_week: workout.days_per_week,
        session_duration: workout.session_duration,
        workout_style: &workout.workout_style.primary,
        distribution: &workout.workout_distribution,
        phase_progression: &program.phase_progression,
    };
    let body = format!(
        "Create a workout focus for day {day_number} of {} based on:\n\
         CLIENT DATA:\n{}\n\n\
         dayNumber must be {day_number}. targetExerciseCount should be close to {}.\n{}",
        workout.days_per_week,
        to_json(&context),
        workout.exercise_selection_rules.exercises_per_workout,
        json_reply(WORKOUT_FOCUS_CONTRACT)
    );
    StagePrompt::new(Stage::WorkoutFocus, body)
}

/// Stage 4: exercises for one training day
#[must_use]
pub fn exercises_for_focus(
    intake: &IntakeRecord,
    program: &ProgramStructure,
    workout: &WorkoutStructure,
    focus: &WorkoutFocus,
) -> StagePrompt {
    let context = ExerciseContext {
        goals: &intake.training_goal,
        experience: intake.experience_level,
        preferences: &intake.preferences,
        injuries: &intake.injuries,
        environment: &intake.environment,
        equipment: &intake.equipment,
        exercise_rules: &workout.exercise_selection_rules,
        session_duration: workout.session_duration,
        focus: &focus.focus,
        structure_type: &focus.structure_type,
        count: focus.target_exercise_count,
    };
    let body = format!(
        "Create {} exercises for a {} focused workout ({}) in the \"{}\" program based on:\n\
         CLIENT DATA:\n{}\n\n\
         List primary compound lifts first, then secondary variations, then isolation \
         work, then anything else. Keep exercises for the same environment together. \
         Give at most 5 short instructions per exercise and use sets between 1 and 10 \
         with restPeriod in seconds.\n{}",
        focus.target_exercise_count,
        focus.focus,
        focus.name,
        program.name,
        to_json(&context),
        json_reply(EXERCISES_CONTRACT)
    );
    StagePrompt::new(Stage::Exercises, body)
}

/// Stage 5: narrative for a zero-based phase
#[must_use]
pub fn phase_details(
    intake: &IntakeRecord,
    program: &ProgramStructure,
    workout: &WorkoutStructure,
    phase_index: usize,
) -> StagePrompt {
    let body = format!(
        "Create phase details for phase {} of {} based on:\n\
         CLIENT DATA:\n{}\n\
         Program Structure: {}\n\
         Workout Structure: {}\n\n{}",
        phase_index + 1,
        program.phase_count,
        to_json(intake),
        to_json(program),
        to_json(workout),
        json_reply(PHASE_DETAIL_CONTRACT)
    );
    StagePrompt::new(Stage::PhaseDetails, body)
}

/// Stage 6: nutrition for a zero-based phase
#[must_use]
pub fn phase_nutrition(
    intake: &IntakeRecord,
    program: &ProgramStructure,
    phase_index: usize,
) -> StagePrompt {
    let body = format!(
        "Create a nutrition plan for phase {} of {} based on:\n\
         CLIENT DATA:\n{}\n\
         Program Structure: {}\n\n\
         dailyCalories is kcal per day; macros are grams per day.\n{}",
        phase_index + 1,
        program.phase_count,
        to_json(intake),
        to_json(program),
        json_reply(PHASE_NUTRITION_CONTRACT)
    );
    StagePrompt::new(Stage::PhaseNutrition, body)
}

/// Stage 7: review of the assembled program
#[must_use]
pub fn final_review(intake: &IntakeRecord, program: &GeneratedProgram) -> StagePrompt {
    let body = format!(
        "Review the complete program for completeness, safety and fit with the client.\n\
         CLIENT DATA:\n{}\n\
         Program Structure: {}\n\
         Workout Structure: {}\n\
         Weekly Workouts: {}\n\
         Phases: {}\n\n{}",
        to_json(intake),
        to_json(&program.structure),
        to_json(&program.workout_structure),
        to_json(&program.workouts),
        to_json(&program.phases),
        json_reply(FINAL_REVIEW_CONTRACT)
    );
    StagePrompt::new(Stage::FinalReview, body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::defaults;

    #[test]
    fn test_every_prompt_starts_with_system_message() {
        let intake = IntakeRecord::new("hypertrophy");
        let prompt = program_structure(&intake);

        assert_eq!(prompt.stage, Stage::ProgramStructure);
        assert_eq!(prompt.messages.len(), 2);
        assert_eq!(prompt.messages[0].role, MessageRole::System);
        assert_eq!(prompt.messages[0].content, PROGRAM_COACH_SYSTEM_PROMPT);
        assert_eq!(prompt.messages[1].role, MessageRole::User);
    }

    #[test]
    fn test_program_structure_embeds_intake_and_contract() {
        let intake = IntakeRecord::new("hypertrophy").with_days_available(4);
        let prompt = program_structure(&intake);
        let content = prompt.user_content();

        assert!(content.contains("\"trainingGoal\": \"hypertrophy\""));
        assert!(content.contains("\"phaseDurations\": number[]"));
        assert!(content.contains("ONLY in the following JSON format"));
    }

    #[test]
    fn test_workout_structure_mentions_availability() {
        let intake = IntakeRecord::new("hypertrophy").with_days_available(4);
        let program = defaults::program_structure();
        let content = workout_structure(&intake, &program).user_content().to_owned();

        assert!(content.contains("available 4 days per week"));
        assert!(content.contains("Foundation Fitness Program"));
    }

    #[test]
    fn test_focus_prompt_names_day_and_week() {
        let intake = IntakeRecord::new("hypertrophy");
        let program = defaults::program_structure();
        let workout = defaults::workout_structure();
        let prompt = workout_focus(&intake, &program, &workout, 2);

        assert!(prompt.user_content().contains("day 2 of 3"));
        assert!(prompt.user_content().contains("dayNumber must be 2"));
    }

    #[test]
    fn test_phase_prompts_use_one_based_numbering() {
        let intake = IntakeRecord::new("hypertrophy");
        let program = defaults::program_structure();
        let workout = defaults::workout_structure();

        assert!(phase_details(&intake, &program, &workout, 0)
            .user_content()
            .contains("phase 1 of 1"));
        assert!(phase_nutrition(&intake, &program, 0)
            .user_content()
            .contains("phase 1 of 1"));
    }

    #[test]
    fn test_exercise_prompt_carries_ordering_rule() {
        let intake = IntakeRecord::new("hypertrophy");
        let program = defaults::program_structure();
        let workout = defaults::workout_structure();
        let focus = defaults::workout_focus(1, &workout);
        let content = exercises_for_focus(&intake, &program, &workout, &focus)
            .user_content()
            .to_owned();

        assert!(content.contains("primary compound lifts first"));
        assert!(content.contains("\"count\": 6"));
    }
}
