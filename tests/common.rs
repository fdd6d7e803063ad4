// ABOUTME: Shared helpers for integration tests
// ABOUTME: Quiet logging, in-memory databases, and a scripted reasoning client keyed by stage
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(dead_code)]
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, Once};

use pierre_programs::config::DatabaseUrl;
use pierre_programs::database::Database;
use pierre_programs::errors::AppError;
use pierre_programs::generation::Stage;
use pierre_programs::llm::{
    LlmCapabilities, MessageEnvelope, MessageRole, ReasoningClient, ReasoningRequest, TokenUsage,
};

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Fresh in-memory database with the schema applied
pub async fn create_test_database() -> Database {
    init_test_logging();
    Database::new(&DatabaseUrl::Memory).await.unwrap()
}

/// Identify the stage a request was built for from its user message
pub fn stage_of(request: &ReasoningRequest) -> Stage {
    let content = request
        .messages
        .iter()
        .rev()
        .find(|m| m.role == MessageRole::User)
        .map(|m| m.content.as_str())
        .unwrap_or_default();

    if content.starts_with("Based on the following client data, create a program structure") {
        Stage::ProgramStructure
    } else if content.starts_with("Based on the following client data and program structure") {
        Stage::WorkoutStructure
    } else if content.starts_with("Create a workout focus") {
        Stage::WorkoutFocus
    } else if content.starts_with("Create phase details") {
        Stage::PhaseDetails
    } else if content.starts_with("Create a nutrition plan") {
        Stage::PhaseNutrition
    } else if content.starts_with("Review the complete program") {
        Stage::FinalReview
    } else {
        Stage::Exercises
    }
}

/// Day number of a workout focus request
fn focus_day(request: &ReasoningRequest) -> Option<u32> {
    let content = &request.messages.last()?.content;
    let rest = content.strip_prefix("Create a workout focus for day ")?;
    rest.split_whitespace().next()?.parse().ok()
}

/// One recorded call
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub stage: Stage,
    pub caller: String,
    pub model: Option<String>,
    pub json_output: bool,
    pub user_content: String,
}

/// Reasoning client that replays canned text per stage
///
/// Stages without a script answer with undecodable prose; failing stages
/// return a service error.
#[derive(Default)]
pub struct ScriptedReasoningClient {
    responses: HashMap<Stage, String>,
    failures: HashSet<Stage>,
    capabilities: LlmCapabilities,
    staggered: bool,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedReasoningClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, stage: Stage, text: impl Into<String>) -> Self {
        self.responses.insert(stage, text.into());
        self
    }

    pub fn fail(mut self, stage: Stage) -> Self {
        self.failures.insert(stage);
        self
    }

    pub fn with_capabilities(mut self, capabilities: LlmCapabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// Answer earlier days more slowly so completions arrive out of order
    pub fn staggered(mut self) -> Self {
        self.staggered = true;
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_for(&self, stage: Stage) -> Vec<RecordedCall> {
        self.calls()
            .into_iter()
            .filter(|call| call.stage == stage)
            .collect()
    }
}

#[async_trait]
impl ReasoningClient for ScriptedReasoningClient {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn capabilities(&self) -> LlmCapabilities {
        self.capabilities
    }

    fn default_model(&self) -> &str {
        "scripted-model"
    }

    async fn send(
        &self,
        request: &ReasoningRequest,
        caller: &str,
    ) -> Result<MessageEnvelope, AppError> {
        let stage = stage_of(request);
        self.calls.lock().unwrap().push(RecordedCall {
            stage,
            caller: caller.to_owned(),
            model: request.model.clone(),
            json_output: request.json_output,
            user_content: request
                .messages
                .last()
                .map(|m| m.content.clone())
                .unwrap_or_default(),
        });

        if self.staggered {
            if let Some(day) = focus_day(request) {
                let delay = 10 * u64::from(8_u32.saturating_sub(day));
                tokio::time::sleep(std::time::Duration::from_millis(delay)).await;
            }
        }

        if self.failures.contains(&stage) {
            return Err(AppError::external_unavailable("scripted", "service down"));
        }

        let text = self
            .responses
            .get(&stage)
            .cloned()
            .unwrap_or_else(|| "Sorry, I can only chat about fitness in prose today.".to_owned());
        let mut envelope = MessageEnvelope::from_text("scripted-model", text);
        envelope.usage = Some(TokenUsage {
            input_tokens: 10,
            output_tokens: 5,
        });
        Ok(envelope)
    }
}

pub const PROGRAM_STRUCTURE_JSON: &str = r#"{
    "name": "Hypertrophy Builder",
    "description": "Two phases of progressive volume",
    "phaseCount": 2,
    "phaseDurations": [4, 6],
    "phaseProgression": ["Accumulation", "Intensification"],
    "overallGoals": ["Add lean mass"]
}"#;

pub const WORKOUT_STRUCTURE_JSON: &str = r#"{
    "daysPerWeek": 4,
    "sessionDuration": 75,
    "workoutStyle": {"primary": "hypertrophy", "secondary": "strength"},
    "workoutDistribution": ["Upper", "Lower", "Upper", "Lower"],
    "exerciseSelectionRules": {
        "exercisesPerWorkout": 5,
        "defaultRestPeriod": 120,
        "preferredMeasureType": "reps"
    }
}"#;

pub const WORKOUT_FOCUS_JSON: &str = r#"{
    "name": "Upper Push",
    "focus": "Chest, shoulders and triceps",
    "warmup": {"duration": 10, "activities": ["Band pull-aparts", "Arm circles"]},
    "cooldown": {"duration": 5, "activities": ["Chest stretch"]},
    "dayNumber": 1,
    "targetExerciseCount": 4,
    "structureType": "straight_sets"
}"#;

/// Deliberately out of category order, with a timed finisher in minutes
pub const EXERCISES_JSON: &str = r#"```json
{
    "exercises": [
        {"name": "Cable Fly", "sets": 3, "category": "isolation", "environment": "gym",
         "measure": {"type": "reps", "value": 12}, "restPeriod": 60,
         "equipment": ["Cable Machine"], "alternatives": ["Dumbbell Fly"],
         "instructions": ["Soft elbows"]},
        {"name": "Bench Press", "sets": 4, "category": "primary", "environment": "gym",
         "measure": {"type": "reps", "value": 8}, "restPeriod": 150,
         "equipment": ["Barbell", "bench"], "alternatives": ["Dumbbell Press"],
         "intensity": "RPE 8", "notes": "Pause on the chest",
         "instructions": ["Retract shoulder blades", "Drive feet into floor"]},
        {"name": "Rower Finisher", "sets": 1, "category": "cardio", "environment": "gym",
         "measure": {"type": "time", "value": 3, "unit": "minutes"}, "restPeriod": 0,
         "equipment": ["Rower"]},
        {"name": "Incline Dumbbell Press", "sets": 3, "category": "secondary", "environment": "gym",
         "measure": {"type": "reps", "value": 10}, "restPeriod": 90.4,
         "equipment": ["dumbbells"]}
    ]
}
```"#;

pub const PHASE_DETAIL_JSON: &str = r#"{
    "phaseExplanation": "Accumulate volume",
    "phaseExpectations": "Expect soreness early",
    "phaseKeyPoints": ["Log every set"],
    "splitType": "Upper/Lower"
}"#;

pub const PHASE_NUTRITION_JSON: &str = r#"{
    "dailyCalories": 2800,
    "macros": {"protein": 190, "carbs": 320, "fats": 80}
}"#;

pub const FINAL_REVIEW_JSON: &str = r#"{
    "isComplete": true,
    "isSafe": true,
    "meetsClientNeeds": true,
    "suggestedAdjustments": [],
    "warnings": ["Warm up the shoulders thoroughly"],
    "finalRecommendations": ["Reassess after phase one"]
}"#;

/// Client answering every stage with a well-formed response
pub fn fully_scripted_client() -> ScriptedReasoningClient {
    ScriptedReasoningClient::new()
        .respond(Stage::ProgramStructure, PROGRAM_STRUCTURE_JSON)
        .respond(Stage::WorkoutStructure, WORKOUT_STRUCTURE_JSON)
        .respond(Stage::WorkoutFocus, WORKOUT_FOCUS_JSON)
        .respond(Stage::Exercises, EXERCISES_JSON)
        .respond(Stage::PhaseDetails, PHASE_DETAIL_JSON)
        .respond(Stage::PhaseNutrition, PHASE_NUTRITION_JSON)
        .respond(Stage::FinalReview, FINAL_REVIEW_JSON)
}
