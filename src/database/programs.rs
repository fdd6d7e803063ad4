// ABOUTME: Atomic persistence of a generated program tree and its read-back
// ABOUTME: Program, one plan per phase, one workout per day, one exercise row per spec with normalized measures
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Program Store
//!
//! `save_program_to_database` writes the whole tree inside one
//! [`SqliteTransactionGuard`]. Any failing statement drops the guard, which
//! rolls back every row written so far, and the failure is returned with
//! `kind`, `target` and `constraint` diagnostics.
//!
//! Measures are stored normalized (minutes become seconds). The legacy
//! integer reps value is not stored; it is derived when rows are read.

use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::{error, info, instrument};
use uuid::Uuid;

use pierre_program_core::constants::persistence::{
    INITIAL_BODY_FAT_PERCENTAGE, INITIAL_MUSCLE_MASS_DISTRIBUTION,
};
use pierre_program_core::models::{
    legacy_reps, normalize_measure, ExerciseSpec, MeasureType, MeasureUnit, PersistedExercise,
    PersistedProgram, PersistedWorkout, PersistedWorkoutPlan, PhaseDraft, ProgramDraft,
    SessionBlock, WorkoutDraft,
};

use super::exercise_library::resolve_entry;
use super::transactions::SqliteTransactionGuard;
use crate::errors::{classify_sqlx_error, AppError, AppResult};

/// Program tree storage
pub struct ProgramStore {
    pool: SqlitePool,
}

/// Wrap a failed statement as a persistence violation on `target`, logging it
fn write_failure(target: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
    move |err| {
        let diagnostics = classify_sqlx_error(&err);
        let kind = diagnostics.kind.as_str();
        let constraint = diagnostics.constraint.as_deref();
        error!(
            kind,
            write_target = target,
            constraint,
            detail = %diagnostics.message,
            "Program write aborted; transaction rolled back"
        );
        AppError::persistence(kind, target, constraint).with_source(err)
    }
}

fn combined_notes(spec: &ExerciseSpec) -> Option<String> {
    let combined = [spec.intensity.as_deref(), spec.notes.as_deref()]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    (!combined.is_empty()).then_some(combined)
}

fn to_u32(value: i64) -> u32 {
    u32::try_from(value).unwrap_or_default()
}

fn parse_uuid(value: &str) -> AppResult<Uuid> {
    Uuid::parse_str(value).map_err(|e| AppError::internal(format!("Invalid UUID: {e}")))
}

fn validate_draft(draft: &ProgramDraft) -> AppResult<()> {
    if draft.name.trim().is_empty() {
        return Err(AppError::invalid_input("Program name is required"));
    }
    if draft.created_by.trim().is_empty() {
        return Err(AppError::invalid_input("Program author is required"));
    }
    Ok(())
}

impl ProgramStore {
    /// Create a store over a pool
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Persist a complete program tree in one transaction
    ///
    /// # Errors
    ///
    /// Returns [`crate::errors::ErrorCode::InvalidInput`] before any write
    /// when the name or author is blank, and a database error carrying
    /// `kind`/`target`/`constraint` details when any statement fails. No
    /// rows remain after a failure.
    #[instrument(skip_all, fields(program = %draft.name, author = %draft.created_by))]
    pub async fn save_program_to_database(
        &self,
        draft: &ProgramDraft,
    ) -> AppResult<PersistedProgram> {
        validate_draft(draft)?;

        let tx = self.pool.begin().await.map_err(write_failure("transaction"))?;
        let mut guard = SqliteTransactionGuard::new(tx);

        let program_id = Uuid::new_v4();
        let created_at = Utc::now();

        sqlx::query(
            r"
            INSERT INTO programs (id, name, description, created_by, is_template, is_active, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ",
        )
        .bind(program_id.to_string())
        .bind(draft.name.trim())
        .bind(&draft.description)
        .bind(&draft.created_by)
        .bind(draft.flags.is_template)
        .bind(draft.flags.is_active)
        .bind(created_at.to_rfc3339())
        .execute(guard.executor()?)
        .await
        .map_err(write_failure("program"))?;

        let mut workout_plans = Vec::with_capacity(draft.phases.len());
        for phase in &draft.phases {
            let plan = Self::insert_plan(&mut guard, program_id, &draft.created_by, phase).await?;
            workout_plans.push(plan);
        }

        guard.commit().await?;

        let program = PersistedProgram {
            id: program_id,
            name: draft.name.trim().to_owned(),
            description: draft.description.clone(),
            created_by: draft.created_by.clone(),
            is_template: draft.flags.is_template,
            is_active: draft.flags.is_active,
            created_at,
            workout_plans,
        };
        info!(
            program_id = %program.id,
            plans = program.workout_plans.len(),
            exercises = program.exercise_count(),
            "Program persisted"
        );
        Ok(program)
    }

    async fn insert_plan(
        guard: &mut SqliteTransactionGuard<'_>,
        program_id: Uuid,
        user_id: &str,
        phase: &PhaseDraft,
    ) -> AppResult<PersistedWorkoutPlan> {
        let plan_id = Uuid::new_v4();
        let days_per_week = u32::try_from(phase.workouts.len()).unwrap_or(u32::MAX);
        let key_points_json = serde_json::to_string(&phase.detail.phase_key_points)?;

        sqlx::query(
            r"
            INSERT INTO workout_plans (
                id, program_id, user_id, phase, duration_weeks, split_type,
                body_fat_percentage, muscle_mass_distribution, daily_calories,
                protein_grams, carb_grams, fat_grams, days_per_week,
                phase_explanation, phase_expectations, phase_key_points
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            ",
        )
        .bind(plan_id.to_string())
        .bind(program_id.to_string())
        .bind(user_id)
        .bind(i64::from(phase.phase))
        .bind(i64::from(phase.duration_weeks))
        .bind(&phase.detail.split_type)
        .bind(INITIAL_BODY_FAT_PERCENTAGE)
        .bind(INITIAL_MUSCLE_MASS_DISTRIBUTION)
        .bind(i64::from(phase.nutrition.daily_calories))
        .bind(i64::from(phase.nutrition.macros.protein))
        .bind(i64::from(phase.nutrition.macros.carbs))
        .bind(i64::from(phase.nutrition.macros.fats))
        .bind(i64::from(days_per_week))
        .bind(&phase.detail.phase_explanation)
        .bind(&phase.detail.phase_expectations)
        .bind(&key_points_json)
        .execute(guard.executor()?)
        .await
        .map_err(write_failure("workout_plan"))?;

        let mut workouts = Vec::with_capacity(phase.workouts.len());
        for workout in &phase.workouts {
            workouts.push(Self::insert_workout(guard, plan_id, workout).await?);
        }

        Ok(PersistedWorkoutPlan {
            id: plan_id,
            user_id: user_id.to_owned(),
            phase: phase.phase,
            duration_weeks: phase.duration_weeks,
            split_type: phase.detail.split_type.clone(),
            body_fat_percentage: INITIAL_BODY_FAT_PERCENTAGE,
            muscle_mass_distribution: INITIAL_MUSCLE_MASS_DISTRIBUTION.to_owned(),
            daily_calories: phase.nutrition.daily_calories,
            protein_grams: phase.nutrition.macros.protein,
            carb_grams: phase.nutrition.macros.carbs,
            fat_grams: phase.nutrition.macros.fats,
            days_per_week,
            phase_explanation: phase.detail.phase_explanation.clone(),
            phase_expectations: phase.detail.phase_expectations.clone(),
            phase_key_points: phase.detail.phase_key_points.clone(),
            workouts,
        })
    }

    async fn insert_workout(
        guard: &mut SqliteTransactionGuard<'_>,
        plan_id: Uuid,
        workout: &WorkoutDraft,
    ) -> AppResult<PersistedWorkout> {
        let workout_id = Uuid::new_v4();
        let focus = &workout.focus;
        let warmup_json = serde_json::to_string(&focus.warmup)?;
        let cooldown_json = serde_json::to_string(&focus.cooldown)?;

        sqlx::query(
            r"
            INSERT INTO workouts (
                id, workout_plan_id, name, day_number, focus, structure_type, warmup, cooldown
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ",
        )
        .bind(workout_id.to_string())
        .bind(plan_id.to_string())
        .bind(&focus.name)
        .bind(i64::from(focus.day_number))
        .bind(&focus.focus)
        .bind(&focus.structure_type)
        .bind(&warmup_json)
        .bind(&cooldown_json)
        .execute(guard.executor()?)
        .await
        .map_err(write_failure("workout"))?;

        let mut exercises = Vec::with_capacity(workout.exercises.len());
        for (sort_order, spec) in workout.exercises.iter().enumerate() {
            let sort_order = u32::try_from(sort_order).unwrap_or(u32::MAX);
            exercises.push(Self::insert_exercise(guard, workout_id, sort_order, spec).await?);
        }

        Ok(PersistedWorkout {
            id: workout_id,
            name: focus.name.clone(),
            day_number: focus.day_number,
            focus: focus.focus.clone(),
            structure_type: focus.structure_type.clone(),
            warmup: focus.warmup.clone(),
            cooldown: focus.cooldown.clone(),
            exercises,
        })
    }

    async fn insert_exercise(
        guard: &mut SqliteTransactionGuard<'_>,
        workout_id: Uuid,
        sort_order: u32,
        spec: &ExerciseSpec,
    ) -> AppResult<PersistedExercise> {
        let name = spec.name.trim();
        let library_id = resolve_entry(guard.executor()?, name, spec.category)
            .await
            .map_err(write_failure("exercise_library"))?;

        let exercise_id = Uuid::new_v4();
        let measure = normalize_measure(&spec.measure);
        let rest_period = spec.rest_period.round().max(0.0) as i64;
        let notes = combined_notes(spec);

        sqlx::query(
            r"
            INSERT INTO exercises (
                id, workout_id, exercise_library_id, name, sets, rest_period,
                measure_type, measure_value, measure_unit, notes, sort_order,
                environment, equipment, alternatives, instructions
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            ",
        )
        .bind(exercise_id.to_string())
        .bind(workout_id.to_string())
        .bind(library_id.to_string())
        .bind(name)
        .bind(i64::from(spec.sets))
        .bind(rest_period)
        .bind(measure.measure_type.as_db_str())
        .bind(measure.value)
        .bind(measure.unit.as_ref().map(MeasureUnit::as_db_str))
        .bind(notes.as_deref())
        .bind(i64::from(sort_order))
        .bind(&spec.environment)
        .bind(serde_json::to_string(&spec.equipment)?)
        .bind(serde_json::to_string(&spec.alternatives)?)
        .bind(serde_json::to_string(&spec.instructions)?)
        .execute(guard.executor()?)
        .await
        .map_err(write_failure("exercise"))?;

        Ok(PersistedExercise {
            id: exercise_id,
            exercise_library_id: library_id,
            name: name.to_owned(),
            sets: spec.sets,
            rest_period,
            measure_type: measure.measure_type,
            measure_value: measure.value,
            measure_unit: measure.unit,
            reps: legacy_reps(measure.measure_type, measure.value),
            notes,
            sort_order,
            environment: spec.environment.clone(),
            equipment: spec.equipment.clone(),
            alternatives: spec.alternatives.clone(),
            instructions: spec.instructions.clone(),
        })
    }

    /// Read a persisted program tree
    ///
    /// # Errors
    ///
    /// Returns an error if a query fails or a stored row cannot be decoded
    pub async fn get_program(&self, program_id: Uuid) -> AppResult<Option<PersistedProgram>> {
        let row = sqlx::query(
            r"
            SELECT id, name, description, created_by, is_template, is_active, created_at
            FROM programs
            WHERE id = $1
            ",
        )
        .bind(program_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get program: {e}")))?;

        let Some(row) = row else {
            return Ok(None);
        };
        let mut program = row_to_program(&row)?;

        let plan_rows = sqlx::query(
            r"
            SELECT id, user_id, phase, duration_weeks, split_type, body_fat_percentage,
                   muscle_mass_distribution, daily_calories, protein_grams, carb_grams,
                   fat_grams, days_per_week, phase_explanation, phase_expectations,
                   phase_key_points
            FROM workout_plans
            WHERE program_id = $1
            ORDER BY phase
            ",
        )
        .bind(program_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get workout plans: {e}")))?;

        for plan_row in &plan_rows {
            let mut plan = row_to_plan(plan_row)?;
            plan.workouts = self.get_workouts(plan.id).await?;
            program.workout_plans.push(plan);
        }

        Ok(Some(program))
    }

    async fn get_workouts(&self, plan_id: Uuid) -> AppResult<Vec<PersistedWorkout>> {
        let rows = sqlx::query(
            r"
            SELECT id, name, day_number, focus, structure_type, warmup, cooldown
            FROM workouts
            WHERE workout_plan_id = $1
            ORDER BY day_number
            ",
        )
        .bind(plan_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get workouts: {e}")))?;

        let mut workouts = Vec::with_capacity(rows.len());
        for row in &rows {
            let mut workout = row_to_workout(row)?;
            workout.exercises = self.get_exercises(workout.id).await?;
            workouts.push(workout);
        }
        Ok(workouts)
    }

    async fn get_exercises(&self, workout_id: Uuid) -> AppResult<Vec<PersistedExercise>> {
        let rows = sqlx::query(
            r"
            SELECT id, exercise_library_id, name, sets, rest_period, measure_type,
                   measure_value, measure_unit, notes, sort_order, environment,
                   equipment, alternatives, instructions
            FROM exercises
            WHERE workout_id = $1
            ORDER BY sort_order
            ",
        )
        .bind(workout_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get exercises: {e}")))?;

        rows.iter().map(row_to_exercise).collect()
    }
}

fn row_to_program(row: &SqliteRow) -> AppResult<PersistedProgram> {
    let id_str: String = row.get("id");
    let created_at_str: String = row.get("created_at");

    Ok(PersistedProgram {
        id: parse_uuid(&id_str)?,
        name: row.get("name"),
        description: row.get("description"),
        created_by: row.get("created_by"),
        is_template: row.get("is_template"),
        is_active: row.get("is_active"),
        created_at: DateTime::parse_from_rfc3339(&created_at_str)
            .map_err(|e| AppError::internal(format!("Invalid datetime: {e}")))?
            .with_timezone(&Utc),
        workout_plans: Vec::new(),
    })
}

fn row_to_plan(row: &SqliteRow) -> AppResult<PersistedWorkoutPlan> {
    let id_str: String = row.get("id");
    let key_points_json: String = row.get("phase_key_points");

    Ok(PersistedWorkoutPlan {
        id: parse_uuid(&id_str)?,
        user_id: row.get("user_id"),
        phase: to_u32(row.get("phase")),
        duration_weeks: to_u32(row.get("duration_weeks")),
        split_type: row.get("split_type"),
        body_fat_percentage: row.get("body_fat_percentage"),
        muscle_mass_distribution: row.get("muscle_mass_distribution"),
        daily_calories: to_u32(row.get("daily_calories")),
        protein_grams: to_u32(row.get("protein_grams")),
        carb_grams: to_u32(row.get("carb_grams")),
        fat_grams: to_u32(row.get("fat_grams")),
        days_per_week: to_u32(row.get("days_per_week")),
        phase_explanation: row.get("phase_explanation"),
        phase_expectations: row.get("phase_expectations"),
        phase_key_points: serde_json::from_str(&key_points_json)?,
        workouts: Vec::new(),
    })
}

fn row_to_workout(row: &SqliteRow) -> AppResult<PersistedWorkout> {
    let id_str: String = row.get("id");
    let warmup_json: String = row.get("warmup");
    let cooldown_json: String = row.get("cooldown");
    let warmup: SessionBlock = serde_json::from_str(&warmup_json)?;
    let cooldown: SessionBlock = serde_json::from_str(&cooldown_json)?;

    Ok(PersistedWorkout {
        id: parse_uuid(&id_str)?,
        name: row.get("name"),
        day_number: to_u32(row.get("day_number")),
        focus: row.get("focus"),
        structure_type: row.get("structure_type"),
        warmup,
        cooldown,
        exercises: Vec::new(),
    })
}

fn row_to_exercise(row: &SqliteRow) -> AppResult<PersistedExercise> {
    let id_str: String = row.get("id");
    let library_id_str: String = row.get("exercise_library_id");
    let measure_type_str: String = row.get("measure_type");
    let measure_unit_str: Option<String> = row.get("measure_unit");
    let equipment_json: String = row.get("equipment");
    let alternatives_json: String = row.get("alternatives");
    let instructions_json: String = row.get("instructions");

    let measure_type = MeasureType::from_db_str(&measure_type_str).ok_or_else(|| {
        AppError::internal(format!("Invalid measure type: {measure_type_str}"))
    })?;
    let measure_value: f64 = row.get("measure_value");

    Ok(PersistedExercise {
        id: parse_uuid(&id_str)?,
        exercise_library_id: parse_uuid(&library_id_str)?,
        name: row.get("name"),
        sets: to_u32(row.get("sets")),
        rest_period: row.get("rest_period"),
        measure_type,
        measure_value,
        measure_unit: measure_unit_str.as_deref().and_then(MeasureUnit::from_db_str),
        reps: legacy_reps(measure_type, measure_value),
        notes: row.get("notes"),
        sort_order: to_u32(row.get("sort_order")),
        environment: row.get("environment"),
        equipment: serde_json::from_str(&equipment_json)?,
        alternatives: serde_json::from_str(&alternatives_json)?,
        instructions: serde_json::from_str(&instructions_json)?,
    })
}
