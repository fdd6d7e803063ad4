// ABOUTME: SQLite connection pool and schema for persisted programs
// ABOUTME: Programs, workout plans, workouts, exercises and the shared exercise library
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Database Management
//!
//! Schema is created on connect with `CREATE TABLE IF NOT EXISTS`. Child rows
//! cascade on delete. Exercise library names are unique, which is what makes
//! look-up-or-create safe under concurrent writers.

/// Shared exercise library
pub mod exercise_library;
/// Program tree persistence
pub mod programs;
/// Transaction guard
pub mod transactions;

pub use exercise_library::ExerciseLibrary;
pub use programs::ProgramStore;
pub use transactions::{SqliteTransactionGuard, TransactionGuard};

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use tracing::{debug, info};

use crate::config::DatabaseUrl;
use crate::errors::{AppError, AppResult};

/// Pool size for file-backed databases
const MAX_CONNECTIONS: u32 = 5;

/// Program database
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Connect and create the schema
    ///
    /// In-memory databases use a single connection so every query sees the
    /// same database.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection or a migration fails
    pub async fn new(url: &DatabaseUrl) -> AppResult<Self> {
        if let DatabaseUrl::SQLite { path } = url {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                tokio::fs::create_dir_all(parent).await.map_err(|e| {
                    AppError::config(format!(
                        "Failed to create database directory {}: {e}",
                        parent.display()
                    ))
                })?;
            }
        }

        let options = SqliteConnectOptions::from_str(&url.to_connection_string())
            .map_err(|e| AppError::config(format!("Invalid database URL {url}: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool_options = if url.is_memory() {
            // Closing the only connection would drop the database
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(MAX_CONNECTIONS)
        };
        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(|e| AppError::database(format!("Failed to connect to {url}: {e}")))?;

        let db = Self { pool };
        db.migrate().await?;
        info!(database = %url, "Program database ready");
        Ok(db)
    }

    /// Connection pool
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Program store over this database
    #[must_use]
    pub fn programs(&self) -> ProgramStore {
        ProgramStore::new(self.pool.clone())
    }

    /// Exercise library over this database
    #[must_use]
    pub fn exercise_library(&self) -> ExerciseLibrary {
        ExerciseLibrary::new(self.pool.clone())
    }

    /// Create every table and index
    ///
    /// # Errors
    ///
    /// Returns an error if a statement fails
    pub async fn migrate(&self) -> AppResult<()> {
        self.migrate_programs().await?;
        self.migrate_exercise_library().await?;
        self.migrate_workouts().await?;
        debug!("Program schema migrated");
        Ok(())
    }

    async fn execute_all(&self, statements: &[&str]) -> AppResult<()> {
        for statement in statements {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(|e| AppError::database(format!("Migration failed: {e}")))?;
        }
        Ok(())
    }

    async fn migrate_programs(&self) -> AppResult<()> {
        self.execute_all(&[
            r"
            CREATE TABLE IF NOT EXISTS programs (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL CHECK (length(trim(name)) > 0),
                description TEXT NOT NULL DEFAULT '',
                created_by TEXT NOT NULL CHECK (length(trim(created_by)) > 0),
                is_template BOOLEAN NOT NULL DEFAULT 0,
                is_active BOOLEAN NOT NULL DEFAULT 1,
                created_at TEXT NOT NULL
            )
            ",
            "CREATE INDEX IF NOT EXISTS idx_programs_created_by ON programs(created_by)",
            r"
            CREATE TABLE IF NOT EXISTS workout_plans (
                id TEXT PRIMARY KEY,
                program_id TEXT NOT NULL REFERENCES programs(id) ON DELETE CASCADE,
                user_id TEXT NOT NULL,
                phase INTEGER NOT NULL CHECK (phase >= 1),
                duration_weeks INTEGER NOT NULL CHECK (duration_weeks >= 1),
                split_type TEXT NOT NULL,
                body_fat_percentage REAL NOT NULL,
                muscle_mass_distribution TEXT NOT NULL,
                daily_calories INTEGER NOT NULL,
                protein_grams INTEGER NOT NULL,
                carb_grams INTEGER NOT NULL,
                fat_grams INTEGER NOT NULL,
                days_per_week INTEGER NOT NULL,
                phase_explanation TEXT NOT NULL,
                phase_expectations TEXT NOT NULL,
                phase_key_points TEXT NOT NULL DEFAULT '[]',
                UNIQUE (program_id, phase)
            )
            ",
            "CREATE INDEX IF NOT EXISTS idx_workout_plans_program ON workout_plans(program_id)",
        ])
        .await
    }

    async fn migrate_exercise_library(&self) -> AppResult<()> {
        self.execute_all(&[r"
            CREATE TABLE IF NOT EXISTS exercise_library (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL UNIQUE,
                category TEXT NOT NULL,
                created_at TEXT NOT NULL
            )
            "])
        .await
    }

    async fn migrate_workouts(&self) -> AppResult<()> {
        self.execute_all(&[
            r"
            CREATE TABLE IF NOT EXISTS workouts (
                id TEXT PRIMARY KEY,
                workout_plan_id TEXT NOT NULL REFERENCES workout_plans(id) ON DELETE CASCADE,
                name TEXT NOT NULL,
                day_number INTEGER NOT NULL CHECK (day_number >= 1),
                focus TEXT NOT NULL,
                structure_type TEXT NOT NULL,
                warmup TEXT NOT NULL,
                cooldown TEXT NOT NULL
            )
            ",
            "CREATE INDEX IF NOT EXISTS idx_workouts_plan ON workouts(workout_plan_id)",
            r"
            CREATE TABLE IF NOT EXISTS exercises (
                id TEXT PRIMARY KEY,
                workout_id TEXT NOT NULL REFERENCES workouts(id) ON DELETE CASCADE,
                exercise_library_id TEXT NOT NULL REFERENCES exercise_library(id),
                name TEXT NOT NULL,
                sets INTEGER NOT NULL CHECK (sets >= 1),
                rest_period INTEGER NOT NULL CHECK (rest_period >= 0),
                measure_type TEXT NOT NULL CHECK (measure_type IN ('REPS', 'TIME', 'DISTANCE')),
                measure_value REAL NOT NULL,
                measure_unit TEXT CHECK (measure_unit IS NULL OR measure_unit IN ('SECONDS', 'METERS', 'KILOMETERS')),
                notes TEXT,
                sort_order INTEGER NOT NULL,
                environment TEXT NOT NULL,
                equipment TEXT NOT NULL DEFAULT '[]',
                alternatives TEXT NOT NULL DEFAULT '[]',
                instructions TEXT NOT NULL DEFAULT '[]'
            )
            ",
            "CREATE INDEX IF NOT EXISTS idx_exercises_workout ON exercises(workout_id)",
            "CREATE INDEX IF NOT EXISTS idx_exercises_library ON exercises(exercise_library_id)",
        ])
        .await
    }
}
