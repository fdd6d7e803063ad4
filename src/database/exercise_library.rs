// ABOUTME: Shared exercise library keyed by unique exercise name
// ABOUTME: Idempotent look-up-or-create used inside program writes; first writer's category wins
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection, SqlitePool};
use uuid::Uuid;

use pierre_program_core::models::{ExerciseCategory, ExerciseLibraryEntry};

use crate::errors::{AppError, AppResult};

/// Read access to the exercise library
pub struct ExerciseLibrary {
    pool: SqlitePool,
}

impl ExerciseLibrary {
    /// Create a library handle
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Entry with exactly this name
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the row is corrupt
    pub async fn get_by_name(&self, name: &str) -> AppResult<Option<ExerciseLibraryEntry>> {
        let row = sqlx::query("SELECT id, name, category FROM exercise_library WHERE name = $1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get exercise: {e}")))?;

        row.map(|r| row_to_entry(&r)).transpose()
    }

    /// Every entry, ordered by name
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row is corrupt
    pub async fn list(&self) -> AppResult<Vec<ExerciseLibraryEntry>> {
        let rows = sqlx::query("SELECT id, name, category FROM exercise_library ORDER BY name")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to list exercises: {e}")))?;

        rows.iter().map(row_to_entry).collect()
    }
}

/// Id of the entry named `name`, creating it with `category` if absent
///
/// A concurrent creator wins the insert; the conflict is ignored and the
/// existing row is read back.
pub(crate) async fn resolve_entry(
    conn: &mut SqliteConnection,
    name: &str,
    category: ExerciseCategory,
) -> Result<Uuid, sqlx::Error> {
    sqlx::query(
        r"
        INSERT INTO exercise_library (id, name, category, created_at)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT(name) DO NOTHING
        ",
    )
    .bind(Uuid::new_v4().to_string())
    .bind(name)
    .bind(category.as_str())
    .bind(Utc::now().to_rfc3339())
    .execute(&mut *conn)
    .await?;

    let id: String = sqlx::query_scalar("SELECT id FROM exercise_library WHERE name = $1")
        .bind(name)
        .fetch_one(&mut *conn)
        .await?;

    Uuid::parse_str(&id).map_err(|e| sqlx::Error::Decode(Box::new(e)))
}

fn row_to_entry(row: &SqliteRow) -> AppResult<ExerciseLibraryEntry> {
    let id_str: String = row.get("id");
    let category_str: String = row.get("category");

    Ok(ExerciseLibraryEntry {
        id: Uuid::parse_str(&id_str)
            .map_err(|e| AppError::internal(format!("Invalid UUID: {e}")))?,
        name: row.get("name"),
        category: ExerciseCategory::parse(&category_str),
    })
}
