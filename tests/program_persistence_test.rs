// ABOUTME: Integration tests for atomic program persistence and the shared exercise library
// ABOUTME: Verifies unit normalization, rollback on failure, first-writer-wins categories and read-back
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use common::create_test_database;
use pierre_program_core::models::{
    ExerciseCategory, ExerciseSpec, Measure, MeasureType, MeasureUnit, PhaseDraft, ProgramDraft,
    ProgramFlags, WorkoutDraft,
};
use pierre_programs::config::DatabaseUrl;
use pierre_programs::database::Database;
use pierre_programs::errors::ErrorCode;
use pierre_programs::generation::defaults;
use uuid::Uuid;

fn exercise(name: &str, category: ExerciseCategory, measure: Measure) -> ExerciseSpec {
    ExerciseSpec {
        name: name.to_owned(),
        sets: 3,
        category,
        environment: "gym".to_owned(),
        measure,
        rest_period: 90.4,
        equipment: vec!["kettlebell".to_owned()],
        alternatives: vec!["Dumbbell Squat".to_owned()],
        intensity: Some("RPE 7".to_owned()),
        notes: Some("  Stay tall ".to_owned()),
        instructions: vec!["Brace".to_owned()],
    }
}

fn draft(name: &str, author: &str, exercises: Vec<ExerciseSpec>) -> ProgramDraft {
    let workout = defaults::workout_structure();
    ProgramDraft {
        name: name.to_owned(),
        description: "Test program".to_owned(),
        created_by: author.to_owned(),
        flags: ProgramFlags::default(),
        phases: vec![PhaseDraft {
            phase: 1,
            duration_weeks: 4,
            detail: defaults::phase_detail(),
            nutrition: defaults::phase_nutrition(),
            workouts: vec![WorkoutDraft {
                focus: defaults::workout_focus(1, &workout),
                exercises,
            }],
        }],
    }
}

async fn count(database: &Database, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(database.pool())
        .await
        .unwrap()
}

#[tokio::test]
async fn test_time_in_minutes_is_stored_as_seconds() {
    let database = create_test_database().await;
    let draft = draft(
        "Conditioning",
        "coach-1",
        vec![
            exercise("Goblet Squat", ExerciseCategory::Primary, Measure::reps(10.0)),
            exercise("Plank", ExerciseCategory::Other, Measure::time(3.0, "minutes")),
            exercise("Farmer Carry", ExerciseCategory::Other, Measure::distance(40.0, "yards")),
        ],
    );

    let stored = database
        .programs()
        .save_program_to_database(&draft)
        .await
        .unwrap();

    let exercises = &stored.workout_plans[0].workouts[0].exercises;
    let plank = &exercises[1];
    assert_eq!(plank.measure_type, MeasureType::Time);
    assert!((plank.measure_value - 180.0).abs() < f64::EPSILON);
    assert_eq!(plank.measure_unit, Some(MeasureUnit::Seconds));
    assert_eq!(plank.reps, 0);

    assert_eq!(exercises[0].reps, 10);
    assert_eq!(exercises[0].rest_period, 90);
    assert_eq!(exercises[0].notes.as_deref(), Some("RPE 7 Stay tall"));
    assert_eq!(exercises[2].measure_unit, None);

    let orders: Vec<u32> = exercises.iter().map(|e| e.sort_order).collect();
    assert_eq!(orders, vec![0, 1, 2]);

    let (value, unit): (f64, String) = sqlx::query_as(
        "SELECT measure_value, measure_unit FROM exercises WHERE name = 'Plank'",
    )
    .fetch_one(database.pool())
    .await
    .unwrap();
    assert!((value - 180.0).abs() < f64::EPSILON);
    assert_eq!(unit, "SECONDS");
}

#[tokio::test]
async fn test_failed_exercise_insert_leaves_no_rows() {
    let database = create_test_database().await;
    sqlx::query(
        r"
        CREATE TRIGGER reject_boom BEFORE INSERT ON exercises
        WHEN NEW.name = 'Boom'
        BEGIN
            SELECT RAISE(ABORT, 'forced failure');
        END
        ",
    )
    .execute(database.pool())
    .await
    .unwrap();

    let draft = draft(
        "Doomed",
        "coach-2",
        vec![
            exercise("Deadlift", ExerciseCategory::Primary, Measure::reps(5.0)),
            exercise("Boom", ExerciseCategory::Isolation, Measure::reps(12.0)),
        ],
    );

    let error = database
        .programs()
        .save_program_to_database(&draft)
        .await
        .unwrap_err();

    assert_eq!(error.code, ErrorCode::DatabaseError);
    assert_eq!(error.context.details["target"], "exercise");
    for table in ["programs", "workout_plans", "workouts", "exercises", "exercise_library"] {
        assert_eq!(count(&database, table).await, 0, "rows left in {table}");
    }
}

#[tokio::test]
async fn test_library_category_is_first_writer_wins() {
    let database = create_test_database().await;
    let store = database.programs();

    let first = store
        .save_program_to_database(&draft(
            "First",
            "coach-3",
            vec![exercise("Goblet Squat", ExerciseCategory::Primary, Measure::reps(10.0))],
        ))
        .await
        .unwrap();
    let second = store
        .save_program_to_database(&draft(
            "Second",
            "coach-3",
            vec![exercise("Goblet Squat", ExerciseCategory::Isolation, Measure::reps(15.0))],
        ))
        .await
        .unwrap();

    let entry = database
        .exercise_library()
        .get_by_name("Goblet Squat")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(entry.category, ExerciseCategory::Primary);
    assert_eq!(count(&database, "exercise_library").await, 1);

    let first_ref = first.workout_plans[0].workouts[0].exercises[0].exercise_library_id;
    let second_ref = second.workout_plans[0].workouts[0].exercises[0].exercise_library_id;
    assert_eq!(first_ref, entry.id);
    assert_eq!(second_ref, entry.id);
}

#[tokio::test]
async fn test_padded_exercise_name_is_stored_trimmed() {
    let database = create_test_database().await;

    let saved = database
        .programs()
        .save_program_to_database(&draft(
            "Padded",
            "coach-4",
            vec![exercise("Squat ", ExerciseCategory::Primary, Measure::reps(5.0))],
        ))
        .await
        .unwrap();

    let entry = database
        .exercise_library()
        .get_by_name("Squat")
        .await
        .unwrap()
        .unwrap();
    let stored = database
        .programs()
        .get_program(saved.id)
        .await
        .unwrap()
        .unwrap();
    let exercise = &stored.workout_plans[0].workouts[0].exercises[0];
    assert_eq!(exercise.name, "Squat");
    assert_eq!(exercise.name, entry.name);
    assert_eq!(exercise.exercise_library_id, entry.id);
}

#[tokio::test]
async fn test_blank_name_or_author_is_rejected_before_writing() {
    let database = create_test_database().await;
    let store = database.programs();
    let exercises = vec![exercise("Push-Up", ExerciseCategory::Secondary, Measure::reps(12.0))];

    let error = store
        .save_program_to_database(&draft("   ", "coach-4", exercises.clone()))
        .await
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::InvalidInput);

    let error = store
        .save_program_to_database(&draft("Named", "", exercises))
        .await
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::InvalidInput);

    assert_eq!(count(&database, "programs").await, 0);
    assert_eq!(count(&database, "exercise_library").await, 0);
}

#[tokio::test]
async fn test_stored_program_reads_back_identically() {
    let database = create_test_database().await;
    let mut draft = draft(
        "Round Trip",
        "coach-5",
        vec![
            exercise("Bench Press", ExerciseCategory::Primary, Measure::reps(8.0)),
            exercise("Row Erg", ExerciseCategory::Other, Measure::distance(2.0, "km")),
        ],
    );
    draft.flags.is_template = true;

    let stored = database
        .programs()
        .save_program_to_database(&draft)
        .await
        .unwrap();
    let reloaded = database
        .programs()
        .get_program(stored.id)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(reloaded, stored);
    assert!(reloaded.is_template);
    let plan = &reloaded.workout_plans[0];
    assert_eq!(plan.user_id, "coach-5");
    assert_eq!(plan.days_per_week, 1);
    assert!(plan.body_fat_percentage.abs() < f64::EPSILON);
    assert_eq!(plan.muscle_mass_distribution, "Balanced");
    assert_eq!(plan.workouts[0].exercises[1].measure_unit, Some(MeasureUnit::Kilometers));
    assert_eq!(plan.workouts[0].exercises[1].equipment, vec!["kettlebell"]);

    assert!(database
        .programs()
        .get_program(Uuid::new_v4())
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_file_database_survives_reopen() {
    common::init_test_logging();
    let dir = tempfile::tempdir().unwrap();
    let url = DatabaseUrl::SQLite {
        path: dir.path().join("nested").join("programs.db"),
    };

    let stored = {
        let database = Database::new(&url).await.unwrap();
        database
            .programs()
            .save_program_to_database(&draft(
                "On Disk",
                "coach-6",
                vec![exercise("Lunge", ExerciseCategory::Secondary, Measure::reps(10.0))],
            ))
            .await
            .unwrap()
    };

    let reopened = Database::new(&url).await.unwrap();
    let reloaded = reopened.programs().get_program(stored.id).await.unwrap();
    assert_eq!(reloaded, Some(stored));
}
