// ABOUTME: Command-line front end for generating and inspecting persisted programs
// ABOUTME: Reads an intake JSON file, runs the pipeline against the configured provider, stores the result
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Program generation CLI.
//!
//! Usage:
//! ```bash
//! # Generate and persist a program (provider from PIERRE_LLM_PROVIDER)
//! cargo run --bin pierre-program-cli -- generate --intake intake.json --author coach-42
//!
//! # Run the final review stage and fan out four calls at a time
//! cargo run --bin pierre-program-cli -- generate --intake intake.json --author coach-42 --review --concurrency 4
//!
//! # Print a stored program
//! cargo run --bin pierre-program-cli -- show 6f1c...
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;
use uuid::Uuid;

use pierre_program_core::models::{IntakeRecord, ProgramFlags};
use pierre_programs::config::{DatabaseConfig, DatabaseUrl, GenerationConfig};
use pierre_programs::database::Database;
use pierre_programs::generation::ProgramGenerator;
use pierre_programs::llm::ReasoningProvider;
use pierre_programs::logging::LoggingConfig;

#[derive(Parser)]
#[command(
    name = "pierre-program-cli",
    about = "Pierre program generation",
    long_about = "Generate multi-phase training programs from intake answers and inspect stored programs"
)]
struct Cli {
    /// Database URL override
    #[arg(long, global = true)]
    database_url: Option<String>,

    /// Enable verbose logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a program from an intake file and persist it
    Generate {
        /// Intake questionnaire JSON file
        #[arg(long)]
        intake: PathBuf,

        /// Identity the program is created by and for
        #[arg(long)]
        author: String,

        /// Store the program as a template
        #[arg(long)]
        template: bool,

        /// Run the final review stage
        #[arg(long)]
        review: bool,

        /// Concurrent stage calls
        #[arg(long)]
        concurrency: Option<usize>,
    },
    /// Print a stored program as JSON
    Show {
        /// Program id
        program_id: Uuid,
    },
}

async fn open_database(override_url: Option<&str>) -> Result<Database> {
    let url = match override_url {
        Some(url) => DatabaseUrl::parse_url(url)?,
        None => DatabaseConfig::from_env()?.url,
    };
    Ok(Database::new(&url).await?)
}

async fn generate(
    database: &Database,
    intake_path: &Path,
    author: &str,
    flags: ProgramFlags,
    review: bool,
    concurrency: Option<usize>,
) -> Result<()> {
    let raw = tokio::fs::read_to_string(intake_path)
        .await
        .with_context(|| format!("Failed to read intake file {}", intake_path.display()))?;
    let intake: IntakeRecord =
        serde_json::from_str(&raw).context("Intake file is not a valid intake record")?;

    let mut config = GenerationConfig::from_env()?.with_final_review(review);
    if let Some(concurrency) = concurrency {
        config = config.with_concurrency(concurrency);
    }
    let provider = ReasoningProvider::from_env()?;
    info!(provider = %provider.provider_type(), "Generating program");

    let generator = ProgramGenerator::new(provider, config);
    let program = generator.generate(&intake, author).await;
    let metadata = program.metadata.clone();
    let review = program.review.clone();

    let stored = database
        .programs()
        .save_program_to_database(&program.into_draft(author, flags))
        .await?;

    let summary = serde_json::json!({
        "programId": stored.id,
        "name": stored.name,
        "phases": stored.workout_plans.len(),
        "exercises": stored.exercise_count(),
        "generation": metadata,
        "review": review,
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

async fn show(database: &Database, program_id: Uuid) -> Result<()> {
    let program = database
        .programs()
        .get_program(program_id)
        .await?
        .with_context(|| format!("Program {program_id} not found"))?;
    println!("{}", serde_json::to_string_pretty(&program)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut logging = LoggingConfig::from_env();
    if cli.verbose {
        logging.level = "debug".to_owned();
    }
    logging.init()?;

    let database = open_database(cli.database_url.as_deref()).await?;

    match cli.command {
        Command::Generate {
            intake,
            author,
            template,
            review,
            concurrency,
        } => {
            let flags = ProgramFlags {
                is_template: template,
                ..ProgramFlags::default()
            };
            generate(&database, &intake, &author, flags, review, concurrency).await
        }
        Command::Show { program_id } => show(&database, program_id).await,
    }
}
