//! CLI entry point for the GPA calculator.
//!
//! Provides subcommands for computing GPAs from a local grades export and
//! for pulling live rosters and stored grades from the SIS API.

mod infra;
mod services;

use std::ffi::OsStr;
use std::path::Path;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

use gpa_calc::grading::aggregate::GpaAggregator;
use gpa_calc::grading::points::ScoringPolicy;
use gpa_calc::grading::types::{StudentKey, StudentName};
use gpa_calc::input::load_course_records;
use gpa_calc::output::{write_detailed, write_roster_report, write_summary};

use crate::infra::sis::client::SisClient;
use crate::services::roster_api::RosterApi;

#[derive(Parser)]
#[command(name = "gpa_calc")]
#[command(about = "A tool to compute student GPAs from grade records", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute honors-bonus GPAs from a grades export
    Summary {
        /// Grades CSV to read
        #[arg(short, long, default_value = "grades.csv")]
        input: String,

        /// CSV file to write the per-student summary to
        #[arg(short, long, default_value = "student_gpas.csv")]
        output: String,

        /// Scale/description value that earns the +1 honors bonus
        #[arg(long, default_value = "AP Grades")]
        honors_marker: String,
    },
    /// Compute credit-weighted GPAs, optionally with a per-course detail file
    Weighted {
        /// Grades CSV to read
        #[arg(short, long, default_value = "grades.csv")]
        input: String,

        /// CSV file to write the per-student summary to
        #[arg(short, long, default_value = "student_gpas.csv")]
        output: String,

        /// Optional CSV listing every course row with its computed points
        #[arg(short, long)]
        detailed: Option<String>,
    },
    /// Fetch rosters and stored grades from the SIS API and write a GPA report
    FetchRoster {
        /// Tab-separated report file to write
        #[arg(short, long, default_value = "gpa_report.tsv")]
        output: String,

        /// Records requested per API page
        #[arg(short, long, default_value_t = 100)]
        page_size: usize,

        /// Term store codes to fetch (repeatable); all terms when omitted
        #[arg(short, long)]
        term: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/gpa_calc.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("gpa_calc.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse().unwrap()));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse().unwrap()));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Summary {
            input,
            output,
            honors_marker,
        } => {
            let policy = ScoringPolicy::honors_summary(&honors_marker);
            summarize_file(&input, &output, None, &policy)?;
        }
        Commands::Weighted {
            input,
            output,
            detailed,
        } => {
            let policy = ScoringPolicy::credit_weighted();
            summarize_file(&input, &output, detailed.as_deref(), &policy)?;
        }
        Commands::FetchRoster {
            output,
            page_size,
            term,
        } => {
            fetch_roster(&output, page_size, &term).await?;
        }
    }

    Ok(())
}

/// Runs the file-based pipeline: load, score, aggregate, write reports.
fn summarize_file(
    input: &str,
    output: &str,
    detailed: Option<&str>,
    policy: &ScoringPolicy,
) -> Result<()> {
    let records = load_course_records(Path::new(input))?;

    if let Some(detailed) = detailed {
        write_detailed(detailed, &records, policy)?;
    }

    let total = records.len();
    let mut aggregator = GpaAggregator::new();
    let mut counted = 0usize;
    for record in records {
        if let Some(scored) = policy.score(record) {
            aggregator.record(&scored);
            counted += 1;
        }
    }

    if counted < total {
        info!(
            dropped = total - counted,
            "rows with non-standard or invalid grades were left out"
        );
    }

    write_summary(output, &aggregator.finish())
}

/// Pulls every student's stored grades from the SIS and writes the roster
/// GPA report.
#[tracing::instrument(skip(terms))]
async fn fetch_roster(output: &str, page_size: usize, terms: &[String]) -> Result<()> {
    let base_url = std::env::var("SIS_BASE_URL").context("SIS_BASE_URL must be set")?;
    let client_id = std::env::var("SIS_CLIENT_ID").context("SIS_CLIENT_ID must be set")?;
    let client_secret =
        std::env::var("SIS_CLIENT_SECRET").context("SIS_CLIENT_SECRET must be set")?;

    let client = SisClient::connect(&base_url, &client_id, &client_secret, page_size).await?;
    let policy = ScoringPolicy::live_roster();

    info!("Fetching student roster from SIS");
    let students = client.list_students().await?;
    info!(student_count = students.len(), "Roster fetched");

    let term_filters: Vec<Option<&str>> = if terms.is_empty() {
        vec![None]
    } else {
        terms.iter().map(|t| Some(t.as_str())).collect()
    };

    let mut aggregator = GpaAggregator::new();

    for student in &students {
        aggregator.ensure_student(StudentKey {
            student_id: student.id.clone(),
            name: StudentName::Split {
                first: student.first_name.clone(),
                last: student.last_name.clone(),
            },
            grade_level: student.grade_level.clone(),
        });

        for term in &term_filters {
            match client.student_grades(student, *term).await {
                Ok(grades) => {
                    for record in grades {
                        if let Some(scored) = policy.score(record) {
                            aggregator.record(&scored);
                        }
                    }
                }
                Err(e) => {
                    warn!(
                        student_id = %student.id,
                        error = %e,
                        "grade fetch failed, continuing with remaining students"
                    );
                }
            }
        }
    }

    write_roster_report(output, &aggregator.finish())
}
