use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use readiness_core::model::{AssessmentId, ProposedScore, QuestionId, SectionId, UserId};
use readiness_services::{AppServices, AssessmentError, AssessmentService, Clock, ErrorTracker};

mod db_url;

use db_url::{normalize_sqlite_url, prepare_sqlite_file};

#[derive(Parser)]
#[command(name = "assess", about = "AI readiness assessment for small businesses")]
#[command(version, propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// SQLite database URL or path
    #[arg(
        long = "db",
        env = "ASSESS_DB_URL",
        default_value = "sqlite://assessments.sqlite3",
        global = true
    )]
    db_url: String,

    /// Owner of new assessments and of the history listing
    #[arg(
        long = "user",
        env = "ASSESS_USER_ID",
        default_value = "local-user",
        global = true
    )]
    user_id: String,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Show the sections and their point totals
    Catalog,
    /// List the questions of one section
    Questions { section: String },
    /// Start a new assessment
    Start {
        business_name: String,
        industry: String,
    },
    /// Show the next unanswered question
    Next { id: AssessmentId },
    /// Record one answer
    Answer {
        id: AssessmentId,
        section: String,
        question: String,
        score: String,
    },
    /// Record every answer of a section at once
    Submit {
        id: AssessmentId,
        section: String,
        /// Answers as `question=score`
        #[arg(value_parser = parse_answer, required = true)]
        answers: Vec<(String, String)>,
    },
    /// Totals and per-section breakdown
    Scores { id: AssessmentId },
    /// Scores in the shape consumed by report generators
    Results { id: AssessmentId },
    /// Progress, phase and storage area
    Status { id: AssessmentId },
    /// Where a paused assessment left off
    Resume { id: AssessmentId },
    /// Your assessments, most recent first
    History {
        #[arg(long, default_value_t = 10)]
        limit: u32,
    },
}

fn parse_answer(raw: &str) -> Result<(String, String), String> {
    let (question, score) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected question=score, got {raw:?}"))?;
    if question.trim().is_empty() {
        return Err(format!("missing question id in {raw:?}"));
    }
    Ok((question.trim().to_owned(), score.trim().to_owned()))
}

#[derive(Serialize)]
struct Failure {
    kind: &'static str,
    messages: Vec<String>,
    consecutive_failures: u32,
    fallback_available: bool,
}

fn render<T: Serialize>(
    result: Result<T, AssessmentError>,
) -> Result<Result<Value, AssessmentError>> {
    match result {
        Ok(value) => Ok(Ok(serde_json::to_value(value)?)),
        Err(err) => Ok(Err(err)),
    }
}

async fn dispatch(
    service: &AssessmentService,
    user_id: &UserId,
    command: Command,
) -> Result<Result<Value, AssessmentError>> {
    match command {
        Command::Catalog => render(Ok::<_, AssessmentError>(service.overview())),
        Command::Questions { section } => render(service.section_questions(&section.into())),
        Command::Start {
            business_name,
            industry,
        } => render(service.start(user_id, &business_name, &industry).await),
        Command::Next { id } => render(service.next_question(id).await),
        Command::Answer {
            id,
            section,
            question,
            score,
        } => render(
            service
                .record_response(
                    id,
                    &SectionId::new(section),
                    &QuestionId::new(question),
                    ProposedScore::from(score.as_str()),
                )
                .await,
        ),
        Command::Submit {
            id,
            section,
            answers,
        } => {
            let responses: IndexMap<QuestionId, ProposedScore> = answers
                .iter()
                .map(|(q, s)| (QuestionId::new(q.as_str()), ProposedScore::from(s.as_str())))
                .collect();
            render(
                service
                    .submit_section(id, &SectionId::new(section), &responses)
                    .await,
            )
        }
        Command::Scores { id } => render(service.scores(id).await),
        Command::Results { id } => render(service.results(id).await),
        Command::Status { id } => render(service.status(id).await),
        Command::Resume { id } => render(service.resume(id).await),
        Command::History { limit } => render(service.history(user_id, limit).await),
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Open + migrate SQLite here so services stay free of filesystem concerns.
    let db_url = normalize_sqlite_url(&cli.db_url);
    prepare_sqlite_file(&db_url)?;
    let services = AppServices::new_sqlite(&db_url, Clock::system())
        .await
        .with_context(|| format!("opening {db_url}"))?;
    let service = services.assessments();
    let user_id = UserId::new(cli.user_id);
    info!(%db_url, %user_id, "database opened");

    let mut tracker = ErrorTracker::new();
    let outcome = dispatch(&service, &user_id, cli.command).await?;
    match tracker.observe(outcome) {
        Ok(value) => {
            println!("{}", serde_json::to_string_pretty(&value)?);
            Ok(ExitCode::SUCCESS)
        }
        Err(failure) => {
            debug!(kind = failure.error.kind().as_str(), "command failed");
            let report = Failure {
                kind: failure.error.kind().as_str(),
                messages: failure.error.messages(),
                consecutive_failures: failure.consecutive_failures,
                fallback_available: failure.fallback_available,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(ExitCode::FAILURE)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn answers_split_on_the_first_equals_sign() {
        assert_eq!(
            parse_answer("1.2 = 4").unwrap(),
            ("1.2".to_owned(), "4".to_owned())
        );
        assert!(parse_answer("1.2").is_err());
        assert!(parse_answer("=4").is_err());
    }

    #[test]
    fn submit_collects_pairs() {
        let cli = Cli::try_parse_from([
            "assess",
            "--db",
            "sqlite::memory:",
            "submit",
            "6f1c2a3e-7d4b-4c1a-9e2f-0a1b2c3d4e5f",
            "section6",
            "6.1=3",
            "6.2=5",
        ])
        .unwrap();
        let Command::Submit { section, answers, .. } = cli.command else {
            panic!("expected submit");
        };
        assert_eq!(section, "section6");
        assert_eq!(answers.len(), 2);
        assert_eq!(cli.db_url, "sqlite::memory:");
    }
}
