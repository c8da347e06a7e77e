pub mod catalog;
pub mod check;
pub mod place;
pub mod remove;
pub mod schema;
pub mod show;
pub mod status;

use crate::api::ApiClient;
use crate::config::Config;
use crate::plan::Status;
use crate::session::{Collaborators, PlannerSession};
use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(name = "dplan")]
#[command(
    author,
    version,
    about = "Plan courses across academic terms with prerequisite checks"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose/debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the plan, grouped by term
    Show(ShowArgs),

    /// List the course catalog, marking courses already placed
    Catalog(SessionArgs),

    /// Check prerequisites for a placement without changing the plan
    Check(CheckArgs),

    /// Add a course to a term
    Place(PlaceArgs),

    /// Move a placed course to another term
    Move(MoveArgs),

    /// Update the status of a placed course
    Status(StatusArgs),

    /// Take a course out of the plan
    Remove(RemoveArgs),

    /// Print JSON Schema for config validation
    Schema,
}

#[derive(Parser, Clone)]
pub struct SessionArgs {
    /// Path to config file
    #[arg(short, long, default_value = "dplan.yaml")]
    pub config: PathBuf,

    /// Override the services' base URL
    #[arg(long, env = "DPLAN_API_URL")]
    pub api_url: Option<String>,

    /// Override the user whose plan is edited
    #[arg(long, env = "DPLAN_USER")]
    pub user: Option<String>,
}

#[derive(Parser, Clone)]
pub struct ShowArgs {
    #[command(flatten)]
    pub session: SessionArgs,

    /// Only show the terms of this academic year
    #[arg(long)]
    pub year: Option<i32>,

    /// Only show courses with this status (remaining, in-progress, completed)
    #[arg(long)]
    pub status: Option<Status>,

    /// Emit JSON instead of the printable view
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Clone)]
pub struct CheckArgs {
    #[command(flatten)]
    pub session: SessionArgs,

    /// Course code, e.g. "CSCI 3136"
    pub code: String,

    /// Target term, e.g. "Winter 2024"
    #[arg(long)]
    pub term: String,
}

#[derive(Parser, Clone)]
pub struct OverrideArgs {
    /// Place anyway if prerequisites are unmet
    #[arg(long, conflicts_with = "no")]
    pub yes: bool,

    /// Cancel if prerequisites are unmet, without asking
    #[arg(long)]
    pub no: bool,
}

#[derive(Parser, Clone)]
pub struct PlaceArgs {
    #[command(flatten)]
    pub session: SessionArgs,

    /// Course code, e.g. "CSCI 3136"
    pub code: String,

    /// Target term, e.g. "Winter 2024"
    #[arg(long)]
    pub term: String,

    #[arg(long, default_value = "remaining")]
    pub status: Status,

    #[command(flatten)]
    pub decision: OverrideArgs,
}

#[derive(Parser, Clone)]
pub struct MoveArgs {
    #[command(flatten)]
    pub session: SessionArgs,

    /// Course code, e.g. "CSCI 3136"
    pub code: String,

    /// Destination term, e.g. "Fall 2025"
    #[arg(long)]
    pub to: String,

    /// Position within the destination term (0 = first)
    #[arg(long)]
    pub position: Option<usize>,

    #[command(flatten)]
    pub decision: OverrideArgs,
}

#[derive(Parser, Clone)]
pub struct StatusArgs {
    #[command(flatten)]
    pub session: SessionArgs,

    /// Course code, e.g. "CSCI 3136"
    pub code: String,

    /// New status (remaining, in-progress, completed)
    pub status: Status,
}

#[derive(Parser, Clone)]
pub struct RemoveArgs {
    #[command(flatten)]
    pub session: SessionArgs,

    /// Course code, e.g. "CSCI 3136"
    pub code: String,
}

/// Load config, apply overrides and open a planning session.
pub async fn open_session(args: &SessionArgs) -> anyhow::Result<PlannerSession> {
    let mut config = Config::load_or_default(&args.config)?;

    if let Some(url) = &args.api_url {
        config.api.base_url = url.clone();
    }
    if let Some(user) = &args.user {
        config.user_id = Some(user.clone());
    }

    config.validate()?;
    let user = config
        .user_id
        .clone()
        .context("No user configured; set user_id in the config, --user or DPLAN_USER")?;

    info!("Opening plan for user {} at {}", user, config.api.base_url);
    let client = Arc::new(ApiClient::new(&config.api, config.retry.clone())?);
    let services = Collaborators {
        catalog: client.clone(),
        prerequisites: client.clone(),
        persistence: client,
    };

    let session = PlannerSession::open(&user, config.term_calendar()?, services).await?;
    for skipped in &session.skipped {
        eprintln!(
            "warning: could not load {} ({}): {}",
            skipped.code, skipped.term_label, skipped.reason
        );
    }
    Ok(session)
}

/// Resolve a user-typed course code against the plan, ignoring case.
pub fn placed_code(session: &PlannerSession, raw: &str) -> String {
    session
        .orchestrator
        .store()
        .placed_code(raw)
        .unwrap_or(raw.trim())
        .to_string()
}
