use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

mod api;
mod calendar;
mod catalog;
mod cli;
mod config;
mod error;
mod orchestrator;
mod output;
mod plan;
mod prereq;
mod session;
#[cfg(test)]
mod testing;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing - only show logs with --verbose
    let filter = if cli.verbose {
        EnvFilter::new("dplan=debug")
    } else {
        EnvFilter::new("dplan=warn")
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Show(args) => cli::show::execute(args).await,
        Commands::Catalog(args) => cli::catalog::execute(args).await,
        Commands::Check(args) => cli::check::execute(args).await,
        Commands::Place(args) => cli::place::execute_place(args).await,
        Commands::Move(args) => cli::place::execute_move(args).await,
        Commands::Status(args) => cli::status::execute(args).await,
        Commands::Remove(args) => cli::remove::execute(args).await,
        Commands::Schema => cli::schema::execute(),
    }
}
