//! CLI handlers for `place` and `move`: the interactive side of the
//! placement orchestrator, including the override prompt.

use crate::calendar::Term;
use crate::catalog::find_course;
use crate::cli::{MoveArgs, OverrideArgs, PlaceArgs};
use crate::orchestrator::{OverrideDecision, PendingOverride, PlacementOutcome, PlacementOrchestrator};
use crate::output::render_diagnostic;
use anyhow::Context;
use std::io::{self, Write};
use tracing::debug;

pub async fn execute_place(args: PlaceArgs) -> anyhow::Result<()> {
    let target: Term = args.term.parse()?;
    let mut session = super::open_session(&args.session).await?;
    if !session.catalog_available {
        anyhow::bail!("The course catalog is unavailable; cannot look up {}", args.code);
    }

    let course = find_course(&session.catalog, &args.code)
        .with_context(|| format!("{} is not in the course catalog", args.code))?
        .clone();

    if let Some(current) = session.orchestrator.store().find_term(&course.code) {
        anyhow::bail!(
            "{} is already in {}; use `dplan move \"{}\" --to \"{}\"` to move it",
            course.code,
            current,
            course.code,
            target
        );
    }

    let outcome = session
        .orchestrator
        .place(course, target, args.status)
        .await?;
    finish(&mut session.orchestrator, outcome, &args.decision).await
}

pub async fn execute_move(args: MoveArgs) -> anyhow::Result<()> {
    let target: Term = args.to.parse()?;
    let mut session = super::open_session(&args.session).await?;
    let code = super::placed_code(&session, &args.code);

    let outcome = session
        .orchestrator
        .move_course(&code, target, args.position)
        .await?;
    finish(&mut session.orchestrator, outcome, &args.decision).await
}

async fn finish(
    orchestrator: &mut PlacementOrchestrator,
    outcome: PlacementOutcome,
    decision: &OverrideArgs,
) -> anyhow::Result<()> {
    let outcome = match outcome {
        PlacementOutcome::AwaitingOverride(pending) => {
            let choice = decide(&pending, decision)?;
            orchestrator.resolve_override(pending, choice).await?
        }
        other => other,
    };
    debug!("Orchestrator {}", orchestrator.state());

    match outcome {
        PlacementOutcome::Accepted {
            placement,
            warning,
            overridden,
        } => {
            if let Some(warning) = warning {
                eprintln!("warning: {}", warning);
            }
            let note = if overridden {
                " (prerequisites not satisfied)"
            } else {
                ""
            };
            println!(
                "{} saved in {} as {}{}.",
                placement.course.code, placement.term, placement.status, note
            );
        }
        PlacementOutcome::Rejected => println!("Cancelled; the plan was not changed."),
        PlacementOutcome::AwaitingOverride(_) => unreachable!("override already resolved"),
    }
    Ok(())
}

fn decide(pending: &PendingOverride, args: &OverrideArgs) -> anyhow::Result<OverrideDecision> {
    let request = pending.request();
    debug!(attempt = %pending.attempt_id(), "Asking whether to override");
    print!(
        "{}",
        render_diagnostic(request.code(), request.target(), pending.diagnostic())
    );

    if args.yes {
        return Ok(OverrideDecision::Confirm);
    }
    if args.no {
        return Ok(OverrideDecision::Decline);
    }

    print!("\nAdd this course anyway? (not recommended) [y/n] ");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let input = input.trim();

    if input.eq_ignore_ascii_case("y") || input.eq_ignore_ascii_case("yes") {
        Ok(OverrideDecision::Confirm)
    } else {
        Ok(OverrideDecision::Decline)
    }
}
