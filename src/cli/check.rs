use crate::calendar::Term;
use crate::catalog::find_course;
use crate::cli::CheckArgs;
use crate::output::render_diagnostic;
use crate::prereq::ValidationResult;
use anyhow::Context;

pub async fn execute(args: CheckArgs) -> anyhow::Result<()> {
    let target: Term = args.term.parse()?;
    let session = super::open_session(&args.session).await?;
    if !session.catalog_available {
        anyhow::bail!("The course catalog is unavailable; cannot look up {}", args.code);
    }
    let course = find_course(&session.catalog, &args.code)
        .with_context(|| format!("{} is not in the course catalog", args.code))?;

    let validation = session.orchestrator.preview(course, target).await;
    if let Some(warning) = &validation.warning {
        eprintln!("warning: {}", warning);
    }

    match validation.result {
        ValidationResult::Valid => println!("{} can be taken in {}.", course.code, target),
        ValidationResult::Invalid(diagnostic) => {
            print!("{}", render_diagnostic(&course.code, target, &diagnostic))
        }
    }
    Ok(())
}
