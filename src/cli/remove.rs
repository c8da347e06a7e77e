use crate::cli::RemoveArgs;

pub async fn execute(args: RemoveArgs) -> anyhow::Result<()> {
    let mut session = super::open_session(&args.session).await?;

    let code = super::placed_code(&session, &args.code);
    let placement = session.orchestrator.remove_course(&code).await?;
    println!(
        "{} removed from {}.",
        placement.course.code, placement.term
    );
    Ok(())
}
