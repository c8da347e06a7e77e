use crate::cli::StatusArgs;

pub async fn execute(args: StatusArgs) -> anyhow::Result<()> {
    let mut session = super::open_session(&args.session).await?;
    let code = super::placed_code(&session, &args.code);
    let placement = session
        .orchestrator
        .set_status(&code, args.status)
        .await?;
    println!(
        "{} in {} is now {}.",
        placement.course.code, placement.term, placement.status
    );
    Ok(())
}
