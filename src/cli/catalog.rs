use crate::catalog::picker_entries;
use crate::cli::SessionArgs;

pub async fn execute(args: SessionArgs) -> anyhow::Result<()> {
    let session = super::open_session(&args).await?;

    if !session.catalog_available {
        eprintln!("No courses loaded: the course catalog is unavailable. Try again later.");
        return Ok(());
    }

    for entry in picker_entries(&session.catalog, session.orchestrator.store()) {
        println!("{}  [{}]", entry, entry.course.category);
    }
    Ok(())
}
