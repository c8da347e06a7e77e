use crate::cli::ShowArgs;
use crate::output::{build_export, render_plan, PlanView};

pub async fn execute(args: ShowArgs) -> anyhow::Result<()> {
    let session = super::open_session(&args.session).await?;
    let store = session.orchestrator.store();
    let view = PlanView {
        year: args.year,
        status: args.status,
    };

    if let Some(year) = args.year {
        if !store.calendar().years().any(|y| y == year) {
            anyhow::bail!("{} is outside the planning calendar", year);
        }
    }

    if store.is_empty() && !args.json {
        eprintln!("The plan is empty; add courses with `dplan place`.");
    }

    if args.json {
        let export = build_export(store, view);
        println!("{}", serde_json::to_string_pretty(&export)?);
    } else {
        print!("{}", render_plan(store, view));
    }
    Ok(())
}
