mod diagnostic;
mod plan;

pub use diagnostic::render_diagnostic;
pub use plan::{build_export, render_plan, PlanExport, PlanView};
