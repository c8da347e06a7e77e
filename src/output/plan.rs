use crate::calendar::Term;
use crate::plan::{Placement, PlanStore, Status};
use chrono::Utc;
use serde::Serialize;

/// Which part of the plan to show.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlanView {
    /// Only the three terms of this year tab
    pub year: Option<i32>,
    /// Only placements with this status
    pub status: Option<Status>,
}

impl PlanView {
    fn terms(&self, store: &PlanStore) -> Vec<Term> {
        match self.year {
            Some(year) => store.calendar().terms_for_year(year).to_vec(),
            None => store.terms().map(|(term, _)| term).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PlanExport<'a> {
    pub exported_at: String,
    pub course_count: usize,
    pub terms: Vec<TermExport<'a>>,
}

#[derive(Debug, Serialize)]
pub struct TermExport<'a> {
    pub term: Term,
    pub courses: Vec<&'a Placement>,
}

pub fn build_export<'a>(store: &'a PlanStore, view: PlanView) -> PlanExport<'a> {
    let terms: Vec<TermExport<'a>> = view
        .terms(store)
        .into_iter()
        .map(|term| TermExport {
            term,
            courses: store.placements_with_status(term, view.status),
        })
        .collect();

    PlanExport {
        exported_at: Utc::now().to_rfc3339(),
        course_count: terms.iter().map(|t| t.courses.len()).sum(),
        terms,
    }
}

/// Printable view of the plan, one section per term.
pub fn render_plan(store: &PlanStore, view: PlanView) -> String {
    let mut out = String::new();

    out.push_str("# Degree Plan\n");
    if let Some(status) = view.status {
        out.push_str(&format!("Showing: {}\n", status));
    }

    for term in view.terms(store) {
        out.push_str(&format!("\n## {}\n", term));

        let placements = store.placements_with_status(term, view.status);
        if placements.is_empty() {
            out.push_str("  (no courses)\n");
            continue;
        }

        for placement in placements {
            out.push_str(&format!(
                "  [{}] {} - {} ({}, {})\n",
                placement.id,
                placement.course.code,
                placement.course.name,
                placement.course.category,
                placement.status
            ));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::TermCalendar;
    use crate::testing::{course, term};

    fn store() -> PlanStore {
        let mut store = PlanStore::new(TermCalendar::new(2023, 2024).unwrap());
        store
            .place_course(course(1, "CSCI 2110"), term("Fall 2023"), Status::Completed)
            .unwrap();
        store
            .place_course(course(2, "CSCI 3136"), term("Fall 2023"), Status::Remaining)
            .unwrap();
        store
            .place_course(course(3, "CSCI 3110"), term("Winter 2024"), Status::InProgress)
            .unwrap();
        store
    }

    #[test]
    fn test_render_year_tab() {
        let text = render_plan(
            &store(),
            PlanView {
                year: Some(2023),
                status: None,
            },
        );

        assert!(text.contains("## Fall 2023\n  [f1] CSCI 2110 - CSCI 2110 title (core, Completed)"));
        assert!(text.contains("  [f2] CSCI 3136"));
        assert!(text.contains("## Winter 2023\n  (no courses)"));
        assert!(!text.contains("2024"));
    }

    #[test]
    fn test_render_status_filter() {
        let text = render_plan(
            &store(),
            PlanView {
                year: None,
                status: Some(Status::InProgress),
            },
        );

        assert!(text.contains("Showing: In Progress"));
        assert!(text.contains("CSCI 3110"));
        assert!(!text.contains("CSCI 2110"));
    }

    #[test]
    fn test_export_counts_filtered_courses() {
        let store = store();
        let export = build_export(
            &store,
            PlanView {
                year: None,
                status: Some(Status::Completed),
            },
        );
        assert_eq!(export.terms.len(), 6);
        assert_eq!(export.course_count, 1);

        let json = serde_json::to_value(&export).unwrap();
        assert_eq!(json["terms"][0]["term"], "Fall 2023");
        assert_eq!(json["terms"][0]["courses"][0]["id"], "f1");
        assert_eq!(json["terms"][0]["courses"][0]["status"], "Completed");
    }
}
