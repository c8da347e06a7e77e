use crate::calendar::Term;
use crate::prereq::Diagnostic;

/// Warning shown before the user decides whether to place anyway.
pub fn render_diagnostic(code: &str, target: Term, diagnostic: &Diagnostic) -> String {
    let mut out = format!("Prerequisite issues for {} in {}:\n", code, target);

    if !diagnostic.missing.is_empty() {
        out.push_str("\nMissing prerequisites (add these to your plan first):\n");
        for course in &diagnostic.missing {
            out.push_str(&format!("  - {}: {}\n", course.code, course.name));
        }
    }

    if !diagnostic.misordered.is_empty() {
        out.push_str("\nScheduling conflicts (prerequisites must come earlier):\n");
        for entry in &diagnostic.misordered {
            out.push_str(&format!(
                "  - {} is in {} ({}) but must be completed before {}\n",
                entry.course.code, entry.current_term, entry.current_status, target
            ));
        }

        out.push_str("\nSuggestions:\n");
        out.push_str("  - Move the prerequisites to earlier terms, or\n");
        match diagnostic.suggestion {
            Some(term) => out.push_str(&format!("  - Schedule {} in {} or later\n", code, term)),
            None => out.push_str(&format!(
                "  - Schedule {} in a later term, after its prerequisites\n",
                code
            )),
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::Status;
    use crate::prereq::Misordered;
    use crate::testing::{course, term};

    #[test]
    fn test_misordered_message_includes_suggestion() {
        let diagnostic = Diagnostic {
            missing: vec![],
            misordered: vec![Misordered {
                course: course(1, "CSCI 2110"),
                current_term: term("Summer 2024"),
                current_status: Status::Completed,
            }],
            suggestion: Some(term("Fall 2025")),
        };

        let text = render_diagnostic("CSCI 3136", term("Winter 2024"), &diagnostic);
        assert!(text.contains(
            "CSCI 2110 is in Summer 2024 (Completed) but must be completed before Winter 2024"
        ));
        assert!(text.contains("Schedule CSCI 3136 in Fall 2025 or later"));
        assert!(!text.contains("Missing prerequisites"));
    }

    #[test]
    fn test_missing_message_lists_courses() {
        let diagnostic = Diagnostic {
            missing: vec![course(1, "CSCI 2110")],
            misordered: vec![],
            suggestion: None,
        };

        let text = render_diagnostic("CSCI 3136", term("Winter 2024"), &diagnostic);
        assert!(text.contains("  - CSCI 2110: CSCI 2110 title"));
        assert!(!text.contains("Suggestions"));
    }
}
