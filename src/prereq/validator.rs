use crate::calendar::Term;
use crate::catalog::Course;
use crate::plan::PlanStore;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, warn};

use super::{
    Diagnostic, Misordered, PrerequisiteGraph, Validation, ValidationResult, ValidationWarning,
};

pub struct PrerequisiteValidator {
    graph: Arc<dyn PrerequisiteGraph>,
}

impl PrerequisiteValidator {
    pub fn new(graph: Arc<dyn PrerequisiteGraph>) -> Self {
        Self { graph }
    }

    /// Check `candidate` placed in `target` against `plan`. Never fails:
    /// an unreachable graph service yields `Valid` with a warning.
    pub async fn validate(&self, candidate: &Course, target: Term, plan: &PlanStore) -> Validation {
        let prerequisites = match self.graph.prerequisites_of(candidate).await {
            Ok(prerequisites) => prerequisites,
            Err(e) => {
                warn!(
                    "Could not verify prerequisites of {} for {}: {}",
                    candidate.code, target, e
                );
                return Validation {
                    result: ValidationResult::Valid,
                    warning: Some(ValidationWarning::Unverified {
                        reason: e.to_string(),
                    }),
                };
            }
        };

        let result = check_prerequisites(&prerequisites, target, plan);
        debug!(
            "{} prerequisites of {} checked for {}: valid={}",
            prerequisites.len(),
            candidate.code,
            target,
            result.is_valid()
        );

        Validation {
            result,
            warning: None,
        }
    }
}

fn check_prerequisites(prerequisites: &[Course], target: Term, plan: &PlanStore) -> ValidationResult {
    let mut seen = HashSet::new();
    let mut missing = Vec::new();
    let mut misordered = Vec::new();

    for prereq in prerequisites {
        if !seen.insert(prereq.code.as_str()) {
            continue;
        }

        match plan.find(&prereq.code) {
            None => missing.push(prereq.clone()),
            // Equal term counts as misordered whatever the status.
            Some(placed) if placed.term.order() >= target.order() => misordered.push(Misordered {
                course: prereq.clone(),
                current_term: placed.term,
                current_status: placed.status,
            }),
            Some(_) => {}
        }
    }

    if missing.is_empty() && misordered.is_empty() {
        return ValidationResult::Valid;
    }

    let suggestion = suggest_earliest_term(&misordered);
    ValidationResult::Invalid(Diagnostic {
        missing,
        misordered,
        suggestion,
    })
}

/// The term after the latest misordered prerequisite.
fn suggest_earliest_term(misordered: &[Misordered]) -> Option<Term> {
    misordered
        .iter()
        .map(|m| m.current_term)
        .max_by_key(|t| t.order())
        .map(Term::next)
}
