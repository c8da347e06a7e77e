//! Prerequisite validation for proposed placements.
//!
//! The validator asks a [`PrerequisiteGraph`] for a course's prerequisites and
//! compares them against the current plan:
//! 1. A prerequisite with no placement is *missing*
//! 2. A prerequisite placed in the target term or later is *misordered*
//! 3. The latest misordered term yields an advisory suggestion (the term after it)
//!
//! Findings are advisory. When the graph service is unreachable the placement is
//! reported valid with an "unverified" warning so planning is never blocked.

mod validator;

pub use validator::PrerequisiteValidator;

use crate::calendar::Term;
use crate::catalog::Course;
use crate::error::ValidationServiceError;
use crate::plan::Status;
use async_trait::async_trait;
use serde::Serialize;

/// Read-only view of the `course -> required course` edges.
#[async_trait]
pub trait PrerequisiteGraph: Send + Sync {
    async fn prerequisites_of(&self, course: &Course) -> Result<Vec<Course>, ValidationServiceError>;
}

/// A prerequisite placed in or after the target term.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Misordered {
    #[serde(flatten)]
    pub course: Course,
    pub current_term: Term,
    #[serde(rename = "status")]
    pub current_status: Status,
}

/// Structured explanation of an invalid placement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    #[serde(rename = "missing_prerequisites")]
    pub missing: Vec<Course>,

    #[serde(rename = "invalid_scheduling")]
    pub misordered: Vec<Misordered>,

    /// Earliest term after every misordered prerequisite
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<Term>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ValidationResult {
    Valid,
    Invalid(Diagnostic),
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }
}

/// Raised alongside a result when prerequisites could not be checked.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationWarning {
    Unverified { reason: String },
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationWarning::Unverified { reason } => {
                write!(f, "prerequisites could not be verified ({})", reason)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Validation {
    pub result: ValidationResult,
    pub warning: Option<ValidationWarning>,
}
