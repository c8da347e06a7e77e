//! Placement orchestrator: the entry point for placing, moving and updating
//! courses.
//!
//! Each attempt runs `Idle -> Validating -> {Accepted, AwaitingOverride,
//! Rejected} -> Idle`. An invalid placement is never silently blocked; the
//! caller gets the diagnostic and a [`PendingOverride`] to confirm or decline.

mod placement;

pub use placement::PlacementOrchestrator;

use crate::calendar::Term;
use crate::catalog::Course;
use crate::plan::{Placement, Status};
use crate::prereq::{Diagnostic, ValidationWarning};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptState {
    Idle,
    Validating,
    Accepted,
    AwaitingOverride,
    Rejected,
}

impl std::fmt::Display for AttemptState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttemptState::Idle => write!(f, "idle"),
            AttemptState::Validating => write!(f, "validating"),
            AttemptState::Accepted => write!(f, "accepted"),
            AttemptState::AwaitingOverride => write!(f, "awaiting_override"),
            AttemptState::Rejected => write!(f, "rejected"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PlacementRequest {
    /// Add a course that is not yet in the plan
    Place {
        course: Course,
        term: Term,
        status: Status,
    },
    /// Reassign a placed course, optionally at a drop position
    Move {
        code: String,
        to: Term,
        index: Option<usize>,
    },
}

impl PlacementRequest {
    pub fn code(&self) -> &str {
        match self {
            PlacementRequest::Place { course, .. } => &course.code,
            PlacementRequest::Move { code, .. } => code,
        }
    }

    pub fn target(&self) -> Term {
        match self {
            PlacementRequest::Place { term, .. } => *term,
            PlacementRequest::Move { to, .. } => *to,
        }
    }
}

/// An invalid placement waiting for the user's decision.
///
/// Only the most recent attempt can be resolved, and only while the plan is
/// unchanged since the warning was issued.
#[derive(Debug, Clone)]
pub struct PendingOverride {
    attempt_id: Uuid,
    revision: u64,
    request: PlacementRequest,
    diagnostic: Diagnostic,
}

impl PendingOverride {
    pub fn attempt_id(&self) -> Uuid {
        self.attempt_id
    }

    pub fn request(&self) -> &PlacementRequest {
        &self.request
    }

    pub fn diagnostic(&self) -> &Diagnostic {
        &self.diagnostic
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverrideDecision {
    Confirm,
    Decline,
}

#[derive(Debug)]
pub enum PlacementOutcome {
    Accepted {
        placement: Placement,
        /// Set when prerequisites could not be verified
        warning: Option<ValidationWarning>,
        /// True when accepted despite unmet prerequisites
        overridden: bool,
    },
    AwaitingOverride(PendingOverride),
    Rejected,
}
