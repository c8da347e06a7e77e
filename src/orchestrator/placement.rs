use crate::calendar::Term;
use crate::catalog::Course;
use crate::error::{OrchestratorError, PersistenceError, PlanError};
use crate::plan::{Placement, PlanPersistence, PlanStore, Status};
use crate::prereq::{PrerequisiteValidator, Validation, ValidationResult};
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::{AttemptState, OverrideDecision, PendingOverride, PlacementOutcome, PlacementRequest};

/// Owns the active plan and is the only writer to it.
pub struct PlacementOrchestrator {
    user: String,
    store: PlanStore,
    validator: PrerequisiteValidator,
    persistence: Arc<dyn PlanPersistence>,
    state: AttemptState,
    pending: Option<Uuid>,
}

impl PlacementOrchestrator {
    pub fn new(
        user: impl Into<String>,
        store: PlanStore,
        validator: PrerequisiteValidator,
        persistence: Arc<dyn PlanPersistence>,
    ) -> Self {
        Self {
            user: user.into(),
            store,
            validator,
            persistence,
            state: AttemptState::Idle,
            pending: None,
        }
    }

    /// Read-only access for queries (`find_term`, term listings).
    pub fn store(&self) -> &PlanStore {
        &self.store
    }

    pub fn state(&self) -> AttemptState {
        self.state
    }

    /// Validate a placement without starting an attempt or touching the plan.
    pub async fn preview(&self, course: &Course, target: Term) -> Validation {
        self.validator.validate(course, target, &self.store).await
    }

    pub async fn place(
        &mut self,
        course: Course,
        term: Term,
        status: Status,
    ) -> Result<PlacementOutcome, OrchestratorError> {
        self.request(PlacementRequest::Place {
            course,
            term,
            status,
        })
        .await
    }

    pub async fn move_course(
        &mut self,
        code: &str,
        to: Term,
        index: Option<usize>,
    ) -> Result<PlacementOutcome, OrchestratorError> {
        self.request(PlacementRequest::Move {
            code: code.to_string(),
            to,
            index,
        })
        .await
    }

    /// Validate and, when valid, commit a placement. A new request supersedes
    /// any override still waiting for a decision.
    pub async fn request(
        &mut self,
        request: PlacementRequest,
    ) -> Result<PlacementOutcome, OrchestratorError> {
        let attempt_id = Uuid::new_v4();
        self.pending = None;

        let outcome = self.run_attempt(attempt_id, request).await;
        self.settle(&outcome);
        outcome
    }

    /// Apply the user's decision on an invalid placement.
    pub async fn resolve_override(
        &mut self,
        pending: PendingOverride,
        decision: OverrideDecision,
    ) -> Result<PlacementOutcome, OrchestratorError> {
        let latest = self.pending == Some(pending.attempt_id);
        if !latest || self.store.revision() != pending.revision {
            warn!(
                attempt = %pending.attempt_id,
                "Discarding stale override for {}",
                pending.request.code()
            );
            if latest {
                self.pending = None;
            }
            if self.pending.is_none() {
                self.transition(AttemptState::Idle);
            }
            return Err(OrchestratorError::StaleOverride);
        }
        self.pending = None;

        let outcome = match decision {
            OverrideDecision::Decline => {
                self.transition(AttemptState::Rejected);
                info!(
                    attempt = %pending.attempt_id,
                    "Placement of {} in {} declined",
                    pending.request.code(),
                    pending.request.target()
                );
                Ok(PlacementOutcome::Rejected)
            }
            OverrideDecision::Confirm => {
                self.transition(AttemptState::Accepted);
                info!(
                    attempt = %pending.attempt_id,
                    "Placing {} in {} despite unmet prerequisites",
                    pending.request.code(),
                    pending.request.target()
                );
                self.commit(&pending.request)
                    .await
                    .map(|placement| PlacementOutcome::Accepted {
                        placement,
                        warning: None,
                        overridden: true,
                    })
            }
        };

        self.settle(&outcome);
        outcome
    }

    /// Change a placed course's status; not subject to prerequisite checks.
    pub async fn set_status(
        &mut self,
        code: &str,
        status: Status,
    ) -> Result<Placement, OrchestratorError> {
        let current = self.store.find(code).cloned().ok_or_else(|| {
            warn!("Status update for {} ignored: not in plan", code);
            PlanError::NotFound {
                code: code.to_string(),
            }
        })?;

        if current.status == status {
            debug!("{} already {}", code, status);
            return Ok(current);
        }

        let checkpoint = self.store.clone();
        self.store.set_status(code, status)?;

        if let Err(e) = self
            .persistence
            .update_status(&self.user, &current, status)
            .await
        {
            warn!("Status update for {} not saved, rolling back: {}", code, e);
            self.store = checkpoint;
            return Err(OrchestratorError::NotSaved(e));
        }

        info!("{} marked {}", code, status);
        Ok(Placement { status, ..current })
    }

    /// Take a course out of the plan and delete its persisted record.
    pub async fn remove_course(&mut self, code: &str) -> Result<Placement, OrchestratorError> {
        let current = self.store.find(code).cloned().ok_or_else(|| {
            warn!("Removal of {} ignored: not in plan", code);
            PlanError::NotFound {
                code: code.to_string(),
            }
        })?;

        // A pending override refers to a plan that is about to change.
        self.pending = None;
        self.transition(AttemptState::Idle);

        let checkpoint = self.store.clone();
        self.store.remove_course(code);

        if let Err(e) = self.persistence.remove_course(&self.user, &current).await {
            warn!("Removal of {} not saved, rolling back: {}", code, e);
            self.store = checkpoint;
            return Err(OrchestratorError::NotSaved(e));
        }

        info!("{} removed from {}", code, current.term);
        Ok(current)
    }

    async fn run_attempt(
        &mut self,
        attempt_id: Uuid,
        request: PlacementRequest,
    ) -> Result<PlacementOutcome, OrchestratorError> {
        let candidate = self.precheck(&request)?;
        let target = request.target();

        if let PlacementRequest::Move { code, to, index } = &request {
            if self.store.find_term(code) == Some(*to) {
                // Display order only: nothing to validate or persist.
                let placement = self.store.move_course_to(code, *to, *to, *index)?;
                return Ok(PlacementOutcome::Accepted {
                    placement,
                    warning: None,
                    overridden: false,
                });
            }
        }

        self.transition(AttemptState::Validating);
        debug!(attempt = %attempt_id, "Validating {} for {}", candidate.code, target);
        let validation = self.validator.validate(&candidate, target, &self.store).await;

        match validation.result {
            ValidationResult::Valid => {
                self.transition(AttemptState::Accepted);
                let placement = self.commit(&request).await?;
                info!(attempt = %attempt_id, "{} placed in {}", placement.code(), placement.term);
                Ok(PlacementOutcome::Accepted {
                    placement,
                    warning: validation.warning,
                    overridden: false,
                })
            }
            ValidationResult::Invalid(diagnostic) => {
                self.transition(AttemptState::AwaitingOverride);
                info!(
                    attempt = %attempt_id,
                    "{} in {}: {} missing, {} misordered prerequisites",
                    candidate.code,
                    target,
                    diagnostic.missing.len(),
                    diagnostic.misordered.len()
                );
                self.pending = Some(attempt_id);
                Ok(PlacementOutcome::AwaitingOverride(PendingOverride {
                    attempt_id,
                    revision: self.store.revision(),
                    request,
                    diagnostic,
                }))
            }
        }
    }

    /// Reject requests that cannot succeed before any network call.
    fn precheck(&self, request: &PlacementRequest) -> Result<Course, PlanError> {
        let target = request.target();
        if !self.store.calendar().contains(target) {
            return Err(PlanError::TermOutOfRange(target));
        }

        match request {
            PlacementRequest::Place { course, .. } => match self.store.find_term(&course.code) {
                Some(term) => Err(PlanError::AlreadyPlaced {
                    code: course.code.clone(),
                    term,
                }),
                None => Ok(course.clone()),
            },
            PlacementRequest::Move { code, .. } => match self.store.find(code) {
                Some(placed) => Ok(placed.course.clone()),
                None => {
                    warn!("Move of {} ignored: not in plan", code);
                    Err(PlanError::NotFound { code: code.clone() })
                }
            },
        }
    }

    /// Mutate the plan, then persist. A failed save restores the plan.
    async fn commit(&mut self, request: &PlacementRequest) -> Result<Placement, OrchestratorError> {
        let checkpoint = self.store.clone();

        let (placement, previous) = match request {
            PlacementRequest::Place {
                course,
                term,
                status,
            } => (self.store.place_course(course.clone(), *term, *status)?, None),
            PlacementRequest::Move { code, to, index } => {
                let previous = self.store.find(code).cloned().ok_or_else(|| {
                    PlanError::NotFound {
                        code: code.clone(),
                    }
                })?;
                let moved = match index {
                    Some(_) => self.store.move_course_to(code, previous.term, *to, *index)?,
                    None => self.store.move_course(code, previous.term, *to)?,
                };
                (moved, Some(previous))
            }
        };

        let saved = match &previous {
            Some(previous) => self.save_move(previous, &placement).await,
            None => self.save(&placement).await,
        };

        if let Err(e) = saved {
            warn!(
                "{} in {} not saved, rolling back: {}",
                placement.code(),
                placement.term,
                e
            );
            self.store = checkpoint;
            return Err(OrchestratorError::NotSaved(e));
        }

        Ok(placement)
    }

    /// Record a new row, then its status. The plan service stores new rows as
    /// `Remaining`, so any other status needs a second write.
    async fn save(&self, placement: &Placement) -> Result<(), PersistenceError> {
        self.persistence.add_course(&self.user, placement).await?;

        if placement.status != Status::Remaining {
            if let Err(e) = self
                .persistence
                .update_status(&self.user, placement, placement.status)
                .await
            {
                self.discard(placement).await;
                return Err(e);
            }
        }
        Ok(())
    }

    /// The plan service only inserts, so a move deletes the old row before
    /// adding the new one. A failed add puts the old row back.
    async fn save_move(&self, previous: &Placement, placement: &Placement) -> Result<(), PersistenceError> {
        self.persistence.remove_course(&self.user, previous).await?;

        if let Err(e) = self.save(placement).await {
            if let Err(restore) = self.save(previous).await {
                warn!(
                    "Could not restore saved {} in {}: {}",
                    previous.code(),
                    previous.term,
                    restore
                );
            }
            return Err(e);
        }
        Ok(())
    }

    async fn discard(&self, placement: &Placement) {
        if let Err(e) = self.persistence.remove_course(&self.user, placement).await {
            warn!(
                "Could not undo saved {} in {}: {}",
                placement.code(),
                placement.term,
                e
            );
        }
    }

    fn settle(&mut self, outcome: &Result<PlacementOutcome, OrchestratorError>) {
        if !matches!(outcome, Ok(PlacementOutcome::AwaitingOverride(_))) {
            self.transition(AttemptState::Idle);
        }
    }

    fn transition(&mut self, next: AttemptState) {
        if self.state != next {
            debug!("Placement attempt {} -> {}", self.state, next);
            self.state = next;
        }
    }
}
