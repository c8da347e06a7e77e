//! Plan store: which course sits in which term, with what status.

mod store;
mod types;

pub use store::{PlanStore, SkippedRecord};
pub use types::{PersistedCourse, Placement, PlacementId, Status};

use crate::error::PersistenceError;
use async_trait::async_trait;

/// Remote record of a student's plan.
#[async_trait]
pub trait PlanPersistence: Send + Sync {
    /// Record `placement`'s course under its term (and status) for `user`.
    async fn add_course(&self, user: &str, placement: &Placement) -> Result<(), PersistenceError>;

    async fn update_status(
        &self,
        user: &str,
        placement: &Placement,
        status: Status,
    ) -> Result<(), PersistenceError>;

    /// Delete the record of `placement`'s course for `user`.
    async fn remove_course(&self, user: &str, placement: &Placement) -> Result<(), PersistenceError>;

    async fn list_user_courses(&self, user: &str) -> Result<Vec<PersistedCourse>, PersistenceError>;
}
