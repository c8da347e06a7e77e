use crate::calendar::TermCalendar;
use crate::catalog::{CatalogSource, Course};
use crate::error::PersistenceError;
use crate::orchestrator::PlacementOrchestrator;
use crate::plan::{PlanPersistence, PlanStore, SkippedRecord};
use crate::prereq::{PrerequisiteGraph, PrerequisiteValidator};
use futures::future::join;
use std::sync::Arc;
use tracing::{info, warn};

/// Remote services a planning session talks to.
#[derive(Clone)]
pub struct Collaborators {
    pub catalog: Arc<dyn CatalogSource>,
    pub prerequisites: Arc<dyn PrerequisiteGraph>,
    pub persistence: Arc<dyn PlanPersistence>,
}

/// One user's planning session: the catalog snapshot and the owned plan.
pub struct PlannerSession {
    /// Empty when the catalog service was unavailable
    pub catalog: Vec<Course>,
    pub catalog_available: bool,
    pub orchestrator: PlacementOrchestrator,
    /// Persisted rows that could not be loaded into the plan
    pub skipped: Vec<SkippedRecord>,
}

impl PlannerSession {
    /// Fetch the catalog and the persisted plan concurrently. A catalog
    /// outage degrades to an empty catalog; a plan that cannot be loaded
    /// is an error, since edits would diverge from the record.
    pub async fn open(
        user: &str,
        calendar: TermCalendar,
        services: Collaborators,
    ) -> Result<Self, PersistenceError> {
        let (catalog, records) = join(
            services.catalog.fetch_all(),
            services.persistence.list_user_courses(user),
        )
        .await;

        let (catalog, catalog_available) = match catalog {
            Ok(courses) => (courses, true),
            Err(e) => {
                warn!("{}; continuing with an empty course picker", e);
                (Vec::new(), false)
            }
        };

        let (store, skipped) = PlanStore::hydrate(calendar, records?);
        info!(
            "Loaded plan for user {}: {} courses ({} skipped), {} in catalog",
            user,
            store.len(),
            skipped.len(),
            catalog.len()
        );

        let orchestrator = PlacementOrchestrator::new(
            user,
            store,
            PrerequisiteValidator::new(services.prerequisites),
            services.persistence,
        );

        Ok(Self {
            catalog,
            catalog_available,
            orchestrator,
            skipped,
        })
    }
}
