//! In-memory collaborators for unit tests.

use crate::calendar::Term;
use crate::catalog::{CatalogSource, Category, Course};
use crate::error::{CatalogError, PersistenceError, ValidationServiceError};
use crate::plan::{PersistedCourse, PlanPersistence, Placement, Status};
use crate::prereq::PrerequisiteGraph;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

pub fn course(id: i64, code: &str) -> Course {
    Course::new(id, code, format!("{} title", code), Category::Core)
}

pub fn term(label: &str) -> Term {
    label.parse().unwrap()
}

#[derive(Default)]
pub struct FakeGraph {
    edges: HashMap<String, Vec<Course>>,
    unreachable: bool,
    pub calls: AtomicUsize,
}

impl FakeGraph {
    pub fn unreachable() -> Self {
        Self {
            unreachable: true,
            ..Self::default()
        }
    }

    pub fn with_edge(mut self, course: Course, required: Course) -> Self {
        self.edges.entry(course.code).or_default().push(required);
        self
    }
}

#[async_trait]
impl PrerequisiteGraph for FakeGraph {
    async fn prerequisites_of(&self, course: &Course) -> Result<Vec<Course>, ValidationServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.unreachable {
            return Err(ValidationServiceError::Unavailable(
                "connection refused".to_string(),
            ));
        }
        Ok(self.edges.get(&course.code).cloned().unwrap_or_default())
    }
}

/// Records every write and keeps rows the way the plan service does:
/// adds insert a `Remaining` row, status updates and removals need an
/// existing row.
#[derive(Default)]
pub struct FakePersistence {
    pub failing: AtomicBool,
    /// Fails the next add only
    pub fail_next_add: AtomicBool,
    pub added: Mutex<Vec<(String, String, Term, Status)>>,
    pub status_updates: Mutex<Vec<(String, String, Status)>>,
    pub removed: Mutex<Vec<(String, String)>>,
    pub rows: Mutex<Vec<PersistedCourse>>,
}

impl FakePersistence {
    pub fn with_rows(rows: Vec<PersistedCourse>) -> Self {
        Self {
            rows: Mutex::new(rows),
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        let fake = Self::default();
        fake.failing.store(true, Ordering::SeqCst);
        fake
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn write_count(&self) -> usize {
        self.added.lock().unwrap().len()
            + self.status_updates.lock().unwrap().len()
            + self.removed.lock().unwrap().len()
    }

    fn check(&self) -> Result<(), PersistenceError> {
        if self.failing.load(Ordering::SeqCst) {
            Err(PersistenceError::Request("503 Service Unavailable".to_string()))
        } else {
            Ok(())
        }
    }

    fn enrolled(&self, code: &str) -> Result<(), PersistenceError> {
        if self.rows.lock().unwrap().iter().any(|r| r.course.code == code) {
            Ok(())
        } else {
            Err(PersistenceError::NotEnrolled(code.to_string()))
        }
    }
}

#[async_trait]
impl PlanPersistence for FakePersistence {
    async fn add_course(&self, user: &str, placement: &Placement) -> Result<(), PersistenceError> {
        self.check()?;
        if self.fail_next_add.swap(false, Ordering::SeqCst) {
            return Err(PersistenceError::Request("connection reset".to_string()));
        }
        self.added.lock().unwrap().push((
            user.to_string(),
            placement.course.code.clone(),
            placement.term,
            placement.status,
        ));
        self.rows.lock().unwrap().push(PersistedCourse {
            course: placement.course.clone(),
            term_label: placement.term.to_string(),
            status: Status::Remaining,
        });
        Ok(())
    }

    async fn update_status(
        &self,
        user: &str,
        placement: &Placement,
        status: Status,
    ) -> Result<(), PersistenceError> {
        self.check()?;
        self.enrolled(&placement.course.code)?;
        self.status_updates.lock().unwrap().push((
            user.to_string(),
            placement.course.code.clone(),
            status,
        ));
        for row in self.rows.lock().unwrap().iter_mut() {
            if row.course.code == placement.course.code {
                row.status = status;
            }
        }
        Ok(())
    }

    async fn remove_course(&self, user: &str, placement: &Placement) -> Result<(), PersistenceError> {
        self.check()?;
        self.enrolled(&placement.course.code)?;
        self.removed
            .lock()
            .unwrap()
            .push((user.to_string(), placement.course.code.clone()));
        self.rows
            .lock()
            .unwrap()
            .retain(|r| r.course.code != placement.course.code);
        Ok(())
    }

    async fn list_user_courses(&self, _user: &str) -> Result<Vec<PersistedCourse>, PersistenceError> {
        self.check()?;
        Ok(self.rows.lock().unwrap().clone())
    }
}

pub struct FakeCatalog {
    pub courses: Option<Vec<Course>>,
}

#[async_trait]
impl CatalogSource for FakeCatalog {
    async fn fetch_all(&self) -> Result<Vec<Course>, CatalogError> {
        self.courses
            .clone()
            .ok_or_else(|| CatalogError::Unavailable("timed out".to_string()))
    }
}
