//! Payload shapes spoken by the planner services.

use crate::catalog::{Category, Course};
use crate::plan::{PersistedCourse, Status};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Row of `GET /subjects` and `GET /api/prerequisites/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct SubjectRow {
    pub subject_id: i64,
    pub code: String,
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

impl From<SubjectRow> for Course {
    fn from(row: SubjectRow) -> Self {
        let category = category_or_elective(&row.code, row.kind.as_deref());
        Course::new(row.subject_id, row.code, row.name, category)
    }
}

/// Row of `GET /terms`.
#[derive(Debug, Clone, Deserialize)]
pub struct TermRow {
    pub term_id: i64,
    pub term_name: String,
}

/// Row of `GET /api/user-courses/{user_id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct UserCourseRow {
    pub subject_id: i64,
    pub code: String,
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    pub term_name: String,
    #[serde(default)]
    pub status: Option<String>,
}

impl From<UserCourseRow> for PersistedCourse {
    fn from(row: UserCourseRow) -> Self {
        let category = category_or_elective(&row.code, row.kind.as_deref());
        let status = match row.status.as_deref() {
            None => Status::Remaining,
            Some(raw) => raw.parse::<Status>().unwrap_or_else(|e| {
                warn!("{} has {}; treating as Remaining", row.code, e);
                Status::Remaining
            }),
        };
        PersistedCourse {
            course: Course::new(row.subject_id, row.code, row.name, category),
            term_label: row.term_name,
            status,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AddCourseBody<'a> {
    pub user_id: &'a str,
    pub subject_id: i64,
    pub term_id: i64,
    pub status: Status,
}

#[derive(Debug, Serialize)]
pub struct UpdateStatusBody<'a> {
    pub user_id: &'a str,
    pub subject_id: i64,
    pub status: Status,
}

#[derive(Debug, Serialize)]
pub struct RemoveCourseBody<'a> {
    pub user_id: &'a str,
    pub subject_id: i64,
}

fn category_or_elective(code: &str, kind: Option<&str>) -> Category {
    match kind.map(str::parse::<Category>) {
        Some(Ok(category)) => category,
        Some(Err(e)) => {
            warn!("{}: {}; treating as elective", code, e);
            Category::Elective
        }
        None => Category::Elective,
    }
}
