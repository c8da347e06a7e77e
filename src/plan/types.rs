use crate::calendar::{Season, Term};
use crate::catalog::Course;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Progress of a placed course.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    #[default]
    Remaining,
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Remaining => write!(f, "Remaining"),
            Status::InProgress => write!(f, "In Progress"),
            Status::Completed => write!(f, "Completed"),
        }
    }
}

impl FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .collect();
        match normalized.as_str() {
            "remaining" => Ok(Status::Remaining),
            "inprogress" => Ok(Status::InProgress),
            "completed" | "done" => Ok(Status::Completed),
            _ => Err(format!("Unknown status: {}", s)),
        }
    }
}

/// Locally minted placement id: season initial plus a per-term sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlacementId {
    pub season: Season,
    pub seq: u32,
}

impl fmt::Display for PlacementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.season.prefix(), self.seq)
    }
}

impl Serialize for PlacementId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Placement {
    pub id: PlacementId,
    pub course: Course,
    pub term: Term,
    pub status: Status,
}

impl Placement {
    pub fn code(&self) -> &str {
        &self.course.code
    }
}

/// One course row of a persisted plan, as listed by the plan service.
#[derive(Debug, Clone, PartialEq)]
pub struct PersistedCourse {
    pub course: Course,
    /// Raw term label; parsed during hydration
    pub term_label: String,
    pub status: Status,
}
