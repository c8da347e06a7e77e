use crate::calendar::Term;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Calendar span is empty: first year {first} is after last year {last}")]
    EmptyCalendar { first: i32, last: i32 },

    #[error("Calendar year {0} is outside 1000..=9999")]
    YearOutOfRange(i32),

    #[error("API base URL must not be empty")]
    MissingBaseUrl,

    #[error("retry.max_attempts must be at least 1")]
    NoRetryAttempts,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TermParseError {
    #[error("Term label '{0}' is not of the form '<Season> <year>'")]
    Malformed(String),

    #[error("Unknown season '{0}' (expected Fall, Winter or Summer)")]
    UnknownSeason(String),
}

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Course catalog unavailable: {0}")]
    Unavailable(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlanError {
    #[error("{code} is already placed in {term}")]
    AlreadyPlaced { code: String, term: Term },

    #[error("{code} is not placed in the plan")]
    NotFound { code: String },

    #[error("{0} is outside the planning calendar")]
    TermOutOfRange(Term),

    #[error("Position {index} is out of range for {term} ({len} courses)")]
    IndexOutOfRange { term: Term, index: usize, len: usize },
}

#[derive(Error, Debug)]
pub enum ValidationServiceError {
    #[error("Prerequisite service unavailable: {0}")]
    Unavailable(String),
}

#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("Plan service request failed: {0}")]
    Request(String),

    #[error("Term directory has no entry for {0}")]
    UnknownTerm(Term),

    #[error("Course {0} is not enrolled on the plan service")]
    NotEnrolled(String),
}

#[derive(Error, Debug)]
pub enum OrchestratorError {
    #[error(transparent)]
    Plan(#[from] PlanError),

    #[error("Not saved, try again: {0}")]
    NotSaved(#[source] PersistenceError),

    #[error("Override confirmation is stale; the plan changed since the warning was shown")]
    StaleOverride,
}

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: API key required or invalid")]
    Unauthorized,

    #[error("Server error: {0}")]
    Server(String),

    #[error("Malformed response: {0}")]
    Malformed(String),
}

impl From<ClientError> for CatalogError {
    fn from(err: ClientError) -> Self {
        CatalogError::Unavailable(err.to_string())
    }
}

impl From<ClientError> for ValidationServiceError {
    fn from(err: ClientError) -> Self {
        ValidationServiceError::Unavailable(err.to_string())
    }
}

impl From<ClientError> for PersistenceError {
    fn from(err: ClientError) -> Self {
        PersistenceError::Request(err.to_string())
    }
}
