//! HTTP client for the planner services.
//!
//! One client speaks to all four collaborators behind a shared base URL:
//! - course catalog (`GET /subjects`)
//! - term directory (`GET /terms`), cached for the session
//! - prerequisite graph (`GET /api/prerequisites/{subject_id}`)
//! - plan persistence (`/api/add-course`, `/api/update-course-status`,
//!   `/api/remove-course`, `/api/user-courses/{user_id}`)
//!
//! Reads are retried with backoff on transport and server errors; writes are
//! sent once.

mod retry;
mod wire;

pub use retry::retry_with_backoff;

use crate::calendar::Term;
use crate::catalog::{CatalogSource, Course};
use crate::config::{ApiConfig, RetryConfig};
use crate::error::{CatalogError, ClientError, PersistenceError, ValidationServiceError};
use crate::plan::{PersistedCourse, PlanPersistence, Placement, Status};
use crate::prereq::PrerequisiteGraph;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::OnceCell;
use tracing::{debug, warn};

use wire::{AddCourseBody, RemoveCourseBody, SubjectRow, TermRow, UpdateStatusBody, UserCourseRow};

#[derive(Debug)]
pub struct ApiClient {
    base_url: String,
    api_key: Option<String>,
    client: Client,
    retry: RetryConfig,
    term_ids: OnceCell<HashMap<Term, i64>>,
}

impl ApiClient {
    pub fn new(api: &ApiConfig, retry: RetryConfig) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(api.timeout_sec))
            .build()?;
        Ok(Self {
            base_url: api.base_url.trim_end_matches('/').to_string(),
            api_key: api.api_key.clone(),
            client,
            retry,
            term_ids: OnceCell::new(),
        })
    }

    /// Build a request with optional auth header.
    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let mut req = self.client.request(method, &url);
        if let Some(ref key) = self.api_key {
            req = req.bearer_auth(key);
        }
        req
    }

    /// Handle response, converting HTTP errors to ClientError.
    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = response.status();
        if status.is_success() {
            let body = response.text().await?;
            serde_json::from_str(&body).map_err(|e| ClientError::Malformed(e.to_string()))
        } else {
            Err(Self::status_error(status, response).await)
        }
    }

    /// Handle response whose body is not needed.
    async fn handle_empty_response(&self, response: reqwest::Response) -> Result<(), ClientError> {
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(Self::status_error(status, response).await)
        }
    }

    async fn status_error(status: StatusCode, response: reqwest::Response) -> ClientError {
        let body = response.text().await.unwrap_or_default();
        match status {
            StatusCode::NOT_FOUND => ClientError::NotFound(body),
            StatusCode::BAD_REQUEST => ClientError::BadRequest(body),
            StatusCode::UNAUTHORIZED => ClientError::Unauthorized,
            _ => ClientError::Server(format!("{}: {}", status, body)),
        }
    }

    /// GET and decode JSON, retrying transient failures.
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        retry_with_backoff(
            &self.retry,
            || async move {
                debug!("GET {}", path);
                let response = self.request(reqwest::Method::GET, path).send().await?;
                self.handle_response(response).await
            },
            is_transient,
        )
        .await
    }

    async fn post_json<B: Serialize + Sync>(&self, path: &str, body: &B) -> Result<(), ClientError> {
        debug!("POST {}", path);
        let response = self
            .request(reqwest::Method::POST, path)
            .json(body)
            .send()
            .await?;
        self.handle_empty_response(response).await
    }

    /// Resolve a term to the directory's opaque id. The directory is fetched
    /// once per client.
    pub async fn term_id(&self, term: Term) -> Result<i64, PersistenceError> {
        let ids = self
            .term_ids
            .get_or_try_init(|| async {
                let rows: Vec<TermRow> = self.get_json("/terms").await?;
                Ok::<_, ClientError>(index_terms(rows))
            })
            .await?;

        ids.get(&term)
            .copied()
            .ok_or(PersistenceError::UnknownTerm(term))
    }
}

fn is_transient(err: &ClientError) -> bool {
    matches!(err, ClientError::Http(_) | ClientError::Server(_))
}

fn index_terms(rows: Vec<TermRow>) -> HashMap<Term, i64> {
    rows.into_iter()
        .filter_map(|row| match row.term_name.parse::<Term>() {
            Ok(term) => Some((term, row.term_id)),
            Err(e) => {
                warn!("Ignoring term directory entry {}: {}", row.term_id, e);
                None
            }
        })
        .collect()
}

#[async_trait]
impl CatalogSource for ApiClient {
    async fn fetch_all(&self) -> Result<Vec<Course>, CatalogError> {
        let rows: Vec<SubjectRow> = self.get_json("/subjects").await?;
        Ok(rows.into_iter().map(Course::from).collect())
    }
}

#[async_trait]
impl PrerequisiteGraph for ApiClient {
    async fn prerequisites_of(&self, course: &Course) -> Result<Vec<Course>, ValidationServiceError> {
        let path = format!("/api/prerequisites/{}", course.id);
        let rows: Vec<SubjectRow> = self.get_json(&path).await?;
        Ok(rows.into_iter().map(Course::from).collect())
    }
}

#[async_trait]
impl PlanPersistence for ApiClient {
    async fn add_course(&self, user: &str, placement: &Placement) -> Result<(), PersistenceError> {
        let term_id = self.term_id(placement.term).await?;
        let body = AddCourseBody {
            user_id: user,
            subject_id: placement.course.id,
            term_id,
            status: placement.status,
        };
        self.post_json("/api/add-course", &body).await?;
        Ok(())
    }

    async fn update_status(
        &self,
        user: &str,
        placement: &Placement,
        status: Status,
    ) -> Result<(), PersistenceError> {
        let body = UpdateStatusBody {
            user_id: user,
            subject_id: placement.course.id,
            status,
        };
        match self.post_json("/api/update-course-status", &body).await {
            Ok(()) => Ok(()),
            Err(ClientError::NotFound(_)) => {
                Err(PersistenceError::NotEnrolled(placement.course.code.clone()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn remove_course(&self, user: &str, placement: &Placement) -> Result<(), PersistenceError> {
        let body = RemoveCourseBody {
            user_id: user,
            subject_id: placement.course.id,
        };
        match self.post_json("/api/remove-course", &body).await {
            Ok(()) => Ok(()),
            Err(ClientError::NotFound(_)) => {
                Err(PersistenceError::NotEnrolled(placement.course.code.clone()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn list_user_courses(&self, user: &str) -> Result<Vec<PersistedCourse>, PersistenceError> {
        let path = format!("/api/user-courses/{}", user);
        let rows: Vec<UserCourseRow> = self.get_json(&path).await?;
        Ok(rows.into_iter().map(PersistedCourse::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::{Season, TermCalendar};
    use crate::catalog::Category;
    use crate::plan::PlanStore;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_index_terms_skips_unparsable_labels() {
        let rows = vec![
            TermRow {
                term_id: 1,
                term_name: "Fall 2023".to_string(),
            },
            TermRow {
                term_id: 2,
                term_name: "Intersession".to_string(),
            },
            TermRow {
                term_id: 3,
                term_name: "Winter 2024".to_string(),
            },
        ];

        let ids = index_terms(rows);
        assert_eq!(ids.len(), 2);
        assert_eq!(ids.get(&Term::new(Season::Winter, 2024)), Some(&3));
    }

    #[test]
    fn test_only_transport_and_server_errors_are_retried() {
        assert!(is_transient(&ClientError::Server("502".to_string())));
        assert!(!is_transient(&ClientError::Unauthorized));
        assert!(!is_transient(&ClientError::NotFound(String::new())));
        assert!(!is_transient(&ClientError::Malformed("eof".to_string())));
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let api = ApiConfig {
            base_url: "http://planner.test/api/".to_string(),
            api_key: None,
            timeout_sec: 5,
        };
        let client = ApiClient::new(&api, RetryConfig::default()).unwrap();
        assert_eq!(client.base_url, "http://planner.test/api");
    }

    fn client_for(server: &MockServer, api_key: Option<&str>) -> ApiClient {
        let api = ApiConfig {
            base_url: server.uri(),
            api_key: api_key.map(str::to_string),
            timeout_sec: 5,
        };
        let retry = RetryConfig {
            max_attempts: 3,
            backoff_base_ms: 1,
        };
        ApiClient::new(&api, retry).unwrap()
    }

    fn placement(term_label: &str, status: Status) -> Placement {
        let mut store = PlanStore::new(TermCalendar::new(2023, 2027).unwrap());
        let course = Course::new(7, "CSCI 2110", "Data Structures", Category::Core);
        store
            .place_course(course, term_label.parse().unwrap(), status)
            .unwrap()
    }

    async fn mount_terms(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/terms"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"term_id": 1, "term_name": "Fall 2023"},
                {"term_id": 2, "term_name": "Winter 2024"}
            ])))
            .expect(1)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_add_course_sends_directory_term_id() {
        let server = MockServer::start().await;
        mount_terms(&server).await;
        Mock::given(method("POST"))
            .and(path("/api/add-course"))
            .and(body_json(serde_json::json!({
                "user_id": "42", "subject_id": 7, "term_id": 2, "status": "Remaining"
            })))
            .respond_with(ResponseTemplate::new(201))
            .expect(2)
            .mount(&server)
            .await;

        let client = client_for(&server, None);
        let winter = placement("Winter 2024", Status::Remaining);
        client.add_course("42", &winter).await.unwrap();
        // Second add reuses the cached directory.
        client.add_course("42", &winter).await.unwrap();
    }

    #[tokio::test]
    async fn test_term_missing_from_directory_is_unknown() {
        let server = MockServer::start().await;
        mount_terms(&server).await;

        let client = client_for(&server, None);
        let err = client
            .add_course("42", &placement("Summer 2026", Status::Remaining))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            PersistenceError::UnknownTerm(term) if term == Term::new(Season::Summer, 2026)
        ));
    }

    #[tokio::test]
    async fn test_not_enrolled_on_status_update_and_removal() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/update-course-status"))
            .respond_with(ResponseTemplate::new(404).set_body_string("Course not found"))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/remove-course"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = client_for(&server, None);
        let placed = placement("Fall 2023", Status::Remaining);

        let err = client
            .update_status("42", &placed, Status::Completed)
            .await
            .unwrap_err();
        assert!(matches!(err, PersistenceError::NotEnrolled(ref code) if code == "CSCI 2110"));

        let err = client.remove_course("42", &placed).await.unwrap_err();
        assert!(matches!(err, PersistenceError::NotEnrolled(_)));
    }

    #[tokio::test]
    async fn test_server_errors_are_retried_then_reported_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/subjects"))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .expect(3)
            .mount(&server)
            .await;

        let client = client_for(&server, None);
        let err = client.fetch_all().await.unwrap_err();

        let CatalogError::Unavailable(reason) = err;
        assert!(reason.contains("503"));
    }

    #[tokio::test]
    async fn test_client_errors_are_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/subjects"))
            .respond_with(ResponseTemplate::new(401))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, None);
        assert!(client.fetch_all().await.is_err());
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/terms"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, None);
        let err = client.get_json::<Vec<TermRow>>("/terms").await.unwrap_err();
        assert!(matches!(err, ClientError::Malformed(_)));
    }

    #[tokio::test]
    async fn test_bearer_token_sent_when_configured() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/subjects"))
            .and(header("authorization", "Bearer s3cret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"subject_id": 7, "code": "CSCI 2110", "name": "Data Structures", "type": "core"}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, Some("s3cret"));
        let courses = client.fetch_all().await.unwrap();
        assert_eq!(courses.len(), 1);
        assert_eq!(courses[0].code, "CSCI 2110");
    }

    #[tokio::test]
    async fn test_user_courses_listing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/user-courses/42"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"subject_id": 7, "code": "CSCI 2110", "name": "Data Structures", "type": "core",
                 "term_id": 1, "term_name": "Fall 2023", "status": "Completed"}
            ])))
            .mount(&server)
            .await;

        let client = client_for(&server, None);
        let rows = client.list_user_courses("42").await.unwrap();
        assert_eq!(rows[0].term_label, "Fall 2023");
        assert_eq!(rows[0].status, Status::Completed);
    }
}
