//! Network boundary: the GraphQL patient mutations and the patient
//! experience (pxp) REST endpoint.
//!
//! Callers depend on the [`PatientApi`] and [`PxpApi`] traits; the
//! reqwest-backed clients are the production implementations.

mod graphql;
mod pxp;

pub use graphql::*;
pub use pxp::*;

use chrono::NaiveDate;
use thiserror::Error;

use crate::form::PatientPayload;
use crate::models::AoeAnswers;

/// Network errors.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Cannot connect to {0}")]
    Connection(String),

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Server returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("GraphQL error: {}", .0.join("; "))]
    GraphQl(Vec<String>),

    #[error("Response parsing error: {0}")]
    ResponseParsing(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

/// The two patient mutations. Success carries no data the caller uses.
pub trait PatientApi {
    fn create_patient(&self, payload: &PatientPayload) -> ApiResult<()>;

    fn update_patient(&self, patient_id: &str, payload: &PatientPayload) -> ApiResult<()>;
}

/// Patient experience endpoints used by the time-of-test flow.
pub trait PxpApi {
    fn submit_questions(
        &self,
        patient_link_id: &str,
        birth_date: NaiveDate,
        answers: &AoeAnswers,
    ) -> ApiResult<()>;
}

/// Map a reqwest failure onto [`ApiError`].
fn transport_error(err: reqwest::Error, target: &str, timeout_secs: u64) -> ApiError {
    if err.is_connect() {
        ApiError::Connection(target.to_string())
    } else if err.is_timeout() {
        ApiError::HttpClient(format!("Request timed out after {}s", timeout_secs))
    } else {
        ApiError::HttpClient(err.to_string())
    }
}

fn build_http_client(timeout_secs: u64) -> ApiResult<reqwest::blocking::Client> {
    reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| ApiError::HttpClient(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graphql_error_message_joins() {
        let err = ApiError::GraphQl(vec!["firstName is required".into(), "bad zip".into()]);
        assert_eq!(
            err.to_string(),
            "GraphQL error: firstName is required; bad zip"
        );
    }

    #[test]
    fn test_status_error_message() {
        let err = ApiError::Status {
            status: 500,
            body: "boom".into(),
        };
        assert_eq!(err.to_string(), "Server returned 500: boom");
    }

    #[test]
    fn test_build_http_client() {
        assert!(build_http_client(5).is_ok());
    }
}
