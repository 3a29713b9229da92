// HTTP error handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::fmt;
use streamsource_core::resolver::{ResolutionFailure, Stage};

/// Result type for HTTP handlers
pub type AppResult<T> = Result<T, AppError>;

/// One provider's attempt, as reported to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttemptSummary {
    pub provider: String,
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<Stage>,
    pub detail: String,
    pub elapsed_ms: u64,
}

/// Application error with HTTP status code
#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
    pub attempts: Option<Vec<AttemptSummary>>,
}

impl AppError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            attempts: None,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn bad_gateway(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_GATEWAY, message)
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    /// 404 carrying every provider's attempt
    pub fn no_sources(failure: &ResolutionFailure) -> Self {
        let attempts = failure
            .attempts
            .iter()
            .map(|report| AttemptSummary {
                provider: report.provider.clone(),
                kind: report.attempt.kind(),
                stage: report.attempt.stage(),
                detail: report.attempt.to_string(),
                elapsed_ms: report.elapsed.as_millis() as u64,
            })
            .collect();
        Self {
            attempts: Some(attempts),
            ..Self::not_found("no sources found")
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.status, self.message)
    }
}

impl std::error::Error for AppError {}

/// Error response JSON structure
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
    status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    attempts: Option<Vec<AttemptSummary>>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status;
        let body = Json(ErrorResponse {
            error: self.message,
            status: status.as_u16(),
            attempts: self.attempts,
        });

        (status, body).into_response()
    }
}

/// Convert streamsource_core errors to HTTP errors
impl From<streamsource_core::Error> for AppError {
    fn from(err: streamsource_core::Error) -> Self {
        use streamsource_core::Error;

        match err {
            Error::InvalidInput(msg) => Self::bad_request(msg),
            Error::UnknownProvider(key) => Self::bad_request(format!("unknown provider: {key}")),
            Error::NoSources(failure) => Self::no_sources(&failure),
            Error::NotFound(msg) => Self::not_found(msg),
            Error::MetadataUnavailable(msg) => {
                tracing::warn!("Metadata unavailable: {}", msg);
                Self::bad_gateway("metadata service unavailable")
            }
            Error::NoProviders => {
                tracing::error!("No providers configured");
                Self::internal_server_error("no providers configured")
            }
        }
    }
}
