use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Failure talking to an external data collaborator.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("Upstream returned status {0}")]
    Status(u16),

    #[error("Malformed response: {0}")]
    Malformed(String),
}

/// Errors terminating a single analysis request.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("No price data available")]
    InsufficientData,

    #[error("Insufficient history: {len} samples, need at least {required}")]
    InsufficientHistory { len: usize, required: usize },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Market data unavailable: {0}")]
    Fetch(#[from] FetchError),
}

/// Errors from the per-user session flow.
#[derive(Error, Debug, PartialEq)]
pub enum SessionError {
    /// User input could not be parsed; the user may retry.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Action '{action}' not allowed in state '{state}'")]
    InvalidTransition { action: String, state: String },

    #[error("Alert rule not found: {0}")]
    RuleNotFound(uuid::Uuid),
}

/// Application error types.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Fetch(#[from] FetchError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Analysis(AnalysisError::Fetch(_)) | AppError::Fetch(_) => {
                StatusCode::BAD_GATEWAY
            }
            AppError::Analysis(_) => StatusCode::BAD_REQUEST,
            AppError::Session(SessionError::InvalidInput(_)) => StatusCode::BAD_REQUEST,
            AppError::Session(SessionError::InvalidTransition { .. }) => StatusCode::CONFLICT,
            AppError::Session(SessionError::RuleNotFound(_)) => StatusCode::NOT_FOUND,
        };

        let body = Json(json!({
            "error": self.to_string(),
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
