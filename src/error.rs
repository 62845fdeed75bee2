use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

const GENERIC_MESSAGE: &str = "Something went wrong";

/// A single violated field constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("validation failed: {} violation(s)", .0.len())]
    Validation(Vec<FieldError>),
    #[error("persistence: {0:#}")]
    Persistence(#[from] anyhow::Error),
    #[error("bad request: {0}")]
    BadRequest(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) | AppError::Persistence(_) | AppError::BadRequest(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            AppError::NotFound(entity) => {
                warn!(%entity, "lookup by uuid failed");
                json!({ "error": format!("{entity} not found") })
            }
            AppError::Validation(errors) => {
                warn!(violations = errors.len(), "validation failed");
                json!({ "error": "Validation failed", "errors": errors })
            }
            AppError::Persistence(e) => {
                let detail = format!("{e:#}");
                error!(error = %detail, "storage operation failed");
                json!({ "error": GENERIC_MESSAGE })
            }
            AppError::BadRequest(reason) => {
                error!(%reason, "unreadable request");
                json!({ "error": GENERIC_MESSAGE })
            }
        };
        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rej: JsonRejection) -> Self {
        AppError::BadRequest(rej.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rej: QueryRejection) -> Self {
        AppError::BadRequest(rej.body_text())
    }
}

pub type AppResult<T> = Result<T, AppError>;
