use http::StatusCode;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaskSyncError {
    #[error("Task not found: {0}")]
    TaskNotFound(String),

    #[error("JSON error: {0}")]
    Json(String),

    #[error("IO error: {0}")]
    Io(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, TaskSyncError>;

impl From<std::io::Error> for TaskSyncError {
    fn from(e: std::io::Error) -> Self {
        TaskSyncError::Io(e.to_string())
    }
}

impl From<serde_json::Error> for TaskSyncError {
    fn from(e: serde_json::Error) -> Self {
        TaskSyncError::Json(e.to_string())
    }
}

impl TaskSyncError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            TaskSyncError::TaskNotFound(_) => StatusCode::NOT_FOUND,
            TaskSyncError::Json(_) => StatusCode::BAD_REQUEST,
            TaskSyncError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
            TaskSyncError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            TaskSyncError::TaskNotFound(_) => "task_not_found",
            TaskSyncError::Json(_) => "json_error",
            TaskSyncError::Io(_) => "io_error",
            TaskSyncError::Config(_) => "config_error",
        }
    }
}

// Axum IntoResponse implementation (feature-gated)
#[cfg(feature = "axum-support")]
use axum::response::{IntoResponse, Json, Response};
#[cfg(feature = "axum-support")]
use serde::Serialize;

#[cfg(feature = "axum-support")]
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub request_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

#[cfg(feature = "axum-support")]
impl IntoResponse for TaskSyncError {
    fn into_response(self) -> Response {
        let message = match &self {
            TaskSyncError::TaskNotFound(id) => format!("Task '{}' does not exist", id),
            other => other.to_string(),
        };
        let suggestion = match &self {
            TaskSyncError::TaskNotFound(_) => {
                Some("List existing tasks with GET /tasks".to_string())
            }
            TaskSyncError::Json(_) => Some("Check the request body is a task object".to_string()),
            _ => None,
        };

        let error_response = ErrorResponse {
            error: self.error_code().to_string(),
            message,
            request_id: format!("req_ts_{}", uuid::Uuid::new_v4()),
            suggestion,
        };

        (self.status_code(), Json(error_response)).into_response()
    }
}
