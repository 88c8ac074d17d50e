use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid electricity cost")]
    InvalidCost,

    #[error("No valid appliances provided")]
    NoValidAppliances,

    #[error("Invalid request body")]
    InvalidRequest(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidCost | AppError::NoValidAppliances | AppError::InvalidRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::Config(_) | AppError::Yaml(_) | AppError::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error_message = match self {
            AppError::InvalidRequest(ref detail) => {
                tracing::debug!("Rejected request body: {}", detail);
                self.to_string()
            }
            AppError::Config(_) | AppError::Yaml(_) | AppError::Io(_) => {
                tracing::error!("Internal error: {}", self);
                "Internal server error".to_string()
            }
            _ => self.to_string(),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
