use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Error body shared by every non-scrape failure the API reports.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub success: bool,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

// Custom error types for the API
#[derive(Debug)]
pub enum ApiError {
    Validation(Vec<String>),
    NotFound,
    TooManyRequests,
    InternalServerError(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::TooManyRequests => StatusCode::TOO_MANY_REQUESTS,
            ApiError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn body(&self) -> ErrorBody {
        let (error, details, message) = match self {
            ApiError::Validation(details) => ("Validation failed", Some(details.clone()), None),
            ApiError::NotFound => ("Endpoint not found", None, None),
            ApiError::TooManyRequests => (
                "Too many requests from this IP, please try again later.",
                None,
                None,
            ),
            ApiError::InternalServerError(message) => {
                ("Internal server error", None, Some(message.clone()))
            }
        };

        ErrorBody {
            success: false,
            error: error.to_string(),
            details,
            message,
        }
    }
}

impl From<crate::AppError> for ApiError {
    fn from(err: crate::AppError) -> Self {
        match err {
            crate::AppError::Validation(details) => ApiError::Validation(details),
            other => ApiError::InternalServerError(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("API error: {:?}", self);
        } else {
            tracing::debug!("API client error: {:?}", self);
        }

        (status, Json(self.body())).into_response()
    }
}
