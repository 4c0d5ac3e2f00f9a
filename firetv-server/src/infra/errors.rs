use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;

use firetv_core::{PartyError, ProviderError, RouletteError, WatchListError};

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    pub fn bad_gateway(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_GATEWAY, message)
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::SERVICE_UNAVAILABLE, message)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": {
                "message": self.message,
                "status": self.status.as_u16(),
            }
        }));

        (self.status, body).into_response()
    }
}

impl From<PartyError> for AppError {
    fn from(err: PartyError) -> Self {
        match err {
            PartyError::Invalid(_) | PartyError::EmptyMessage => {
                Self::bad_request(err.to_string())
            }
            PartyError::DuplicateTitle(_) => Self::conflict(err.to_string()),
            PartyError::NotFound(_) => Self::not_found(err.to_string()),
            PartyError::WrongPassword => Self::forbidden(err.to_string()),
        }
    }
}

impl From<WatchListError> for AppError {
    fn from(err: WatchListError) -> Self {
        match err {
            WatchListError::Invalid(_) => Self::bad_request(err.to_string()),
            WatchListError::Duplicate => Self::conflict(err.to_string()),
            WatchListError::NotFound => Self::not_found(err.to_string()),
        }
    }
}

impl From<ProviderError> for AppError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::NotFound => Self::not_found("No matching title"),
            ProviderError::MissingApiKey(_) => {
                Self::service_unavailable(err.to_string())
            }
            ProviderError::RateLimited => Self::new(
                StatusCode::TOO_MANY_REQUESTS,
                "Upstream rate limit reached",
            ),
            _ => {
                tracing::warn!(error = %err, "metadata provider request failed");
                Self::bad_gateway(err.to_string())
            }
        }
    }
}

impl From<RouletteError> for AppError {
    fn from(err: RouletteError) -> Self {
        Self::bad_request(err.to_string())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::internal(err.to_string())
    }
}
