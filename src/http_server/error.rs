use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::error::FestwrapError;

/// Errors returned by the HTTP handlers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error(transparent)]
    Festwrap(#[from] FestwrapError),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Festwrap(err) => match err {
                FestwrapError::NoSongsFound { .. }
                | FestwrapError::NoSongsResolved { .. }
                | FestwrapError::SongNotFound { .. }
                | FestwrapError::SetlistNotFound { .. } => StatusCode::NOT_FOUND,
                FestwrapError::NoSongsToAdd => StatusCode::BAD_REQUEST,
                FestwrapError::UnexpectedStatus { .. } | FestwrapError::Http(_) => {
                    StatusCode::BAD_GATEWAY
                }
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

// Tell axum how to convert `ApiError` into a response.
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("{self:?}");
        } else {
            tracing::debug!("Request failed with {status}: {self}");
        }

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let not_found = ApiError::from(FestwrapError::NoSongsFound {
            artist: "a".into(),
        });
        let upstream = ApiError::from(FestwrapError::UnexpectedStatus {
            expected: StatusCode::OK,
            actual: StatusCode::UNAUTHORIZED,
            body: String::new(),
        });

        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);
        assert_eq!(upstream.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(
            ApiError::BadRequest("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(FestwrapError::Cancelled).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
