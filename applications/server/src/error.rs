/// Server error types
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use cadence_core::{CadenceError, ErrorKind};
use serde_json::json;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ServerError>;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Core(#[from] CadenceError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
}

impl From<cadence_storage::StorageError> for ServerError {
    fn from(err: cadence_storage::StorageError) -> Self {
        ServerError::Core(err.into())
    }
}

impl From<JsonRejection> for ServerError {
    fn from(rejection: JsonRejection) -> Self {
        ServerError::BadRequest(rejection.body_text())
    }
}

impl ServerError {
    /// HTTP status and machine-readable code
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ServerError::Auth(_) | ServerError::Jwt(_) => {
                (StatusCode::UNAUTHORIZED, "UNAUTHORIZED")
            }
            ServerError::BadRequest(_) => (StatusCode::BAD_REQUEST, "INVALID_ARGUMENT"),
            ServerError::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL"),
            ServerError::Core(e) => {
                let status = match e.kind() {
                    ErrorKind::NotFound => StatusCode::NOT_FOUND,
                    ErrorKind::InvalidArgument => StatusCode::BAD_REQUEST,
                    ErrorKind::Conflict => StatusCode::CONFLICT,
                    ErrorKind::PermissionDenied => StatusCode::FORBIDDEN,
                    ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
                };
                (status, e.code())
            }
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = match &self {
            _ if status == StatusCode::INTERNAL_SERVER_ERROR => {
                tracing::error!(error = %self, "request failed");
                "Internal server error".to_string()
            }
            ServerError::Jwt(e) => {
                tracing::warn!("Token verification failed: {}", e);
                "Invalid token".to_string()
            }
            other => other.to_string(),
        };

        let body = Json(json!({
            "error": message,
            "code": code,
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadence_core::TrackId;

    #[test]
    fn core_errors_map_to_http_status() {
        let cases = [
            (CadenceError::NoActivePlayback, StatusCode::NOT_FOUND, "NO_ACTIVE_PLAYBACK"),
            (CadenceError::NoNextTrack, StatusCode::NOT_FOUND, "NO_NEXT_TRACK"),
            (
                CadenceError::TrackNotFound(TrackId::new("t")),
                StatusCode::NOT_FOUND,
                "TRACK_NOT_FOUND",
            ),
            (
                CadenceError::invalid_argument("bad"),
                StatusCode::BAD_REQUEST,
                "INVALID_ARGUMENT",
            ),
            (CadenceError::conflict("dup"), StatusCode::CONFLICT, "CONFLICT"),
            (CadenceError::PermissionDenied, StatusCode::FORBIDDEN, "PERMISSION_DENIED"),
            (CadenceError::storage("disk"), StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL"),
        ];

        for (err, status, code) in cases {
            assert_eq!(ServerError::from(err).status_and_code(), (status, code));
        }
    }

    #[test]
    fn bad_request_is_invalid_argument() {
        let err = ServerError::BadRequest("missing field `track_id`".to_string());
        assert_eq!(
            err.status_and_code(),
            (StatusCode::BAD_REQUEST, "INVALID_ARGUMENT")
        );
    }

    #[test]
    fn auth_errors_are_unauthorized() {
        let err = ServerError::Auth("missing token".to_string());
        assert_eq!(err.status_and_code(), (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"));
    }
}
