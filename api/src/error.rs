//! # Error taxonomy and response envelope
//!
//! Every handler failure funnels through [`Error`] and leaves the process as
//! the JSON envelope `{"success": false, "message": "..."}` with the status
//! the taxonomy assigns. Storage and session failures collapse into
//! [`Error::Internal`]; their detail is logged server-side and never shown to
//! the client.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum Error {
    /// Malformed or missing input.
    #[error("{0}")]
    Validation(String),

    /// No valid session on a protected operation.
    #[error("Not Authenticated")]
    Unauthenticated,

    /// The actor is not the owner of the resource.
    #[error("{0}")]
    Forbidden(String),

    /// The referenced entity does not exist.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// A unique field is already taken.
    #[error("{0}")]
    Conflict(String),

    /// Unexpected storage or runtime failure. The payload is the internal
    /// detail; clients only ever see the generic message.
    #[error("Internal server error")]
    Internal(String),
}

impl Error {
    pub fn status(&self) -> StatusCode {
        match self {
            Error::Validation(_) => StatusCode::BAD_REQUEST,
            Error::Unauthenticated => StatusCode::UNAUTHORIZED,
            Error::Forbidden(_) => StatusCode::FORBIDDEN,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Conflict(_) => StatusCode::CONFLICT,
            Error::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        Error::Internal(format!("database error: {err}"))
    }
}

impl From<tower_sessions::session::Error> for Error {
    fn from(err: tower_sessions::session::Error) -> Self {
        Error::Internal(format!("session error: {err}"))
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        if let Error::Internal(detail) = &self {
            tracing::error!("{detail}");
        }
        let body = Json(serde_json::json!({
            "success": false,
            "message": self.to_string(),
        }));
        (self.status(), body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            Error::Validation("bad".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(Error::Unauthenticated.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            Error::Forbidden("no".into()).status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(Error::NotFound("Question").status(), StatusCode::NOT_FOUND);
        assert_eq!(
            Error::Conflict("taken".into()).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            Error::Internal("boom".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_envelope_shape() {
        let response = Error::NotFound("Question").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["success"], false);
        assert_eq!(value["message"], "Question not found");
    }

    #[tokio::test]
    async fn test_internal_detail_is_not_leaked() {
        let response = Error::Internal("password for bob is hunter2".into()).into_response();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["message"], "Internal server error");
    }
}
