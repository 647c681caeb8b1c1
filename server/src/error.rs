//! HTTP error mapping.
//!
//! One consistent policy for the whole endpoint: failures caused by the
//! caller's input become 400 responses, everything else becomes a 500
//! with a generic detail message. No partial results are ever returned.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use sketch_core::Error;

/// Error returned from request handlers
#[derive(Debug)]
pub enum ApiError {
    /// The caller sent something unusable (bad image, missing field)
    BadRequest(String),
    /// The service failed while handling a well-formed request
    Internal(String),
}

/// JSON error payload: `{"detail": "..."}`
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub detail: String,
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        if err.is_client_error() {
            ApiError::BadRequest(err.to_string())
        } else {
            ApiError::Internal(err.to_string())
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::Internal(message) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Internal Server Error: {}", message),
            ),
        };

        (status, Json(ErrorBody { detail })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bad_request_status() {
        let response = ApiError::BadRequest("bad image".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_internal_status() {
        let response = ApiError::Internal("tensor error".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_client_error_maps_to_bad_request() {
        let err = ApiError::from(Error::Image("not a png".to_string()));
        assert!(matches!(err, ApiError::BadRequest(_)));
    }

    #[test]
    fn test_server_error_maps_to_internal() {
        let err = ApiError::from(Error::Inference("device".to_string()));
        assert!(matches!(err, ApiError::Internal(_)));
    }

    #[test]
    fn test_error_body_shape() {
        let body = ErrorBody {
            detail: "Internal Server Error: boom".to_string(),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["detail"], "Internal Server Error: boom");
    }
}
