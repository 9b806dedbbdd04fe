// Error type for the avatar upload route.

use crate::models::UploadRejection;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Errors surfaced by POST /api/process-avatar. Every variant renders as the
/// `{success: false, message}` shape the upload page reads.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    PayloadTooLarge(String),
    UnsupportedMediaType(String),
    /// The outbound call failed; substituted with the fixed failure body.
    UpstreamFailed,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::PayloadTooLarge(msg) => (StatusCode::PAYLOAD_TOO_LARGE, msg),
            Self::UnsupportedMediaType(msg) => (StatusCode::UNSUPPORTED_MEDIA_TYPE, msg),
            Self::UpstreamFailed => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to process request".to_string(),
            ),
        };

        let body = Json(json!({
            "success": false,
            "message": message,
        }));

        (status, body).into_response()
    }
}

impl From<UploadRejection> for ApiError {
    fn from(rejection: UploadRejection) -> Self {
        match rejection {
            UploadRejection::TooLarge => Self::PayloadTooLarge(rejection.to_string()),
            UploadRejection::NotAnImage => Self::UnsupportedMediaType(rejection.to_string()),
        }
    }
}
