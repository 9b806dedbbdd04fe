// Route handlers: three pass-through proxies and the embedded upload page.
// Each proxy issues exactly one outbound request and relays the remote status
// and JSON body verbatim; a failed relay is substituted with a fixed-shape
// failure body and HTTP 500.

use super::{
    SharedUpstream,
    error::ApiError,
    extract_upload::extract_upload,
    upstream::UpstreamResponse,
};
use crate::models::format_file_size;
use axum::{
    Json,
    extract::{Request, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use serde_json::json;
use tracing::{error, info};

// --- GET / ---
// Serves the upload page, embedded in the binary at build time.
pub async fn index() -> Html<&'static str> {
    Html(include_str!("../../static/index.html"))
}

// --- GET /api/health ---
pub async fn get_health(State(upstream): State<SharedUpstream>) -> Response {
    match upstream.health().await {
        Ok(remote) => relay(remote),
        Err(err) => {
            error!("Health API error: {}", err);
            failure(json!({ "error": "Failed to fetch health status" }))
        }
    }
}

// --- GET /api/info ---
pub async fn get_info(State(upstream): State<SharedUpstream>) -> Response {
    match upstream.info().await {
        Ok(remote) => relay(remote),
        Err(err) => {
            error!("Info API error: {}", err);
            failure(json!({ "error": "Failed to fetch API info" }))
        }
    }
}

// --- POST /api/process-avatar ---
// Extracts the image from the inbound multipart body and forwards it.
// Validation failures are rejected here, before any outbound call is made.
pub async fn process_avatar(
    State(upstream): State<SharedUpstream>,
    request: Request,
) -> Result<Response, ApiError> {
    let upload = extract_upload(request).await?;

    info!(
        "Forwarding avatar upload: {} ({})",
        upload.file_name.as_deref().unwrap_or("unnamed"),
        format_file_size(upload.data.len() as u64)
    );

    let remote = upstream.process_avatar(upload).await.map_err(|err| {
        error!("Proxy error: {}", err);
        ApiError::UpstreamFailed
    })?;

    Ok(relay(remote))
}

// Mirrors the remote status code and JSON body back to the browser.
fn relay(remote: UpstreamResponse) -> Response {
    let status =
        StatusCode::from_u16(remote.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(remote.body)).into_response()
}

fn failure(body: serde_json::Value) -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
}
