use super::{MAX_REQUEST_BODY_BYTES, SharedUpstream, handlers};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, TraceLayer},
};
use tracing::Level;

pub fn create_app(upstream: SharedUpstream) -> Router {
    Router::new()
        // The upload page itself
        .route("/", get(handlers::index))
        // Pass-through proxies to the image-processing backend
        .route("/api/health", get(handlers::get_health))
        .route("/api/info", get(handlers::get_info))
        .route("/api/process-avatar", post(handlers::process_avatar))
        // Cap request bodies just above the accepted image size
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY_BYTES))
        // Add CORS layer for broader client compatibility
        .layer(CorsLayer::permissive())
        // Add tracing for HTTP requests and responses
        .layer(TraceLayer::new_for_http().make_span_with(DefaultMakeSpan::new().level(Level::INFO)))
        // Provide the shared state
        .with_state(upstream)
}
