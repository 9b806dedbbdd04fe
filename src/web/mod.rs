// Web server module: the browser-facing routes and the upstream relay.

mod app;
mod error;
mod extract_upload;
mod handlers;
mod listeners;
mod upstream;

pub use app::create_app;
pub use listeners::create_listener;
pub use upstream::Upstream;

use crate::models::MAX_UPLOAD_SIZE_BYTES;
use std::sync::Arc;

// Request body cap: the 10 MiB image plus headroom for multipart framing.
// The per-file limit itself is enforced in extract_upload.
pub const MAX_REQUEST_BODY_BYTES: usize = MAX_UPLOAD_SIZE_BYTES as usize + 64 * 1024;

pub type SharedUpstream = Arc<Upstream>;
