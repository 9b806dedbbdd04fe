// avatar-web: browser-facing upload UI for a remote avatar-processing
// service. Serves the upload page and relays /api/* requests to the backend.

pub mod models;
pub mod shutdown_signal;
pub mod view;
pub mod web;
