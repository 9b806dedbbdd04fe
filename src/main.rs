// Main entry point for the avatar-web server.
// Parses configuration, initializes logging, builds the relay client and the
// Axum router, and runs the HTTP server until a shutdown signal arrives.

use avatar_web::shutdown_signal::shutdown_signal;
use avatar_web::web::{Upstream, create_app, create_listener};
use clap::Parser;
use std::sync::Arc;

/// Command line arguments for avatar-web
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct AppConfig {
    /// Hostname/IP to bind the server to.
    /// If this option is specified without value, it will default to "*", meaning the server will listen on all interfaces.
    #[arg(long, env = "AVATAR_WEB_HOST", default_value = "localhost", num_args = 0..=1, default_missing_value = "*")]
    host: String,

    /// Port number to listen on.
    #[arg(short, long, env = "AVATAR_WEB_PORT", default_value_t = 3000)]
    port: u16,

    /// Base URL of the remote image-processing service.
    #[arg(
        long,
        env = "AVATAR_WEB_UPSTREAM_URL",
        default_value = "http://31.97.135.175:8989"
    )]
    upstream_url: String,
}

#[tokio::main]
async fn main() {
    // Parse command line args and environment variables
    let config = AppConfig::parse();

    // Initialize tracing subscriber for structured logging.
    // Logs will go to stdout. Adjust level and format as needed.
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("Starting avatar-web...");
    tracing::info!("Upstream service set to: {}", config.upstream_url);

    // --- Initialize the relay client ---
    let upstream = match Upstream::new(&config.upstream_url) {
        Ok(upstream) => Arc::new(upstream),
        Err(err) => {
            tracing::error!("FATAL: Failed to create upstream HTTP client: {}", err);
            eprintln!("FATAL: Could not create HTTP client. Error: {}. Exiting.", err);
            std::process::exit(1);
        }
    };

    // --- Build Axum Application Router ---
    let app = create_app(upstream);
    tracing::info!("Axum router configured.");

    // --- Start HTTP Server ---
    let listener = match create_listener(&config.host, config.port).await {
        Ok((addr, listener)) => {
            tracing::info!("Server successfully bound. Listening on {}", addr);
            listener
        }
        Err(err) => {
            tracing::error!("FATAL: Failed to bind server: {}", err);
            eprintln!("FATAL: Could not bind server. Error: {}. Exiting.", err);
            std::process::exit(1);
        }
    };

    // Run the server.
    if let Err(err) = axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!("Server run error: {}", err);
        eprintln!("ERROR: Server shut down unexpectedly. Error: {}", err);
    }

    tracing::info!("avatar-web has shut down.");
}
