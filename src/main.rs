use std::panic;
use std::sync::Arc;
use tracing::{info, error, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};
use yjs_relay::config::Config;
use yjs_relay::routes::create_app;
use yjs_relay::AppState;

#[tokio::main]
async fn main() {

    // Set panic hook for better error messages
    panic::set_hook(Box::new(|info| {
        eprintln!("PANIC: {info}");
    }));

    // Load configuration first so it can pick the log level
    let loaded = Config::load();
    let config = loaded.as_ref().cloned().unwrap_or_default();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| config.log_filter().into()))
        .init();

    info!("Starting relay...");
    if let Err(e) = &loaded {
        error!("Failed to load configuration: {}", e);
        warn!("Using default configuration");
    }

    // The room registry lives here and is shared with every connection
    let app_state = Arc::new(AppState::from_config(&config));
    let app_routes = create_app(app_state, config.cors_origins.as_deref());

    let listener = match tokio::net::TcpListener::bind(config.server_address()).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind to {}: {}", config.server_address(), e);
            std::process::exit(1);
        }
    };

    info!("🚀 {} running on http://{}", config.service_name, config.server_address());
    info!("📡 Rooms available at ws://{}/api/yjs/<room>", config.server_address());
    info!("📚 Swagger UI available at http://{}/swagger", config.server_address());

    if let Err(e) = axum::serve(listener, app_routes).await {
        error!("Server error: {}", e);
    }
}
