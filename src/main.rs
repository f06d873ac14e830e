//! SupportChat binary entry point

use supportchat::{AppState, config};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Application entry point
///
/// # Setup
/// 1. Load configuration from file and environment
/// 2. Initialize tracing/logging from the `[logging]` section
/// 3. Initialize metrics
/// 4. Initialize AppState
/// 5. Build Axum router and start HTTP server
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration (reported once logging is up)
    let loaded = config::AppConfig::load();

    // 2. Initialize tracing/logging; RUST_LOG wins over logging.level
    let logging = match &loaded {
        Ok(config) => config.logging.clone(),
        Err(_) => config::LoggingConfig::default(),
    };
    init_tracing(&logging);

    let config = match loaded {
        Ok(config) => config,
        Err(error) => {
            tracing::error!(%error, "Failed to load configuration");
            return Err(error.into());
        }
    };

    tracing::info!("Starting SupportChat...");
    tracing::info!(
        app_url = %config.server.app_url,
        callback_url = %config.server.callback_url(),
        "Configuration loaded"
    );
    if !config.should_use_secure_cookies() {
        tracing::warn!(
            app_url = %config.server.app_url,
            "Session cookies are sent without the Secure attribute"
        );
    }

    // 3. Initialize metrics
    supportchat::metrics::init_metrics();

    // 4. Initialize application state
    let state = AppState::new(config.clone())?;

    // 5. Build Axum router and serve
    let app = supportchat::build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);
    tracing::info!("Public URL: {}", config.server.base_url());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

fn init_tracing(logging: &config::LoggingConfig) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| logging.filter_directive().into());

    if logging.is_json() {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}

/// Resolve on Ctrl+C
async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!(%error, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
