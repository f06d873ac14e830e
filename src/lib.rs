//! SupportChat - landing page and login flow
//!
//! # Architecture
//!
//! ```text
//! browser ──GET /api/auth/login──────► 302 to identity provider
//!    │                                        │
//!    │◄──────── redirect with ?code= ─────────┘
//!    │
//!    ├──GET /api/auth/callback?code=──► exchange code (IdentityProvider)
//!    │                                  set access_token + session cookies
//!    │◄───────────────────────────────── 302 to /
//!    │
//!    ├──GET /──────────────────────────► landing page (Login or account menu)
//!    └──POST /api/auth/logout─────────► clear cookies, 200
//! ```
//!
//! # Modules
//!
//! - `api`: landing page, dashboard and metrics handlers
//! - `auth`: identity provider client, session cookies, login flow
//! - `config`: Configuration management
//! - `error`: Error types
//! - `metrics`: Prometheus instruments

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod metrics;

use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<config::AppConfig>,

    /// Authorization server used by the login flow
    pub provider: Arc<dyn auth::IdentityProvider>,
}

impl AppState {
    /// Initialize application state with the Scalekit client
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be built
    pub fn new(config: config::AppConfig) -> Result<Self, error::AppError> {
        let http_client = reqwest::Client::builder()
            .user_agent(concat!("SupportChat/", env!("CARGO_PKG_VERSION")))
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| error::AppError::Internal(e.into()))?;

        let provider = auth::ScalekitClient::new(&config.scalekit, http_client);
        tracing::info!(
            environment_url = %config.scalekit.environment_url,
            "Scalekit client initialized"
        );

        Ok(Self::with_provider(config, Arc::new(provider)))
    }

    /// Initialize application state with an explicit identity provider
    pub fn with_provider(
        config: config::AppConfig,
        provider: Arc<dyn auth::IdentityProvider>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            provider,
        }
    }
}

/// Build the Axum router with all routes.
///
/// This is shared by the binary and integration tests to keep route
/// composition consistent across environments.
pub fn build_router(state: AppState) -> axum::Router {
    use axum::Router;
    use tower_http::{compression::CompressionLayer, trace::TraceLayer};

    let cors_layer = build_cors_layer(&state.config.server);

    Router::new()
        .route("/health", axum::routing::get(health_check))
        .merge(api::pages_router())
        .nest("/api/auth", auth::auth_router())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .with_state(state)
        .merge(api::metrics_router())
}

fn build_cors_layer(server: &config::ServerConfig) -> tower_http::cors::CorsLayer {
    use axum::http::{HeaderValue, Method};
    use tower_http::cors::{Any, CorsLayer};

    let allowed_origin = server.base_url();
    match HeaderValue::from_str(&allowed_origin) {
        Ok(origin) => CorsLayer::new()
            .allow_origin([origin])
            .allow_methods([Method::GET, Method::POST])
            .allow_headers(Any),
        Err(error) => {
            tracing::error!(
                %error,
                origin = %allowed_origin,
                "Failed to parse CORS origin from app URL; denying cross-origin requests"
            );
            CorsLayer::new()
        }
    }
}

async fn health_check() -> &'static str {
    "OK"
}
