//! Common test utilities for E2E tests

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::async_trait;
use supportchat::auth::{AuthenticatedSession, IdentityProvider, ProviderUser};
use supportchat::error::AppError;
use supportchat::{AppState, config};
use tokio::net::TcpListener;
use url::Url;

pub const APP_URL: &str = "http://localhost:3000";
pub const SCALEKIT_URL: &str = "https://supportchat-test.scalekit.dev";

/// Test server instance
pub struct TestServer {
    pub addr: String,
    pub state: AppState,
    pub client: reqwest::Client,
}

/// Build a configuration pointing at `scalekit_url`
pub fn test_config(scalekit_url: &str) -> config::AppConfig {
    config::AppConfig {
        server: config::ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0, // Let OS assign port
            app_url: APP_URL.to_string(),
        },
        auth: config::AuthConfig {
            session_secret: "test-secret-key-32-bytes-long!!!".to_string(),
            session_max_age: 604800,
            secure_cookies: None,
        },
        scalekit: config::ScalekitConfig {
            environment_url: scalekit_url.to_string(),
            client_id: "skc_test_client".to_string(),
            client_secret: "test-client-secret".to_string(),
            scopes: "openid profile email".to_string(),
        },
        site: config::SiteConfig::default(),
        logging: config::LoggingConfig {
            level: "info".to_string(),
            format: "pretty".to_string(),
        },
    }
}

impl TestServer {
    /// Server backed by the real Scalekit client (no network needed for login)
    pub async fn new() -> Self {
        Self::with_config(test_config(SCALEKIT_URL)).await
    }

    pub async fn with_config(config: config::AppConfig) -> Self {
        let state = AppState::new(config).unwrap();
        Self::start(state).await
    }

    /// Server backed by a stub identity provider
    pub async fn with_provider(provider: Arc<dyn IdentityProvider>) -> Self {
        let state = AppState::with_provider(test_config(SCALEKIT_URL), provider);
        Self::start(state).await
    }

    async fn start(state: AppState) -> Self {
        supportchat::metrics::init_metrics();

        // Redirects are asserted on, never followed
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .unwrap();

        // Bind to random port
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let addr_str = format!("http://{}", addr);

        let app = supportchat::build_router(state.clone());

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr: addr_str,
            state,
            client,
        }
    }

    /// Get base URL for requests
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.addr, path)
    }

    /// Cookie header for a signed-in user
    pub fn session_cookie_header(&self, email: &str) -> String {
        use supportchat::auth::{SessionProfile, create_session_token};

        let profile = SessionProfile::new(
            email,
            Some("Test User".to_string()),
            self.state.config.auth.session_max_age,
        );
        let token = create_session_token(&profile, &self.state.config.auth.session_secret)
            .expect("Failed to create test session");
        format!("access_token=test-access-token; session={token}")
    }
}

/// Stub provider answering every exchange the same way
pub struct StubProvider {
    result: Result<AuthenticatedSession, fn() -> AppError>,
    /// `(code, redirect_uri)` pairs seen by `authenticate_with_code`
    pub exchanges: Mutex<Vec<(String, String)>>,
}

impl StubProvider {
    pub fn returning_token(token: &str, email: &str) -> Arc<Self> {
        Arc::new(Self {
            result: Ok(AuthenticatedSession {
                access_token: token.to_string(),
                user: ProviderUser {
                    id: "usr_test".to_string(),
                    email: Some(email.to_string()),
                    name: Some("Test User".to_string()),
                },
            }),
            exchanges: Mutex::new(Vec::new()),
        })
    }

    /// Exchange succeeds but the provider reports no email
    pub fn returning_without_email(token: &str) -> Arc<Self> {
        Arc::new(Self {
            result: Ok(AuthenticatedSession {
                access_token: token.to_string(),
                user: ProviderUser {
                    id: "usr_test".to_string(),
                    email: None,
                    name: None,
                },
            }),
            exchanges: Mutex::new(Vec::new()),
        })
    }

    pub fn failing_with(error: fn() -> AppError) -> Arc<Self> {
        Arc::new(Self {
            result: Err(error),
            exchanges: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl IdentityProvider for StubProvider {
    fn authorization_url(&self, redirect_uri: &str) -> Result<Url, AppError> {
        let mut url = Url::parse(&format!("{SCALEKIT_URL}/oauth/authorize")).unwrap();
        url.query_pairs_mut()
            .append_pair("redirect_uri", redirect_uri);
        Ok(url)
    }

    async fn authenticate_with_code(
        &self,
        code: &str,
        redirect_uri: &str,
    ) -> Result<AuthenticatedSession, AppError> {
        self.exchanges
            .lock()
            .unwrap()
            .push((code.to_string(), redirect_uri.to_string()));

        match &self.result {
            Ok(session) => Ok(session.clone()),
            Err(make_error) => Err(make_error()),
        }
    }
}

/// All `Set-Cookie` header values of a response
pub fn set_cookies(response: &reqwest::Response) -> Vec<String> {
    response
        .headers()
        .get_all(reqwest::header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok().map(ToString::to_string))
        .collect()
}

/// `Set-Cookie` value for cookie `name`
pub fn find_cookie(response: &reqwest::Response, name: &str) -> Option<String> {
    let prefix = format!("{name}=");
    set_cookies(response)
        .into_iter()
        .find(|value| value.starts_with(&prefix))
}

/// `Location` header of a redirect
pub fn location(response: &reqwest::Response) -> String {
    response
        .headers()
        .get(reqwest::header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .expect("location header")
        .to_string()
}
