//! Configuration management
//!
//! Loads configuration from:
//! 1. Default values
//! 2. Configuration file (config/local.toml)
//! 3. Environment variables (override)

use serde::Deserialize;
use url::Url;

/// Path the identity provider redirects back to after authorization.
pub const CALLBACK_PATH: &str = "/api/auth/callback";

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub scalekit: ScalekitConfig,
    #[serde(default)]
    pub site: SiteConfig,
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0")
    pub host: String,
    /// Port number (e.g., 3000)
    pub port: u16,
    /// Public base URL of the application (e.g., "https://supportchat.example.com")
    ///
    /// Also read from `NEXT_PUBLIC_APP_URL`.
    pub app_url: String,
}

impl ServerConfig {
    /// Get the base URL without a trailing slash
    pub fn base_url(&self) -> String {
        self.app_url.trim().trim_end_matches('/').to_string()
    }

    /// Fixed OAuth redirect target, identical for authorization and token exchange
    pub fn callback_url(&self) -> String {
        format!("{}{}", self.base_url(), CALLBACK_PATH)
    }

    /// Application root the callback sends the browser to
    pub fn home_url(&self) -> String {
        format!("{}/", self.base_url())
    }

    fn is_https(&self) -> bool {
        Url::parse(self.app_url.trim())
            .map(|url| url.scheme() == "https")
            .unwrap_or(false)
    }
}

/// Session cookie configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Key for signing the session profile cookie (32+ bytes)
    pub session_secret: String,
    /// Session max age in seconds (default: 604800 = 7 days)
    pub session_max_age: i64,
    /// Force the `Secure` cookie attribute on or off.
    ///
    /// Defaults to on when `server.app_url` is https.
    pub secure_cookies: Option<bool>,
}

/// Scalekit OAuth configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ScalekitConfig {
    /// Environment URL (e.g., "https://supportchat.scalekit.dev")
    pub environment_url: String,
    pub client_id: String,
    pub client_secret: String,
    /// Space separated OAuth scopes
    pub scopes: String,
}

/// Landing page content
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    #[serde(default = "default_product_name")]
    pub product_name: String,
    #[serde(default = "default_headline")]
    pub headline: String,
    #[serde(default = "default_tagline")]
    pub tagline: String,
    #[serde(default = "default_features")]
    pub features: Vec<FeatureConfig>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            product_name: default_product_name(),
            headline: default_headline(),
            tagline: default_tagline(),
            features: default_features(),
        }
    }
}

/// One entry of the static feature list
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct FeatureConfig {
    pub title: String,
    pub description: String,
}

fn default_product_name() -> String {
    "SupportChat".to_string()
}

fn default_headline() -> String {
    "Customer support that answers itself".to_string()
}

fn default_tagline() -> String {
    "Drop an AI chat widget on your site, train it on your docs, and hand off to humans when it matters."
        .to_string()
}

fn default_features() -> Vec<FeatureConfig> {
    [
        (
            "Instant answers",
            "Replies to common questions in seconds, around the clock.",
        ),
        (
            "Trained on your content",
            "Point it at your docs and help center; answers stay on-brand.",
        ),
        (
            "Human handoff",
            "Escalates tricky conversations to your team with full context.",
        ),
        (
            "One-line embed",
            "Add a single script tag and the widget appears on every page.",
        ),
    ]
    .into_iter()
    .map(|(title, description)| FeatureConfig {
        title: title.to_string(),
        description: description.to_string(),
    })
    .collect()
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    pub level: String,
    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl LoggingConfig {
    /// Filter used when `RUST_LOG` is not set
    pub fn filter_directive(&self) -> String {
        format!("supportchat={},tower_http=debug", self.level.trim().to_ascii_lowercase())
    }

    pub fn is_json(&self) -> bool {
        self.format.trim().eq_ignore_ascii_case("json")
    }
}

impl AppConfig {
    /// Load configuration from file and environment
    ///
    /// # Loading Order
    /// 1. Default values
    /// 2. config/default.toml (if exists)
    /// 3. config/local.toml (if exists)
    /// 4. Environment variables (SUPPORTCHAT__*)
    /// 5. NEXT_PUBLIC_APP_URL (if set)
    ///
    /// # Errors
    /// Returns error if configuration is missing or invalid
    pub fn load() -> Result<Self, crate::error::AppError> {
        use config::{Config, Environment, File};

        let config = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("server.app_url", "http://localhost:3000")?
            .set_default("auth.session_max_age", 604800)?
            .set_default("scalekit.scopes", "openid profile email")?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "pretty")?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(
                Environment::with_prefix("SUPPORTCHAT")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("server.app_url", std::env::var("NEXT_PUBLIC_APP_URL").ok())?
            .build()
            .map_err(|e| crate::error::AppError::Config(e.to_string()))?;

        let app_config: Self = config
            .try_deserialize()
            .map_err(|e| crate::error::AppError::Config(e.to_string()))?;
        app_config.validate()?;
        Ok(app_config)
    }

    pub fn should_use_secure_cookies(&self) -> bool {
        self.auth
            .secure_cookies
            .unwrap_or_else(|| self.server.is_https())
    }

    pub fn validate(&self) -> Result<(), crate::error::AppError> {
        use crate::error::AppError;

        const MIN_SESSION_SECRET_BYTES: usize = 32;

        require_http_url("server.app_url", &self.server.app_url)?;

        if self.auth.session_secret.as_bytes().len() < MIN_SESSION_SECRET_BYTES {
            return Err(AppError::Config(format!(
                "auth.session_secret must be at least {} bytes",
                MIN_SESSION_SECRET_BYTES
            )));
        }

        if self.auth.session_max_age <= 0 {
            return Err(AppError::Config(
                "auth.session_max_age must be greater than 0".to_string(),
            ));
        }

        require_http_url("scalekit.environment_url", &self.scalekit.environment_url)?;

        for (key, value) in [
            ("scalekit.client_id", &self.scalekit.client_id),
            ("scalekit.client_secret", &self.scalekit.client_secret),
        ] {
            if value.trim().is_empty() {
                return Err(AppError::Config(format!("{key} must not be empty")));
            }
        }

        if !matches!(
            self.logging.level.trim().to_ascii_lowercase().as_str(),
            "trace" | "debug" | "info" | "warn" | "error"
        ) {
            return Err(AppError::Config(format!(
                "logging.level must be one of trace, debug, info, warn, error (got {:?})",
                self.logging.level
            )));
        }
        if !self.logging.is_json() && !self.logging.format.trim().eq_ignore_ascii_case("pretty") {
            return Err(AppError::Config(format!(
                "logging.format must be \"pretty\" or \"json\" (got {:?})",
                self.logging.format
            )));
        }

        Ok(())
    }
}

/// Parse `value` as an absolute http(s) URL with a host
fn require_http_url(key: &str, value: &str) -> Result<Url, crate::error::AppError> {
    use crate::error::AppError;

    let url = Url::parse(value.trim())
        .map_err(|e| AppError::Config(format!("{key} is not a valid URL: {e}")))?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(AppError::Config(format!(
            "{key} must be an absolute http(s) URL"
        )));
    }
    Ok(url)
}
