//! Login flow against the identity provider
//!
//! Implements the OAuth 2.0 authorization code flow with a fixed callback URL.

use axum::{
    Json, Router,
    extract::{RawQuery, State},
    response::IntoResponse,
    routing::{get, post},
};
use axum_extra::extract::CookieJar;

use super::cookies::{
    ACCESS_TOKEN_COOKIE, SESSION_COOKIE, build_access_token_cookie, build_session_cookie,
    clear_cookie,
};
use super::session::{SessionProfile, create_session_token};
use crate::AppState;
use crate::api::Found;
use crate::error::AppError;
use crate::metrics::{
    AUTH_CALLBACKS_TOTAL, LOGIN_REDIRECTS_TOTAL, LOGOUTS_TOTAL, PROVIDER_EXCHANGE_DURATION_SECONDS,
};

/// Create authentication router
///
/// Routes (nested under `/api/auth`):
/// - GET /login - Redirect to the identity provider
/// - GET /callback - OAuth callback
/// - POST /logout - Logout
pub fn auth_router() -> Router<AppState> {
    Router::new()
        .route("/login", get(login))
        .route("/callback", get(callback))
        .route("/logout", post(logout))
}

// =============================================================================
// Authorization redirect
// =============================================================================

/// GET /api/auth/login
async fn login(State(state): State<AppState>) -> Result<Found, AppError> {
    let callback_url = state.config.server.callback_url();
    let url = state.provider.authorization_url(&callback_url)?;

    LOGIN_REDIRECTS_TOTAL.inc();
    tracing::debug!(%callback_url, "Redirecting to identity provider");

    Ok(Found(url.into()))
}

// =============================================================================
// Callback
// =============================================================================

/// Query parameters from the provider callback
///
/// Repeated keys keep their first non-empty value; the query is never
/// rejected for its shape.
#[derive(Debug, Default, PartialEq, Eq)]
struct CallbackQuery {
    /// Authorization code
    code: Option<String>,
    /// Set by the provider when the user denied or the request was invalid
    error: Option<String>,
    error_description: Option<String>,
}

impl CallbackQuery {
    fn parse(raw: Option<&str>) -> Self {
        let mut query = Self::default();
        for (key, value) in url::form_urlencoded::parse(raw.unwrap_or_default().as_bytes()) {
            if value.is_empty() {
                continue;
            }
            let slot = match &*key {
                "code" => &mut query.code,
                "error" => &mut query.error,
                "error_description" => &mut query.error_description,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into_owned());
            }
        }
        query
    }
}

/// GET /api/auth/callback
///
/// # Steps
/// 1. Require a non-empty `code`
/// 2. Exchange it with the provider using the same callback URL
/// 3. Set `access_token` and the signed `session` cookie
/// 4. Redirect to the application root
async fn callback(
    State(state): State<AppState>,
    RawQuery(raw_query): RawQuery,
    jar: CookieJar,
) -> Result<impl IntoResponse, AppError> {
    let query = CallbackQuery::parse(raw_query.as_deref());
    let Some(code) = query.code else {
        if let Some(error) = &query.error {
            tracing::warn!(
                %error,
                description = query.error_description.as_deref().unwrap_or_default(),
                "Identity provider returned an error instead of a code"
            );
        }
        AUTH_CALLBACKS_TOTAL.with_label_values(&["missing_code"]).inc();
        return Err(AppError::Validation("No code provided".to_string()));
    };

    let callback_url = state.config.server.callback_url();
    let timer = PROVIDER_EXCHANGE_DURATION_SECONDS.start_timer();
    let exchanged = state
        .provider
        .authenticate_with_code(&code, &callback_url)
        .await;
    timer.observe_duration();

    let session = match exchanged {
        Ok(session) => session,
        Err(error) => {
            AUTH_CALLBACKS_TOTAL.with_label_values(&["exchange_failed"]).inc();
            tracing::warn!(%error, "Authorization code exchange failed");
            return Err(error);
        }
    };

    let max_age = state.config.auth.session_max_age;
    let secure = state.config.should_use_secure_cookies();

    let Some(email) = session
        .user
        .email
        .clone()
        .filter(|email| !email.trim().is_empty())
    else {
        AUTH_CALLBACKS_TOTAL.with_label_values(&["missing_email"]).inc();
        tracing::warn!(user_id = %session.user.id, "Identity provider returned no email");
        return Err(AppError::ProviderUnavailable(
            "identity provider returned no email".to_string(),
        ));
    };

    let profile = SessionProfile::new(email, session.user.name.clone(), max_age);
    let profile_token = create_session_token(&profile, &state.config.auth.session_secret)?;

    let jar = jar
        .add(build_access_token_cookie(session.access_token, max_age, secure))
        .add(build_session_cookie(profile_token, max_age, secure));

    AUTH_CALLBACKS_TOTAL.with_label_values(&["success"]).inc();
    tracing::info!(user_id = %session.user.id, "User signed in");

    Ok((jar, Found(state.config.server.home_url())))
}

// =============================================================================
// Logout
// =============================================================================

/// POST /api/auth/logout
///
/// Clears both session cookies.
async fn logout(jar: CookieJar) -> impl IntoResponse {
    let jar = jar
        .add(clear_cookie(ACCESS_TOKEN_COOKIE))
        .add(clear_cookie(SESSION_COOKIE));

    LOGOUTS_TOTAL.inc();

    (jar, Json(serde_json::json!({ "success": true })))
}
