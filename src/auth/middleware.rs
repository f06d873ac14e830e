//! Session extractors
//!
//! A session is present only when the `access_token` cookie is non-empty
//! and the signed `session` cookie yields a non-empty email.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
    response::{IntoResponse, Response},
};
use axum_extra::extract::CookieJar;

use super::cookies::{ACCESS_TOKEN_COOKIE, SESSION_COOKIE};
use super::session::{SessionProfile, verify_session_token};
use crate::AppState;
use crate::api::Found;

/// Resolve the current session from request cookies
pub fn session_from_jar(jar: &CookieJar, secret: &str) -> Option<SessionProfile> {
    let has_access_token = jar
        .get(ACCESS_TOKEN_COOKIE)
        .is_some_and(|cookie| !cookie.value().is_empty());
    if !has_access_token {
        return None;
    }

    let token = jar.get(SESSION_COOKIE)?;
    match verify_session_token(token.value(), secret) {
        Ok(profile) if !profile.email.trim().is_empty() => Some(profile),
        Ok(_) => None,
        Err(error) => {
            tracing::debug!(%error, "Ignoring invalid session cookie");
            None
        }
    }
}

fn session_from_parts(parts: &Parts, state: &AppState) -> Option<SessionProfile> {
    if let Some(profile) = parts.extensions.get::<SessionProfile>() {
        return Some(profile.clone());
    }

    let jar = CookieJar::from_headers(&parts.headers);
    session_from_jar(&jar, &state.config.auth.session_secret)
}

/// Extractor for current authenticated user
///
/// Redirects to the login flow when no session is present.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub SessionProfile);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);
        match session_from_parts(parts, &state) {
            Some(profile) => {
                parts.extensions.insert(profile.clone());
                Ok(CurrentUser(profile))
            }
            None => Err(Found("/api/auth/login".to_string()).into_response()),
        }
    }
}

/// Optional current user extractor
///
/// Returns None if not authenticated, instead of error.
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<SessionProfile>);

#[async_trait]
impl<S> FromRequestParts<S> for MaybeUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);
        let session = session_from_parts(parts, &state);

        if let Some(profile) = &session {
            parts.extensions.insert(profile.clone());
        }

        Ok(MaybeUser(session))
    }
}
