//! Session cookie construction

use axum_extra::extract::cookie::{Cookie, SameSite};

/// Opaque provider token
pub const ACCESS_TOKEN_COOKIE: &str = "access_token";
/// Signed session profile
pub const SESSION_COOKIE: &str = "session";

fn build_session_scoped_cookie(
    name: &'static str,
    value: String,
    max_age_secs: i64,
    secure: bool,
) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(max_age_secs))
        .build()
}

pub fn build_access_token_cookie(token: String, max_age_secs: i64, secure: bool) -> Cookie<'static> {
    build_session_scoped_cookie(ACCESS_TOKEN_COOKIE, token, max_age_secs, secure)
}

pub fn build_session_cookie(token: String, max_age_secs: i64, secure: bool) -> Cookie<'static> {
    build_session_scoped_cookie(SESSION_COOKIE, token, max_age_secs, secure)
}

/// Removal cookie for `name`, emitted whether or not the browser sent it
pub fn clear_cookie(name: &'static str) -> Cookie<'static> {
    let mut cookie = Cookie::build((name, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build();
    cookie.make_removal();
    cookie
}
