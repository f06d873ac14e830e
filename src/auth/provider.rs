//! Identity provider seam
//!
//! Handlers only depend on this trait; `ScalekitClient` is the production
//! implementation and tests plug in stubs.

use axum::async_trait;
use url::Url;

use crate::error::AppError;

/// Result of a successful authorization code exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedSession {
    /// Opaque access token, stored verbatim in the `access_token` cookie
    pub access_token: String,
    pub user: ProviderUser,
}

/// User identity as reported by the provider
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderUser {
    pub id: String,
    pub email: Option<String>,
    pub name: Option<String>,
}

/// Authorization server the login flow delegates to
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Build the URL the browser is sent to for authorization
    fn authorization_url(&self, redirect_uri: &str) -> Result<Url, AppError>;

    /// Exchange an authorization code for a session
    ///
    /// `redirect_uri` must be the same value used for `authorization_url`.
    async fn authenticate_with_code(
        &self,
        code: &str,
        redirect_uri: &str,
    ) -> Result<AuthenticatedSession, AppError>;
}
