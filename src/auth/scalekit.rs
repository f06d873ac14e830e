//! Scalekit OAuth client
//!
//! Speaks the two endpoints the login flow needs:
//! - `GET {environment}/oauth/authorize` (browser redirect target)
//! - `POST {environment}/oauth/token` (authorization code exchange)
//!
//! User details are read from the ID token claims. The token comes straight
//! from the provider over TLS, so its signature is not re-checked here.

use axum::async_trait;
use base64::{Engine as _, engine::general_purpose};
use serde::Deserialize;
use url::Url;

use super::provider::{AuthenticatedSession, IdentityProvider, ProviderUser};
use crate::config::ScalekitConfig;
use crate::error::AppError;

/// Scalekit environment client
pub struct ScalekitClient {
    environment_url: String,
    client_id: String,
    client_secret: String,
    scopes: String,
    http_client: reqwest::Client,
}

/// Token endpoint success body
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    id_token: Option<String>,
}

/// Token endpoint error body (RFC 6749 section 5.2)
#[derive(Debug, Default, Deserialize)]
struct TokenErrorResponse {
    #[serde(default)]
    error: String,
    error_description: Option<String>,
}

/// Claims we read from the ID token
#[derive(Debug, Deserialize)]
struct IdTokenClaims {
    sub: String,
    email: Option<String>,
    name: Option<String>,
    given_name: Option<String>,
    family_name: Option<String>,
}

impl ScalekitClient {
    pub fn new(config: &ScalekitConfig, http_client: reqwest::Client) -> Self {
        Self {
            environment_url: config.environment_url.trim().trim_end_matches('/').to_string(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            scopes: config.scopes.clone(),
            http_client,
        }
    }

    fn endpoint(&self, path: &str) -> Result<Url, AppError> {
        Ok(Url::parse(&format!("{}{}", self.environment_url, path))?)
    }
}

#[async_trait]
impl IdentityProvider for ScalekitClient {
    fn authorization_url(&self, redirect_uri: &str) -> Result<Url, AppError> {
        let mut url = self.endpoint("/oauth/authorize")?;
        url.query_pairs_mut()
            .append_pair("response_type", "code")
            .append_pair("client_id", &self.client_id)
            .append_pair("redirect_uri", redirect_uri)
            .append_pair("scope", &self.scopes);
        Ok(url)
    }

    async fn authenticate_with_code(
        &self,
        code: &str,
        redirect_uri: &str,
    ) -> Result<AuthenticatedSession, AppError> {
        let token_url = self.endpoint("/oauth/token")?;

        let response = self
            .http_client
            .post(token_url)
            .form(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", redirect_uri),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if status.is_client_error() {
            let body: TokenErrorResponse = response.json().await.unwrap_or_default();
            let reason = match body.error_description {
                Some(description) => format!("{}: {}", body.error, description),
                None => body.error,
            };
            tracing::warn!(%status, %reason, "Scalekit rejected authorization code");
            return Err(AppError::ProviderRejected(reason));
        }
        if !status.is_success() {
            return Err(AppError::ProviderUnavailable(format!(
                "token endpoint returned {status}"
            )));
        }

        let token: TokenResponse = response.json().await.map_err(|e| {
            AppError::ProviderUnavailable(format!("malformed token response: {e}"))
        })?;

        let user: ProviderUser = match token.id_token.as_deref() {
            Some(id_token) => decode_id_token_claims(id_token)?.into(),
            None => {
                tracing::warn!("Scalekit token response carried no id_token");
                ProviderUser::default()
            }
        };

        Ok(AuthenticatedSession {
            access_token: token.access_token,
            user,
        })
    }
}

impl From<IdTokenClaims> for ProviderUser {
    fn from(claims: IdTokenClaims) -> Self {
        let name = claims.name.filter(|name| !name.trim().is_empty()).or_else(|| {
            let full = [claims.given_name, claims.family_name]
                .into_iter()
                .flatten()
                .collect::<Vec<_>>()
                .join(" ");
            (!full.trim().is_empty()).then_some(full)
        });

        Self {
            id: claims.sub,
            email: claims.email,
            name,
        }
    }
}

/// Decode the payload segment of a JWT without verifying its signature
fn decode_id_token_claims(id_token: &str) -> Result<IdTokenClaims, AppError> {
    let payload = id_token
        .split('.')
        .nth(1)
        .ok_or_else(|| AppError::ProviderUnavailable("id_token is not a JWT".to_string()))?;

    let bytes = general_purpose::URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|e| AppError::ProviderUnavailable(format!("id_token payload: {e}")))?;

    serde_json::from_slice(&bytes)
        .map_err(|e| AppError::ProviderUnavailable(format!("id_token claims: {e}")))
}
