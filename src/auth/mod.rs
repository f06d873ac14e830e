//! Scalekit-backed authentication
//!
//! Handles:
//! - OAuth authorization code flow
//! - Session cookies
//! - Session extractors

pub mod cookies;
mod middleware;
mod oauth;
pub mod provider;
pub mod scalekit;
pub mod session;

pub use middleware::{CurrentUser, MaybeUser, session_from_jar};
pub use oauth::auth_router;
pub use provider::{AuthenticatedSession, IdentityProvider, ProviderUser};
pub use scalekit::ScalekitClient;
pub use session::{SessionProfile, create_session_token, verify_session_token};
