//! API layer
//!
//! HTTP handlers for:
//! - Landing page and dashboard
//! - Metrics (Prometheus)

mod landing;
pub mod metrics;
pub mod notify;

use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};

pub use landing::{pages_router, render_dashboard_page, render_landing_page};
pub use metrics::metrics_router;
pub use notify::{LogoutOutcome, Notification, NotificationKind};

/// `302 Found` redirect
///
/// axum's `Redirect::to` answers 303; the login flow answers 302.
#[derive(Debug, Clone)]
pub struct Found(pub String);

impl IntoResponse for Found {
    fn into_response(self) -> Response {
        (StatusCode::FOUND, [(header::LOCATION, self.0)]).into_response()
    }
}
