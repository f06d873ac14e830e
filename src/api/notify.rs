//! Client-side notification outcomes
//!
//! The account menu script mirrors `LogoutOutcome::from_status`: the page
//! embeds the same messages and redirect target rendered from here.

use axum::http::StatusCode;
use serde::Serialize;

pub const LOGOUT_SUCCESS_MESSAGE: &str = "Logged out successfully";
pub const LOGOUT_FAILURE_MESSAGE: &str = "Logout failed. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
}

/// Toast shown to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: &'static str,
}

/// What the page does after `POST /api/auth/logout` settles
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogoutOutcome {
    pub notification: Notification,
    /// Where to navigate afterwards, if anywhere
    pub redirect_to: Option<&'static str>,
}

impl LogoutOutcome {
    /// `status` is `None` when the request never got a response
    pub fn from_status(status: Option<StatusCode>) -> Self {
        match status {
            Some(StatusCode::OK) => Self {
                notification: Notification {
                    kind: NotificationKind::Success,
                    message: LOGOUT_SUCCESS_MESSAGE,
                },
                redirect_to: Some("/"),
            },
            _ => Self {
                notification: Notification {
                    kind: NotificationKind::Error,
                    message: LOGOUT_FAILURE_MESSAGE,
                },
                redirect_to: None,
            },
        }
    }
}
