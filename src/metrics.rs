//! Prometheus metrics registry and instruments.
//!
//! This module is framework-agnostic and can be used from any layer.

use std::sync::Once;

use lazy_static::lazy_static;
use prometheus::{Histogram, HistogramOpts, IntCounter, IntCounterVec, Opts, Registry};

lazy_static! {
    /// Global Prometheus registry
    pub static ref REGISTRY: Registry = Registry::new();

    // Auth flow metrics
    pub static ref LOGIN_REDIRECTS_TOTAL: IntCounter = IntCounter::new(
        "supportchat_login_redirects_total",
        "Total number of redirects to the identity provider"
    ).expect("metric can be created");
    pub static ref AUTH_CALLBACKS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("supportchat_auth_callbacks_total", "Total number of OAuth callbacks handled"),
        &["outcome"]
    ).expect("metric can be created");
    pub static ref LOGOUTS_TOTAL: IntCounter = IntCounter::new(
        "supportchat_logouts_total",
        "Total number of logouts"
    ).expect("metric can be created");
    pub static ref PROVIDER_EXCHANGE_DURATION_SECONDS: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "supportchat_provider_exchange_duration_seconds",
            "Authorization code exchange duration in seconds"
        ).buckets(vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0])
    ).expect("metric can be created");

    // Error Metrics
    pub static ref ERRORS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("supportchat_errors_total", "Total number of errors"),
        &["error_type"]
    ).expect("metric can be created");
}

static INIT: Once = Once::new();

/// Initialize metrics registry.
///
/// Safe to call more than once; instruments are registered on the first call.
pub fn init_metrics() {
    INIT.call_once(|| {
        REGISTRY
            .register(Box::new(LOGIN_REDIRECTS_TOTAL.clone()))
            .expect("LOGIN_REDIRECTS_TOTAL can be registered");
        REGISTRY
            .register(Box::new(AUTH_CALLBACKS_TOTAL.clone()))
            .expect("AUTH_CALLBACKS_TOTAL can be registered");
        REGISTRY
            .register(Box::new(LOGOUTS_TOTAL.clone()))
            .expect("LOGOUTS_TOTAL can be registered");
        REGISTRY
            .register(Box::new(PROVIDER_EXCHANGE_DURATION_SECONDS.clone()))
            .expect("PROVIDER_EXCHANGE_DURATION_SECONDS can be registered");
        REGISTRY
            .register(Box::new(ERRORS_TOTAL.clone()))
            .expect("ERRORS_TOTAL can be registered");

        tracing::info!("Metrics registry initialized");
    });
}
