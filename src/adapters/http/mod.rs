//! HTTP adapters - axum routes for the listener.

use std::time::Duration;

use axum::Router;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

pub mod donation;

pub use donation::{donation_router, IpnAppState};

/// Builds the full application with request tracing and a request timeout.
pub fn app(state: IpnAppState, request_timeout: Duration) -> Router {
    donation_router()
        .layer(TimeoutLayer::new(request_timeout))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
