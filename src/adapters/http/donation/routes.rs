//! Axum router configuration for the notification listener.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{handle_paypal_ipn, health, IpnAppState};

/// Create the listener router.
///
/// # Routes
/// - `POST /webhooks/paypal_ipn` - PayPal IPN delivery (form-encoded)
/// - `GET /_health` - Liveness probe
pub fn donation_router() -> Router<IpnAppState> {
    Router::new()
        .route("/webhooks/paypal_ipn", post(handle_paypal_ipn))
        .route("/_health", get(health))
}
