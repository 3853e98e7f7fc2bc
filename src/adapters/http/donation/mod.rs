//! Donation HTTP adapter - PayPal IPN listener endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{ErrorResponse, HealthResponse};
pub use handlers::{handle_paypal_ipn, health, IpnApiError, IpnAppState};
pub use routes::donation_router;
