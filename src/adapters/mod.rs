//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `postgres` - User, badge and transaction log storage
//! - `memory` - In-memory storage for tests and local runs
//! - `paypal` - IPN postback verification
//! - `notifier` - Discord and log-only donation notices
//! - `reliability` - Retry with exponential backoff
//! - `http` - axum listener routes

pub mod http;
pub mod memory;
pub mod notifier;
pub mod paypal;
pub mod postgres;
pub mod reliability;

pub use memory::InMemoryDonorStore;
pub use notifier::{DiscordNotifier, TracingNotifier};
pub use paypal::{PaypalIpnVerifier, PaypalVerifierConfig};
pub use postgres::{PostgresEntitlementStore, PostgresUserRepository};
pub use reliability::{retry_with_backoff, RetryPolicy};
