//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Storage Ports
//!
//! - `UserRepository` - Resolve a user and read their entitlement
//! - `ProcessedTransactionStore` - Idempotency guard keyed by transaction id
//! - `EntitlementStore` - Atomic write of entitlement, badges and transaction record
//!
//! ## Outbound Ports
//!
//! - `IpnVerifier` - Postback verification with the payment processor
//! - `DonationNotifier` - Donation and rejection notices

mod donation_notifier;
mod entitlement_store;
mod ipn_verifier;
mod processed_transaction_store;
mod user_repository;

pub use donation_notifier::{DonationNotice, DonationNotifier, NotifyError, RejectionNotice};
pub use entitlement_store::{CommitResult, EntitlementCommit, EntitlementStore};
pub use ipn_verifier::{IpnVerification, IpnVerifier, VerificationError};
pub use processed_transaction_store::ProcessedTransactionStore;
pub use user_repository::{DonorAccount, UserRepository};
