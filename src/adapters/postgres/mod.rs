//! PostgreSQL adapters - Database implementations for storage ports.
//!
//! - `PostgresUserRepository` - Reads users, privileges and badges
//! - `PostgresEntitlementStore` - Transaction log and atomic entitlement commits

mod entitlement_store;
mod user_repository;

pub use entitlement_store::PostgresEntitlementStore;
pub use user_repository::PostgresUserRepository;
