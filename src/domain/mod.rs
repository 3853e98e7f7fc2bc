//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, errors)
//! - `donation` - Pricing, tier exchange, entitlement reconciliation and IPN validation

pub mod donation;
pub mod foundation;
