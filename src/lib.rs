//! donor-ipn - Donation entitlement service
//!
//! Listens for PayPal Instant Payment Notifications, validates each payment
//! against the donor price schedule and extends the paying user's Supporter
//! or Premium privileges, converting remaining time between tiers on a switch.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
