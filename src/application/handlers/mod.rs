//! Application handlers.
//!
//! Command handlers that orchestrate domain operations.

pub mod donation;

pub use donation::{ProcessIpnCommand, ProcessIpnHandler, ProcessIpnResult, ProcessIpnSettings};
