//! Donation handlers.
//!
//! ## Commands
//! - Processing payment notifications into donor entitlements

mod process_ipn;

pub use process_ipn::{
    ProcessIpnCommand, ProcessIpnHandler, ProcessIpnResult, ProcessIpnSettings,
};
