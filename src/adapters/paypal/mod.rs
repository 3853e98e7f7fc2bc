//! PayPal adapter - IPN postback verification.

mod ipn_verifier;

pub use ipn_verifier::{
    PaypalIpnVerifier, PaypalVerifierConfig, PAYPAL_LIVE_VERIFY_URL, PAYPAL_SANDBOX_VERIFY_URL,
};
