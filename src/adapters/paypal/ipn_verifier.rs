//! PayPal IPN postback verifier.
//!
//! PayPal confirms a notification when its exact fields are posted back,
//! in order, prefixed with `cmd=_notify-validate`. The body of the answer
//! is either `VERIFIED` or `INVALID`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::adapters::reliability::{retry_with_backoff, RetryPolicy};
use crate::ports::{IpnVerification, IpnVerifier, VerificationError};

/// Live PayPal verification endpoint.
pub const PAYPAL_LIVE_VERIFY_URL: &str = "https://ipnpb.paypal.com/cgi-bin/webscr";

/// Sandbox verification endpoint.
pub const PAYPAL_SANDBOX_VERIFY_URL: &str = "https://ipnpb.sandbox.paypal.com/cgi-bin/webscr";

/// Configuration for the PayPal verifier.
#[derive(Debug, Clone)]
pub struct PaypalVerifierConfig {
    pub verify_url: String,
    pub timeout: Duration,
    pub retry: RetryPolicy,
}

impl Default for PaypalVerifierConfig {
    fn default() -> Self {
        Self {
            verify_url: PAYPAL_LIVE_VERIFY_URL.to_string(),
            timeout: Duration::from_secs(10),
            retry: RetryPolicy::default(),
        }
    }
}

impl PaypalVerifierConfig {
    pub fn with_verify_url(mut self, url: impl Into<String>) -> Self {
        self.verify_url = url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

/// Verifies notifications against PayPal's postback endpoint.
pub struct PaypalIpnVerifier {
    config: PaypalVerifierConfig,
    client: Client,
}

impl PaypalIpnVerifier {
    pub fn new(config: PaypalVerifierConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("donor-ipn/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { config, client })
    }

    async fn post_back(
        &self,
        body: &[(String, String)],
    ) -> Result<IpnVerification, VerificationError> {
        let response = self
            .client
            .post(&self.config.verify_url)
            .form(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    VerificationError::Transport(format!(
                        "timed out after {}s",
                        self.config.timeout.as_secs()
                    ))
                } else {
                    VerificationError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        if status.is_server_error() {
            return Err(VerificationError::Unavailable(status.as_u16()));
        }
        if !status.is_success() {
            return Err(VerificationError::UnexpectedResponse(format!(
                "HTTP {}",
                status.as_u16()
            )));
        }

        let text = response
            .text()
            .await
            .map_err(|e| VerificationError::Transport(e.to_string()))?;

        parse_verdict(&text)
    }
}

/// Interprets the body of PayPal's answer.
fn parse_verdict(body: &str) -> Result<IpnVerification, VerificationError> {
    match body.trim() {
        "VERIFIED" => Ok(IpnVerification::Verified),
        "INVALID" => Ok(IpnVerification::Invalid),
        other => {
            let snippet: String = other.chars().take(64).collect();
            Err(VerificationError::UnexpectedResponse(snippet))
        }
    }
}

#[async_trait]
impl IpnVerifier for PaypalIpnVerifier {
    async fn verify(
        &self,
        fields: &[(String, String)],
    ) -> Result<IpnVerification, VerificationError> {
        let mut body = Vec::with_capacity(fields.len() + 1);
        body.push(("cmd".to_string(), "_notify-validate".to_string()));
        body.extend(fields.iter().cloned());

        let verdict = retry_with_backoff(&self.config.retry, VerificationError::is_transient, || {
            self.post_back(&body)
        })
        .await?;

        tracing::debug!(?verdict, "IPN postback answered");
        Ok(verdict)
    }
}
