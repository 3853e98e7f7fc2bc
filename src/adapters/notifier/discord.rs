//! Discord webhook notifier.
//!
//! Posts one embed per processed notification to a Discord channel webhook.
//! Transport errors and 5xx answers are retried with backoff.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;

use crate::adapters::reliability::{retry_with_backoff, RetryPolicy};
use crate::ports::{DonationNotice, DonationNotifier, NotifyError, RejectionNotice};

const GRANTED_COLOR: u32 = 0x2E_CC_71;
const REJECTED_COLOR: u32 = 0xE7_4C_3C;

#[derive(Debug, Serialize)]
struct WebhookPayload {
    embeds: Vec<Embed>,
}

#[derive(Debug, Serialize)]
struct Embed {
    title: String,
    description: String,
    color: u32,
    fields: Vec<EmbedField>,
}

#[derive(Debug, Serialize)]
struct EmbedField {
    name: &'static str,
    value: String,
    inline: bool,
}

impl EmbedField {
    fn inline(name: &'static str, value: impl Into<String>) -> Self {
        Self {
            name,
            value: value.into(),
            inline: true,
        }
    }
}

/// Sends donation notices to a Discord webhook.
pub struct DiscordNotifier {
    webhook_url: SecretString,
    client: Client,
    retry: RetryPolicy,
}

impl DiscordNotifier {
    pub fn new(
        webhook_url: SecretString,
        timeout: Duration,
        retry: RetryPolicy,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            webhook_url,
            client,
            retry,
        })
    }

    async fn send(&self, payload: &WebhookPayload) -> Result<(), NotifyError> {
        retry_with_backoff(&self.retry, NotifyError::is_transient, || self.post(payload)).await
    }

    async fn post(&self, payload: &WebhookPayload) -> Result<(), NotifyError> {
        // without_url keeps the webhook token out of logs
        let response = self
            .client
            .post(self.webhook_url.expose_secret())
            .json(payload)
            .send()
            .await
            .map_err(|e| NotifyError::Transient(e.without_url().to_string()))?;

        let status = response.status();
        if status.is_server_error() {
            return Err(NotifyError::Transient(format!(
                "Discord answered HTTP {}",
                status.as_u16()
            )));
        }
        if !status.is_success() {
            return Err(NotifyError::Delivery(format!(
                "Discord answered HTTP {}",
                status.as_u16()
            )));
        }
        Ok(())
    }
}

fn granted_payload(notice: &DonationNotice) -> WebhookPayload {
    let plural = if notice.months == 1 { "" } else { "s" };
    WebhookPayload {
        embeds: vec![Embed {
            title: "New donation".to_string(),
            description: format!(
                "{} bought {} month{} of {}",
                notice.username, notice.months, plural, notice.tier
            ),
            color: GRANTED_COLOR,
            fields: vec![
                EmbedField::inline("User ID", notice.user_id.to_string()),
                EmbedField::inline("Amount", format!("{} {}", notice.amount, notice.currency)),
                EmbedField::inline("Expires", format!("<t:{}:f>", notice.new_expire_at)),
                EmbedField::inline("Transaction", notice.transaction_id.to_string()),
            ],
        }],
    }
}

fn rejected_payload(notice: &RejectionNotice) -> WebhookPayload {
    WebhookPayload {
        embeds: vec![Embed {
            title: "Donation rejected".to_string(),
            description: notice.rejection.details.clone(),
            color: REJECTED_COLOR,
            fields: vec![
                EmbedField::inline("Reason", notice.rejection.reason.code()),
                EmbedField::inline(
                    "Transaction",
                    notice.transaction_id.as_deref().unwrap_or("unknown"),
                ),
            ],
        }],
    }
}

#[async_trait]
impl DonationNotifier for DiscordNotifier {
    async fn donation_granted(&self, notice: &DonationNotice) -> Result<(), NotifyError> {
        self.send(&granted_payload(notice)).await
    }

    async fn donation_rejected(&self, notice: &RejectionNotice) -> Result<(), NotifyError> {
        self.send(&rejected_payload(notice)).await
    }
}
