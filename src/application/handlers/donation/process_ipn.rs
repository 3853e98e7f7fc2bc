//! ProcessIpnHandler - Command handler for payment notifications.

use std::sync::Arc;

use crate::domain::donation::{
    reconcile, DonationIntent, EntitlementSnapshot, IpnError, IpnNotification, IpnPolicy,
    ReconciliationOutcome, Rejection, RejectionReason,
};
use crate::domain::foundation::{Timestamp, UserId};
use crate::ports::{
    CommitResult, DonationNotice, DonationNotifier, DonorAccount, EntitlementCommit,
    EntitlementStore, IpnVerification, IpnVerifier, ProcessedTransactionStore, RejectionNotice,
    UserRepository,
};

/// Attempts at committing before giving up on a user whose record keeps changing.
const MAX_COMMIT_ATTEMPTS: u32 = 3;

/// Command to process one payment notification.
#[derive(Debug, Clone)]
pub struct ProcessIpnCommand {
    /// Form fields in arrival order.
    pub fields: Vec<(String, String)>,
    /// When the notification was received.
    pub received_at: Timestamp,
}

/// Result of notification processing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessIpnResult {
    /// Entitlement updated and transaction recorded.
    Granted {
        user_id: UserId,
        snapshot: EntitlementSnapshot,
        applied_months: u32,
    },
    /// Entitlement computed but not written (writes disabled).
    DryRun {
        user_id: UserId,
        snapshot: EntitlementSnapshot,
        applied_months: u32,
    },
    /// Acknowledged without applying anything.
    Rejected(Rejection),
}

/// Switches and acceptance rules for the handler.
#[derive(Debug, Clone)]
pub struct ProcessIpnSettings {
    pub policy: IpnPolicy,
    pub require_ipn_verification: bool,
    pub enforce_unique_payments: bool,
    pub write_to_users_db: bool,
}

/// Handler for processing payment notifications.
///
/// Verifies the notification, validates it into a donation, reconciles it
/// against the user's entitlement and commits the result atomically.
pub struct ProcessIpnHandler {
    users: Arc<dyn UserRepository>,
    processed: Arc<dyn ProcessedTransactionStore>,
    store: Arc<dyn EntitlementStore>,
    verifier: Arc<dyn IpnVerifier>,
    notifier: Arc<dyn DonationNotifier>,
    settings: ProcessIpnSettings,
}

impl ProcessIpnHandler {
    pub fn new(
        users: Arc<dyn UserRepository>,
        processed: Arc<dyn ProcessedTransactionStore>,
        store: Arc<dyn EntitlementStore>,
        verifier: Arc<dyn IpnVerifier>,
        notifier: Arc<dyn DonationNotifier>,
        settings: ProcessIpnSettings,
    ) -> Self {
        Self {
            users,
            processed,
            store,
            verifier,
            notifier,
            settings,
        }
    }

    pub async fn handle(&self, cmd: ProcessIpnCommand) -> Result<ProcessIpnResult, IpnError> {
        let notification = IpnNotification::from_pairs(cmd.fields);

        let result = self.process(&notification, cmd.received_at).await?;

        if let ProcessIpnResult::Rejected(rejection) = &result {
            tracing::warn!(
                txn_id = notification.txn_id.as_deref().unwrap_or("-"),
                reason = %rejection.reason,
                details = %rejection.details,
                "Payment notification rejected"
            );
            let notice = RejectionNotice {
                transaction_id: notification.txn_id.clone(),
                rejection: rejection.clone(),
            };
            if let Err(e) = self.notifier.donation_rejected(&notice).await {
                tracing::error!(error = %e, "Failed to send rejection notice");
            }
        }

        Ok(result)
    }

    async fn process(
        &self,
        notification: &IpnNotification,
        now: Timestamp,
    ) -> Result<ProcessIpnResult, IpnError> {
        // 1. Confirm the notification with the processor
        if self.settings.require_ipn_verification {
            let verdict = self
                .verifier
                .verify(&notification.fields)
                .await
                .map_err(|e| IpnError::VerificationUnavailable(e.to_string()))?;
            if verdict == IpnVerification::Invalid {
                return Ok(rejected(
                    RejectionReason::InvalidNotification,
                    "processor did not verify the notification",
                ));
            }
        }

        // 2. Validate into a donation
        let intent = match notification.into_intent(&self.settings.policy) {
            Ok(intent) => intent,
            Err(rejection) => return Ok(ProcessIpnResult::Rejected(rejection)),
        };

        let mut last_user_id = None;
        for attempt in 1..=MAX_COMMIT_ATTEMPTS {
            // 3. Resolve the user
            let Some(account) = self.users.find_account(intent.user()).await? else {
                return Ok(rejected(
                    RejectionReason::UserNotFound,
                    format!("no user with {}", intent.user()),
                ));
            };
            last_user_id = Some(account.user_id);

            // 4. Idempotency guard
            if self.settings.enforce_unique_payments
                && self
                    .processed
                    .already_processed(intent.transaction_id())
                    .await?
            {
                return Ok(rejected(
                    RejectionReason::DuplicateTransaction,
                    format!("transaction {} already applied", intent.transaction_id()),
                ));
            }

            // 5. Reconcile
            let (snapshot, applied_months) = match reconcile(&account.snapshot, &intent, now) {
                ReconciliationOutcome::Granted {
                    new_snapshot,
                    applied_months,
                } => (new_snapshot, applied_months),
                ReconciliationOutcome::Rejected(rejection) => {
                    return Ok(ProcessIpnResult::Rejected(rejection))
                }
            };

            // 6. Dry run
            if !self.settings.write_to_users_db {
                tracing::info!(
                    user_id = %account.user_id,
                    txn_id = %intent.transaction_id(),
                    privileges = %snapshot.privileges,
                    expire_at = snapshot.expire_at,
                    "Writes disabled, skipping entitlement update"
                );
                return Ok(ProcessIpnResult::DryRun {
                    user_id: account.user_id,
                    snapshot,
                    applied_months,
                });
            }

            // 7. Atomic commit
            let commit = EntitlementCommit {
                user_id: account.user_id,
                previous: account.snapshot.clone(),
                next: snapshot.clone(),
                transaction_id: intent.transaction_id().clone(),
                notification: notification.to_json(),
                enforce_unique: self.settings.enforce_unique_payments,
            };

            match self.store.commit(commit).await? {
                CommitResult::Committed => {
                    tracing::info!(
                        user_id = %account.user_id,
                        txn_id = %intent.transaction_id(),
                        tier = %intent.tier(),
                        months = applied_months,
                        expire_at = snapshot.expire_at,
                        "Donation applied"
                    );
                    self.notify_granted(&account, &intent, &snapshot).await;
                    return Ok(ProcessIpnResult::Granted {
                        user_id: account.user_id,
                        snapshot,
                        applied_months,
                    });
                }
                CommitResult::DuplicateTransaction => {
                    return Ok(rejected(
                        RejectionReason::DuplicateTransaction,
                        format!(
                            "transaction {} recorded concurrently",
                            intent.transaction_id()
                        ),
                    ));
                }
                CommitResult::StaleSnapshot => {
                    tracing::warn!(
                        user_id = %account.user_id,
                        attempt,
                        "User entitlement changed during reconciliation, retrying"
                    );
                }
            }
        }

        Err(IpnError::Conflict(
            last_user_id.map(|id| id.as_i64()).unwrap_or_default(),
        ))
    }

    async fn notify_granted(
        &self,
        account: &DonorAccount,
        intent: &DonationIntent,
        snapshot: &EntitlementSnapshot,
    ) {
        let notice = DonationNotice {
            user_id: account.user_id,
            username: account.username.clone(),
            tier: intent.tier(),
            months: intent.months(),
            amount: intent.charged_amount(),
            currency: intent.currency().to_string(),
            new_expire_at: snapshot.expire_at,
            transaction_id: intent.transaction_id().clone(),
        };
        if let Err(e) = self.notifier.donation_granted(&notice).await {
            tracing::error!(error = %e, "Failed to send donation notice");
        }
    }
}

fn rejected(reason: RejectionReason, details: impl Into<String>) -> ProcessIpnResult {
    ProcessIpnResult::Rejected(Rejection::new(reason, details))
}
