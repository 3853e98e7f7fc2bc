//! HTTP handlers for the payment notification listener.
//!
//! PayPal redelivers any notification that is not answered with 200, so every
//! outcome the handler reaches (granted, rejected, dry run) is a 200. Only
//! infrastructure failures produce a non-2xx status.

use std::sync::Arc;

use axum::extract::rejection::FormRejection;
use axum::extract::{Form, Json, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::application::handlers::donation::{
    ProcessIpnCommand, ProcessIpnHandler, ProcessIpnResult,
};
use crate::domain::donation::IpnError;
use crate::domain::foundation::Timestamp;

use super::dto::{ErrorResponse, HealthResponse};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared state for the listener routes.
#[derive(Clone)]
pub struct IpnAppState {
    pub process_ipn: Arc<ProcessIpnHandler>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// POST /webhooks/paypal_ipn - Process a PayPal payment notification
pub async fn handle_paypal_ipn(
    State(state): State<IpnAppState>,
    form: Result<Form<Vec<(String, String)>>, FormRejection>,
) -> Result<impl IntoResponse, IpnApiError> {
    let Form(fields) = form.map_err(|e| IpnError::ParseError(e.body_text()))?;

    let cmd = ProcessIpnCommand {
        fields,
        received_at: Timestamp::now(),
    };

    match state.process_ipn.handle(cmd).await? {
        ProcessIpnResult::Granted {
            user_id,
            applied_months,
            ..
        } => {
            tracing::debug!(%user_id, applied_months, "Notification acknowledged after grant");
        }
        ProcessIpnResult::DryRun { user_id, .. } => {
            tracing::debug!(%user_id, "Notification acknowledged in dry-run mode");
        }
        ProcessIpnResult::Rejected(rejection) => {
            tracing::debug!(reason = %rejection.reason, "Notification acknowledged after rejection");
        }
    }

    Ok(StatusCode::OK)
}

/// GET /_health - Liveness probe
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error type that converts processing errors to HTTP responses.
#[derive(Debug)]
pub struct IpnApiError(IpnError);

impl From<IpnError> for IpnApiError {
    fn from(err: IpnError) -> Self {
        Self(err)
    }
}

impl IntoResponse for IpnApiError {
    fn into_response(self) -> axum::response::Response {
        let error_code = match &self.0 {
            IpnError::VerificationUnavailable(_) => "VERIFICATION_UNAVAILABLE",
            IpnError::Database(_) => "DATABASE_ERROR",
            IpnError::Conflict(_) => "CONCURRENT_UPDATE",
            IpnError::ParseError(_) => "PARSE_ERROR",
        };

        if self.0.is_retryable() {
            tracing::error!(error = %self.0, "Notification processing failed, processor will retry");
        } else {
            tracing::warn!(error = %self.0, "Malformed notification");
        }

        let body = ErrorResponse::new(error_code, self.0.to_string());
        (self.0.status_code(), Json(body)).into_response()
    }
}
