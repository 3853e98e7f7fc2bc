//! donor-ipn - PayPal IPN listener that keeps donor privileges in sync.

use std::sync::Arc;

use secrecy::ExposeSecret;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use donor_ipn::adapters::http::{self, IpnAppState};
use donor_ipn::adapters::{
    DiscordNotifier, PaypalIpnVerifier, PaypalVerifierConfig, PostgresEntitlementStore,
    PostgresUserRepository, RetryPolicy, TracingNotifier,
};
use donor_ipn::application::{ProcessIpnHandler, ProcessIpnSettings};
use donor_ipn::config::{AppConfig, ServerConfig};
use donor_ipn::ports::DonationNotifier;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    init_tracing(&config.server);

    let pool = config
        .database
        .pool_options()
        .connect(config.database.url.expose_secret())
        .await?;

    if config.database.run_migrations {
        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Database migrations applied");
    }

    let users = Arc::new(PostgresUserRepository::new(pool.clone()));
    let store = Arc::new(PostgresEntitlementStore::new(pool));

    let verifier = Arc::new(PaypalIpnVerifier::new(
        PaypalVerifierConfig::default()
            .with_verify_url(config.payment.ipn_verify_url.clone())
            .with_timeout(config.payment.verify_timeout())
            .with_retry(RetryPolicy::with_max_attempts(
                config.payment.verify_max_attempts,
            )),
    )?);

    let notifier: Arc<dyn DonationNotifier> = match &config.notifications.discord_webhook_url {
        Some(url) => Arc::new(DiscordNotifier::new(
            url.clone(),
            config.notifications.timeout(),
            RetryPolicy::with_max_attempts(config.notifications.max_attempts),
        )?),
        None => {
            tracing::info!("No Discord webhook configured, donation notices are logged only");
            Arc::new(TracingNotifier)
        }
    };

    let features = &config.features;
    if !features.write_to_users_db {
        tracing::warn!("Writes to the users database are disabled, running in dry-run mode");
    }
    if !features.require_ipn_verification {
        tracing::warn!("IPN postback verification is disabled");
    }

    let handler = ProcessIpnHandler::new(
        users,
        store.clone(),
        store,
        verifier,
        notifier,
        ProcessIpnSettings {
            policy: config.payment.ipn_policy(),
            require_ipn_verification: features.require_ipn_verification,
            enforce_unique_payments: features.enforce_unique_payments,
            write_to_users_db: features.write_to_users_db,
        },
    );

    let app = http::app(
        IpnAppState {
            process_ipn: Arc::new(handler),
        },
        config.server.request_timeout(),
    );

    let addr = config.server.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, environment = ?config.server.environment, "Listening for payment notifications");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shut down cleanly");
    Ok(())
}

/// Pretty logs for development, JSON for production. `RUST_LOG` overrides
/// the configured filter.
fn init_tracing(server: &ServerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(server.log_filter()))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(filter);

    if server.is_production() {
        registry
            .with(fmt::layer().json().with_current_span(true).with_target(true))
            .init();
    } else {
        registry.with(fmt::layer().with_target(true)).init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
