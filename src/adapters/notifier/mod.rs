//! Donation notifier adapters.

mod discord;
mod tracing_notifier;

pub use discord::DiscordNotifier;
pub use tracing_notifier::TracingNotifier;
