//! Feature flags configuration

use serde::Deserialize;

/// Switches for the processing pipeline
#[derive(Debug, Clone, Deserialize)]
pub struct FeatureFlags {
    /// Persist entitlement changes; when off, outcomes are only logged
    #[serde(default = "default_true")]
    pub write_to_users_db: bool,

    /// Refuse transaction ids that were already processed
    #[serde(default = "default_true")]
    pub enforce_unique_payments: bool,

    /// Confirm each notification with the processor before acting on it
    #[serde(default = "default_true")]
    pub require_ipn_verification: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            write_to_users_db: true,
            enforce_unique_payments: true,
            require_ipn_verification: true,
        }
    }
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_flags_default_to_safe_values() {
        let flags = FeatureFlags::default();
        assert!(flags.write_to_users_db);
        assert!(flags.enforce_unique_payments);
        assert!(flags.require_ipn_verification);
    }

    #[test]
    fn test_missing_flags_deserialize_as_enabled() {
        let flags: FeatureFlags =
            serde_json::from_str(r#"{ "write_to_users_db": false }"#).unwrap();
        assert!(!flags.write_to_users_db);
        assert!(flags.enforce_unique_payments);
        assert!(flags.require_ipn_verification);
    }
}
