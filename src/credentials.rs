//! API key handling.
//!
//! The key itself is owned by the host environment, never by this crate.
//! The client only checks for presence and, when missing, hands control to
//! the host's selection flow through [`CredentialProvider`]. Injecting the
//! provider keeps the client testable with a stub.

use async_trait::async_trait;

use crate::error::CredentialError;

/// Host-provided key selection and lookup.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// Read-only check for an already-selected key. No side effects.
    async fn has_selected_key(&self) -> bool;

    /// Run the host's interactive key-selection flow, suspending until it
    /// completes or the user dismisses it.
    async fn open_key_selector(&self) -> Result<(), CredentialError>;

    /// The key attached to outgoing calls, if one is active.
    async fn active_key(&self) -> Option<String>;
}

/// Key provider backed by a process environment variable.
///
/// This is the CLI's host environment: there is no interactive selector, so
/// acquisition reports [`CredentialError::SelectorUnavailable`] and the user
/// is expected to export the variable instead.
pub struct EnvCredentials {
    var: String,
}

impl EnvCredentials {
    pub const DEFAULT_VAR: &'static str = "GEMINI_API_KEY";

    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl Default for EnvCredentials {
    fn default() -> Self {
        Self::new(Self::DEFAULT_VAR)
    }
}

#[async_trait]
impl CredentialProvider for EnvCredentials {
    async fn has_selected_key(&self) -> bool {
        std::env::var(&self.var).map(|v| !v.is_empty()).unwrap_or(false)
    }

    async fn open_key_selector(&self) -> Result<(), CredentialError> {
        tracing::warn!("No key selection flow available; set {} instead", self.var);
        Err(CredentialError::SelectorUnavailable)
    }

    async fn active_key(&self) -> Option<String> {
        std::env::var(&self.var).ok().filter(|v| !v.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_var_means_no_key() {
        let creds = EnvCredentials::new("REEL_ANIMATOR_TEST_KEY_UNSET");
        assert!(!creds.has_selected_key().await);
        assert!(creds.active_key().await.is_none());
    }

    #[test]
    fn set_var_is_reported_as_active_key() {
        std::env::set_var("REEL_ANIMATOR_TEST_KEY_SET", "abc123");
        let creds = EnvCredentials::new("REEL_ANIMATOR_TEST_KEY_SET");

        assert!(tokio_test::block_on(creds.has_selected_key()));
        assert_eq!(
            tokio_test::block_on(creds.active_key()),
            Some("abc123".to_string())
        );

        std::env::remove_var("REEL_ANIMATOR_TEST_KEY_SET");
    }

    #[tokio::test]
    async fn selector_is_unavailable_for_env_provider() {
        let creds = EnvCredentials::default();
        assert!(matches!(
            creds.open_key_selector().await,
            Err(CredentialError::SelectorUnavailable)
        ));
    }
}
