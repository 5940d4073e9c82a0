//! Authentication provider configuration
//!
//! Providers are decided once at startup and passed into the auth component
//! through this struct; nothing mutates the provider set afterwards.

use std::env;
use tracing::info;

/// Google OAuth provider settings
#[derive(Debug, Clone)]
pub struct GoogleProvider {
    /// OAuth client id; ID tokens must carry it as their audience
    pub client_id: String,
}

/// The set of enabled sign-in providers
///
/// Credential sign-in is always available; external providers are enabled
/// only when their configuration is present.
#[derive(Debug, Clone, Default)]
pub struct AuthProviders {
    pub google: Option<GoogleProvider>,
}

impl AuthProviders {
    /// Build the provider set from the environment
    pub fn from_env() -> Self {
        let google = env::var("GOOGLE_CLIENT_ID")
            .ok()
            .filter(|id| !id.is_empty())
            .map(|client_id| GoogleProvider { client_id });

        if google.is_some() {
            info!("Google sign-in provider enabled");
        } else {
            info!("Google sign-in provider disabled (GOOGLE_CLIENT_ID not set)");
        }

        Self { google }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_has_no_google_provider() {
        let providers = AuthProviders::default();
        assert!(providers.google.is_none());
    }

    #[test]
    fn test_google_provider_carries_client_id() {
        let providers = AuthProviders {
            google: Some(GoogleProvider {
                client_id: "client-123".to_string(),
            }),
        };

        assert_eq!(providers.google.unwrap().client_id, "client-123");
    }
}
