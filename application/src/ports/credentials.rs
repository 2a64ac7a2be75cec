//! Credential lookup port.
//!
//! Gateways never hold API keys themselves; they ask a [`CredentialProvider`]
//! right before each request.

/// Source of API credentials, keyed by provider id.
pub trait CredentialProvider: Send + Sync {
    /// The credential for `provider_id`, if one is configured.
    fn credential(&self, provider_id: &str) -> Option<String>;
}

/// Provider that never has a credential. Requests go out unauthenticated.
pub struct NoCredentials;

impl CredentialProvider for NoCredentials {
    fn credential(&self, _provider_id: &str) -> Option<String> {
        None
    }
}
