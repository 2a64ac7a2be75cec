//! API key lookup from configuration and the environment.

use crate::config::FileProviderConfig;
use crate::providers::ProviderKind;
use worldtale_application::CredentialProvider;

type EnvLookup = Box<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Resolves the API key for a provider, first match wins:
///
/// 1. `provider.api_key` from the config file
/// 2. the variable named by `provider.api_key_env`
/// 3. the vendor's own variable (`OPENAI_API_KEY`, `ANTHROPIC_API_KEY`, ...)
///
/// Empty values count as unset. Keys are read on every request, so a key
/// exported while the REPL is running is picked up by the next turn.
pub struct ConfigCredentialProvider {
    api_key: Option<String>,
    api_key_env: String,
    env: EnvLookup,
}

impl ConfigCredentialProvider {
    pub fn new(config: &FileProviderConfig) -> Self {
        Self::with_env(config, |name| std::env::var(name).ok())
    }

    /// Use `env` instead of the process environment.
    pub fn with_env(
        config: &FileProviderConfig,
        env: impl Fn(&str) -> Option<String> + Send + Sync + 'static,
    ) -> Self {
        Self {
            api_key: config.api_key.clone(),
            api_key_env: config.api_key_env.clone(),
            env: Box::new(env),
        }
    }

    fn lookup(&self, name: &str) -> Option<String> {
        (self.env)(name).filter(|v| !v.trim().is_empty())
    }
}

impl CredentialProvider for ConfigCredentialProvider {
    fn credential(&self, provider_id: &str) -> Option<String> {
        if let Some(key) = self.api_key.as_ref().filter(|k| !k.trim().is_empty()) {
            return Some(key.clone());
        }
        if let Some(key) = self.lookup(&self.api_key_env) {
            return Some(key);
        }
        ProviderKind::from_id(provider_id)
            .and_then(|kind| kind.vendor_key_env())
            .and_then(|name| self.lookup(name))
    }
}
