//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! Every section defaults independently, so a partial file is valid.

mod generation;
mod logging;
mod provider;
mod storage;

pub use generation::FileGenerationConfig;
pub use logging::FileLoggingConfig;
pub use provider::{DEFAULT_API_KEY_ENV, FileProviderConfig};
pub use storage::FileStorageConfig;

use crate::providers::ProviderKind;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A configuration problem. Loading still succeeds; callers report these
/// as warnings.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigIssue {
    /// Dotted path of the offending key.
    pub field: &'static str,
    pub message: String,
}

impl fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub provider: FileProviderConfig,
    pub generation: FileGenerationConfig,
    pub storage: FileStorageConfig,
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        if self.provider.kind().is_none() {
            let known: Vec<&str> = ProviderKind::ALL.iter().map(|k| k.id()).collect();
            issues.push(ConfigIssue {
                field: "provider.id",
                message: format!(
                    "unknown provider '{}' (expected one of: {}); generation requests will fail",
                    self.provider.id,
                    known.join(", ")
                ),
            });
        }

        for id in self.provider.endpoints.keys() {
            if ProviderKind::from_id(id).is_none() {
                issues.push(ConfigIssue {
                    field: "provider.endpoints",
                    message: format!("endpoint override for unknown provider '{}' is ignored", id),
                });
            }
        }

        if self.provider.timeout_secs == 0 {
            issues.push(ConfigIssue {
                field: "provider.timeout_secs",
                message: "timeout of 0 seconds makes every request fail".to_string(),
            });
        }

        if !(0.0..=2.0).contains(&self.generation.temperature) {
            issues.push(ConfigIssue {
                field: "generation.temperature",
                message: format!(
                    "{} is outside the usual range 0.0-2.0",
                    self.generation.temperature
                ),
            });
        }

        if self.generation.max_tokens == 0 {
            issues.push(ConfigIssue {
                field: "generation.max_tokens",
                message: "max_tokens of 0 leaves no room for a reply".to_string(),
            });
        }

        if self.generation.history_window == 0 {
            issues.push(ConfigIssue {
                field: "generation.history_window",
                message: "characters will not see any earlier messages".to_string(),
            });
        }

        issues
    }
}
