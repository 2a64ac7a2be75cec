//! Generation defaults from TOML (`[generation]` section)

use serde::{Deserialize, Serialize};
use worldtale_application::GenerationParams;

/// Raw generation configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileGenerationConfig {
    /// Sampling temperature for replies.
    pub temperature: f32,
    /// Reply length cap in tokens.
    pub max_tokens: u32,
    /// How many earlier messages a character sees when replying.
    pub history_window: usize,
}

impl Default for FileGenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: 300,
            history_window: 10,
        }
    }
}

impl FileGenerationConfig {
    pub fn to_params(&self) -> GenerationParams {
        GenerationParams::default().with_history_window(self.history_window)
    }
}
