//! Storage configuration from TOML (`[storage]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw storage configuration from TOML
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileStorageConfig {
    /// Directory holding the collection files.
    pub data_dir: Option<PathBuf>,
}

impl FileStorageConfig {
    /// Configured directory, else `<platform data dir>/worldtale`, else
    /// `./.worldtale`.
    pub fn resolve_data_dir(&self) -> PathBuf {
        if let Some(dir) = &self.data_dir {
            return dir.clone();
        }
        dirs::data_dir()
            .map(|d| d.join("worldtale"))
            .unwrap_or_else(|| PathBuf::from(".worldtale"))
    }
}
