//! Configuration file loading for worldtale
//!
//! Sources are merged with the following priority (highest to lowest):
//!
//! 1. `WORLDTALE_<SECTION>__<KEY>` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./worldtale.toml` or `./.worldtale.toml`
//! 4. Global: `<config dir>/worldtale/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigIssue, DEFAULT_API_KEY_ENV, FileConfig, FileGenerationConfig, FileLoggingConfig,
    FileProviderConfig, FileStorageConfig,
};
pub use loader::ConfigLoader;
