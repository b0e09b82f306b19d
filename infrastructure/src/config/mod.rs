//! Configuration file loading for ai-roundtable
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `ROUNDTABLE_*` environment variables (`__` separates section and key)
//! 2. `--config <path>` specified file
//! 3. Project root: `./roundtable.toml` or `./.roundtable.toml`
//! 4. Global: `$XDG_CONFIG_HOME/ai-roundtable/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    FileConfig, FileDeliberationConfig, FileExecutionConfig, FileGatewayConfig, FileModelsConfig,
    FileOutputConfig, FileProviderConfig, FileProvidersConfig, FileSettingsConfig, parse_settings,
};
pub use loader::ConfigLoader;
