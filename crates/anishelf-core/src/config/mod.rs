//! Persisted display preferences and runtime settings.
//!
//! Everything user-tunable lives in one TOML file (`conf/config.toml` by
//! default). Missing keys take their individual defaults and an unreadable file
//! falls back to [`AppConfig::default`] so the UI can still launch.

mod defaults;
mod io;
mod models;

pub use io::{ConfigError, load_config, parse_config, save_config, serialize_config};
pub use models::{AppConfig, CardSize, LogLevel, SortOrder, ThemeMode};
