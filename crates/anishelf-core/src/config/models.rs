use crate::config::defaults;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// High-level app configuration; deserializable from TOML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "crate::config::defaults::default_theme")]
    pub theme: ThemeMode,
    #[serde(default = "crate::config::defaults::default_grid_columns")]
    pub grid_columns: u32,
    #[serde(default = "crate::config::defaults::default_card_size")]
    pub card_size: CardSize,
    #[serde(default = "crate::config::defaults::default_sort_order")]
    pub sort_order: SortOrder,
    #[serde(default = "crate::config::defaults::default_show_descriptions")]
    pub show_descriptions: bool,
    #[serde(default = "crate::config::defaults::default_log_level")]
    pub log_level: LogLevel,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            theme: defaults::default_theme(),
            grid_columns: defaults::default_grid_columns(),
            card_size: defaults::default_card_size(),
            sort_order: defaults::default_sort_order(),
            show_descriptions: defaults::default_show_descriptions(),
            log_level: defaults::default_log_level(),
        }
    }
}

impl AppConfig {
    /// Clamps values a hand-edited file can push out of range.
    pub fn sanitized(mut self) -> Self {
        self.grid_columns = self
            .grid_columns
            .clamp(defaults::MIN_GRID_COLUMNS, defaults::MAX_GRID_COLUMNS);
        self
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, TS)]
#[serde(rename_all = "kebab-case")]
#[ts(export)]
pub enum ThemeMode {
    Day,
    #[default]
    Night,
}

impl std::fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ThemeMode::Day => "Day",
            ThemeMode::Night => "Night",
        };
        write!(f, "{}", label)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, TS)]
#[serde(rename_all = "kebab-case")]
#[ts(export)]
pub enum CardSize {
    Small,
    #[default]
    Medium,
    Large,
}

/// Ordering of collections on the overview grid.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, TS)]
#[serde(rename_all = "kebab-case")]
#[ts(export)]
pub enum SortOrder {
    NameAsc,
    NameDesc,
    CreatedDesc,
    #[default]
    UpdatedDesc,
}

/// Supported logging verbosity levels.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_filter_str())
    }
}

impl LogLevel {
    pub fn as_filter_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }

    pub fn parse_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "trace" => Some(LogLevel::Trace),
            "debug" => Some(LogLevel::Debug),
            "info" => Some(LogLevel::Info),
            "warn" | "warning" => Some(LogLevel::Warn),
            "error" => Some(LogLevel::Error),
            _ => None,
        }
    }
}
