use crate::config::{CardSize, LogLevel, SortOrder, ThemeMode};

pub(crate) const MIN_GRID_COLUMNS: u32 = 1;
pub(crate) const MAX_GRID_COLUMNS: u32 = 12;

pub(crate) fn default_theme() -> ThemeMode {
    ThemeMode::Night
}

pub(crate) fn default_grid_columns() -> u32 {
    5
}

pub(crate) fn default_card_size() -> CardSize {
    CardSize::Medium
}

pub(crate) fn default_sort_order() -> SortOrder {
    SortOrder::UpdatedDesc
}

pub(crate) fn default_show_descriptions() -> bool {
    true
}

pub(crate) fn default_log_level() -> LogLevel {
    LogLevel::Info
}
