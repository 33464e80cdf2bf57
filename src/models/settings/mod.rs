// Settings module
// User configuration loaded from config.toml

use std::path::PathBuf;

use log::LevelFilter;
use serde::{Deserialize, Serialize};

use crate::models::event::EventFilter;
use crate::utils::date::DateLocale;

pub const DEFAULT_TICK_INTERVAL_MS: u64 = 1_000;
pub const MIN_TICK_INTERVAL_MS: u64 = 100;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Event file; `None` resolves to the platform data directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_file: Option<PathBuf>,
    /// Countdown recomputation period
    pub tick_interval_ms: u64,
    /// Filter applied by `list`/`watch` when none is given
    pub default_filter: EventFilter,
    /// env_logger filter used when `RUST_LOG` is unset
    pub log_level: String,
    pub date_locale: DateLocale,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_file: None,
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            default_filter: EventFilter::All,
            log_level: "info".to_string(),
            date_locale: DateLocale::Ja,
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<(), String> {
        if self.tick_interval_ms < MIN_TICK_INTERVAL_MS {
            return Err(format!(
                "tick_interval_ms must be at least {} (got {})",
                MIN_TICK_INTERVAL_MS, self.tick_interval_ms
            ));
        }

        if self.log_level.trim().is_empty() {
            return Err("log_level cannot be empty".to_string());
        }

        if self.log_level.trim().parse::<LevelFilter>().is_err() {
            return Err(format!(
                "log_level must be one of off, error, warn, info, debug, trace (got {})",
                self.log_level
            ));
        }

        Ok(())
    }

    /// Configured log level, falling back to `info` when unparseable.
    pub fn log_filter(&self) -> LevelFilter {
        self.log_level.trim().parse().unwrap_or(LevelFilter::Info)
    }

    pub fn tick_interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.tick_interval_ms.max(MIN_TICK_INTERVAL_MS))
    }
}
