use std::io::IsTerminal;

use serde::{Deserialize, Serialize};

use crate::{
    error::LoggerResult, format::LoggerFormat, level::LoggerLevel, timer::LoggerTimeZone,
};

pub const LOG_LEVEL_ENV: &str = "SKIFF_LOG_LEVEL";
pub const LOG_FORMAT_ENV: &str = "SKIFF_LOG_FORMAT";
pub const LOG_TZ_ENV: &str = "SKIFF_LOG_TZ";

/// Logger configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    pub format: LoggerFormat,
    /// Filter expression, e.g. `"info"` or `"skiff_core=debug,info"`.
    pub level: LoggerLevel,
    pub tz: LoggerTimeZone,
    /// Include event targets. Client debug diagnostics use the `skiff::debug` target.
    pub with_targets: bool,
    pub use_color: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            format: LoggerFormat::default(),
            level: LoggerLevel::default(),
            tz: LoggerTimeZone::default(),
            with_targets: true,
            use_color: true,
        }
    }
}

impl LoggerConfig {
    /// Read `SKIFF_LOG_LEVEL`, `SKIFF_LOG_FORMAT` and `SKIFF_LOG_TZ`.
    pub fn from_env() -> LoggerResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Unset or blank variables keep their defaults; malformed ones are errors.
    pub fn from_lookup<F>(lookup: F) -> LoggerResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut cfg = Self::default();
        if let Some(level) = get(LOG_LEVEL_ENV) {
            cfg.level = level.parse()?;
        }
        if let Some(format) = get(LOG_FORMAT_ENV) {
            cfg.format = format.parse()?;
        }
        if let Some(tz) = get(LOG_TZ_ENV) {
            cfg.tz = tz.parse()?;
        }
        Ok(cfg)
    }

    /// Color only when enabled and stdout is a terminal.
    pub fn should_use_color(&self) -> bool {
        self.use_color && std::io::stdout().is_terminal()
    }
}
