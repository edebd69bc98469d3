use crate::calculations::streak::DEFAULT_COMPLETION_WINDOW_DAYS;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;
use thiserror::Error;

pub const WINDOW_DAYS_ENV: &str = "HABIT_STREAKS_WINDOW_DAYS";

/// Longest completion-rate window accepted from config (ten years).
pub const MAX_WINDOW_DAYS: u32 = 3660;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config json: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("completion window must be between 1 and {max} days (got {0})", max = MAX_WINDOW_DAYS)]
    InvalidWindow(u32),
    #[error("{env} is not a number: '{0}'", env = WINDOW_DAYS_ENV)]
    InvalidEnv(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    pub completion_window_days: u32,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            completion_window_days: DEFAULT_COMPLETION_WINDOW_DAYS,
        }
    }
}

impl TrackerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.completion_window_days == 0 || self.completion_window_days > MAX_WINDOW_DAYS {
            return Err(ConfigError::InvalidWindow(self.completion_window_days));
        }
        Ok(())
    }

    pub fn load_from_json<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let file = File::open(path.as_ref())?;
        let config: TrackerConfig = serde_json::from_reader(file)?;
        config.validate()?;
        tracing::debug!(path = %path.as_ref().display(), ?config, "loaded tracker config");
        Ok(config)
    }

    pub fn save_to_json<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Applies `HABIT_STREAKS_WINDOW_DAYS` when it is set.
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        match std::env::var(WINDOW_DAYS_ENV) {
            Ok(raw) => self.with_window_override(Some(&raw)),
            Err(_) => Ok(self),
        }
    }

    fn with_window_override(mut self, raw: Option<&str>) -> Result<Self, ConfigError> {
        if let Some(raw) = raw {
            let days = raw
                .trim()
                .parse::<u32>()
                .map_err(|_| ConfigError::InvalidEnv(raw.to_string()))?;
            self.completion_window_days = days;
            self.validate()?;
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_window_is_thirty_days() {
        assert_eq!(TrackerConfig::default().completion_window_days, 30);
    }

    #[test]
    fn override_parses_and_validates() {
        let config = TrackerConfig::default()
            .with_window_override(Some(" 14 "))
            .unwrap();
        assert_eq!(config.completion_window_days, 14);

        assert!(matches!(
            TrackerConfig::default().with_window_override(Some("0")),
            Err(ConfigError::InvalidWindow(0))
        ));
        assert!(matches!(
            TrackerConfig::default().with_window_override(Some("two weeks")),
            Err(ConfigError::InvalidEnv(_))
        ));
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: TrackerConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, TrackerConfig::default());
    }
}
