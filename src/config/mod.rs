mod defaults;
mod types;

pub use types::*;

use crate::calendar::TermCalendar;
use crate::error::ConfigError;
use defaults::*;
use std::path::Path;

impl Default for Config {
    fn default() -> Self {
        Self {
            version: default_version(),
            user_id: None,
            api: ApiConfig::default(),
            calendar: CalendarConfig::default(),
            retry: RetryConfig::default(),
        }
    }
}

impl Config {
    /// Load config from a YAML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Load the file if it exists, otherwise fall back to defaults
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::debug!("Config {:?} not found, using defaults", path);
            Ok(Self::default())
        }
    }

    /// Validate the config
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api.base_url.trim().is_empty() {
            return Err(ConfigError::MissingBaseUrl);
        }

        if self.retry.max_attempts == 0 {
            return Err(ConfigError::NoRetryAttempts);
        }

        self.term_calendar()?;
        Ok(())
    }

    pub fn term_calendar(&self) -> Result<TermCalendar, ConfigError> {
        TermCalendar::new(self.calendar.first_year, self.calendar.last_year)
    }
}
