use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::defaults::*;

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,

    /// Student whose plan is loaded and saved
    #[serde(default)]
    pub user_id: Option<String>,

    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub calendar: CalendarConfig,

    #[serde(default)]
    pub retry: RetryConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct ApiConfig {
    /// Base URL shared by the catalog, term, prerequisite and plan services
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Sent as a bearer token when present
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_timeout_sec")]
    pub timeout_sec: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            timeout_sec: default_timeout_sec(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct CalendarConfig {
    #[serde(default = "default_first_year")]
    pub first_year: i32,

    #[serde(default = "default_last_year")]
    pub last_year: i32,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            first_year: default_first_year(),
            last_year: default_last_year(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct RetryConfig {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    #[serde(default = "default_backoff_base_ms")]
    pub backoff_base_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            backoff_base_ms: default_backoff_base_ms(),
        }
    }
}
