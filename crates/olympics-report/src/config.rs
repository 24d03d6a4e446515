//! # Report Configuration
//!
//! Environment-based configuration for the report binary.

use std::env;
use std::path::PathBuf;

use olympics_analytics::{DataPaths, PreprocessOptions};
use olympics_domain::Season;

use crate::error::ConfigError;

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Report configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Input table locations
    pub data: DataPaths,

    /// Season kept by preprocessing, `None` for every season
    pub season: Option<Season>,

    /// Logging level
    pub log_level: String,

    /// Logging format
    pub log_format: LogFormat,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = DataPaths::default();

        let season: Option<Season> = match lookup("OLYMPICS_SEASON") {
            Some(value) if value.eq_ignore_ascii_case("all") => None,
            Some(value) => Some(value.parse()?),
            None => Some(Season::Summer),
        };

        let log_format = match lookup("LOG_FORMAT").as_deref() {
            None | Some("pretty") => LogFormat::Pretty,
            Some("json") => LogFormat::Json,
            Some(other) => return Err(ConfigError::InvalidLogFormat(other.to_string())),
        };

        Ok(Self {
            data: DataPaths {
                events: lookup("OLYMPICS_EVENTS_PATH").map_or(defaults.events, PathBuf::from),
                regions: lookup("OLYMPICS_REGIONS_PATH").map_or(defaults.regions, PathBuf::from),
            },
            season,
            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            log_format,
        })
    }

    /// Preprocessing options derived from this configuration
    pub fn preprocess_options(&self) -> PreprocessOptions {
        PreprocessOptions {
            season: self.season,
        }
    }
}
