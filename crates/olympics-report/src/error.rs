//! # Configuration Errors

use thiserror::Error;

/// Invalid environment configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid OLYMPICS_SEASON: {0}")]
    InvalidSeason(#[from] olympics_domain::DomainError),

    #[error("Invalid LOG_FORMAT '{0}', expected 'pretty' or 'json'")]
    InvalidLogFormat(String),
}
