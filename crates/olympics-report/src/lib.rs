//! # Olympics Report
//!
//! Configuration and error types for the `olympics-report` binary, which
//! loads the dataset once and prints an analytics report as Markdown or JSON.

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;

pub use config::{Config, LogFormat};
pub use error::ConfigError;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
