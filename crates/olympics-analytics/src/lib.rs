//! # Olympics Analytics
//!
//! Aggregations over the historical Olympic Games dataset.
//! Uses DuckDB as an embedded columnar engine for grouping, joins and pivots.
//!
//! ## Features
//!
//! - Medal tallies by year and country
//! - Participation trends over editions
//! - Sport and country heatmaps
//! - Most successful athletes
//! - Age and physique demographics

#![forbid(unsafe_code)]
#![warn(clippy::all, missing_docs)]

pub mod demographics;
pub mod engine;
pub mod error;
pub mod heatmap;
pub mod leaderboard;
pub mod reports;
pub mod tally;
pub mod trends;

mod filter;
#[cfg(test)]
mod test_support;

pub use engine::{DataPaths, FilterOptions, OlympicsEngine, OverviewStats, PreprocessOptions};
pub use error::AnalyticsError;
pub use reports::{OlympicsReport, ReportRequest};
