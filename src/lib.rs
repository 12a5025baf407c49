//! # Datalens - Descriptive Statistics and Insights for Tabular Data
//!
//! Datalens loads a CSV file into a polars `DataFrame`, computes descriptive
//! statistics per numeric column (optionally split by a categorical column),
//! correlates the numeric columns, and turns the table's shape into a short
//! list of plain-language observations.
//!
//! ## Quick Start
//!
//! ```no_run
//! use datalens::analyser::logic;
//! use datalens::config::InsightConfig;
//!
//! # fn example() -> datalens::error::Result<()> {
//! let df = logic::load_table("employees.csv".as_ref())?;
//!
//! let age = logic::compute_column_statistics(&df, "Age")?;
//! println!("mean age {:.1}, median {:.1}", age.mean, age.median);
//!
//! for line in logic::generate_insights_text(&df, &InsightConfig::default())? {
//!     println!("{line}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Core Modules
//!
//! - [`analyser::logic`]: statistics, grouping, correlation, insights, chart data
//! - [`config`]: insight thresholds
//! - [`error`]: error types
//! - [`logging`]: logger setup for the command line
//!
//! ## Undefined Statistics
//!
//! A statistic that cannot be computed (a standard deviation from one value,
//! a correlation against a constant column) is a
//! [`Statistic::Undefined`](analyser::logic::Statistic) carrying the reason,
//! never a silent zero or `NaN`.

#![warn(clippy::all, rust_2018_idioms)]

pub mod analyser;
pub mod config;
pub mod error;
pub mod logging;
