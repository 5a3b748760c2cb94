//! fintrack - personal finance tracker
//!
//! This library provides the core functionality for the fintrack CLI:
//! income and expense tracking by category, budgets evaluated over daily,
//! weekly, monthly or yearly periods, and email alerts when spending
//! reaches a budget's alert threshold.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration, profile and path management
//! - `error`: Custom error types
//! - `logging`: Tracing subscriber setup
//! - `models`: Core data models (categories, transactions, budgets, schedules)
//! - `storage`: JSON file storage layer
//! - `audit`: Audit logging system
//! - `services`: Business logic layer, including budget evaluation
//! - `notify`: Email rendering and delivery
//! - `reports`: Summaries, dashboard and trends
//! - `display` and `cli`: Terminal output and command handlers
//!
//! # Example
//!
//! ```rust,ignore
//! use finance_tracker::config::{paths::TrackerPaths, settings::Settings};
//! use finance_tracker::storage::Storage;
//!
//! let paths = TrackerPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let mut storage = Storage::new(paths)?;
//! storage.load_all()?;
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod logging;
pub mod models;
pub mod notify;
pub mod reports;
pub mod services;
pub mod storage;

pub use error::{TrackerError, TrackerResult};
