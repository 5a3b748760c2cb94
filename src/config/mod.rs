//! Configuration module for the finance tracker
//!
//! - Path resolution for the data directory
//! - User settings, profile and email delivery preferences

pub mod paths;
pub mod settings;

pub use paths::TrackerPaths;
pub use settings::{EmailBackend, EmailSettings, Settings, UserProfile};
