//! Configuration module for portal-reports
//!
//! - Base directory resolution
//! - User settings persistence

pub mod paths;
pub mod settings;

pub use paths::ReportPaths;
pub use settings::Settings;
