//! Path management for portal-reports
//!
//! ## Path Resolution Order
//!
//! 1. `PORTAL_REPORTS_HOME` environment variable (if set)
//! 2. The platform config directory from `directories::ProjectDirs`
//!    (`~/.config/portal-reports` on Linux, `%APPDATA%\portal-reports` on Windows)

use std::path::{Path, PathBuf};

use directories::ProjectDirs;

use crate::error::ReportError;

/// Environment variable overriding the base directory
pub const HOME_ENV_VAR: &str = "PORTAL_REPORTS_HOME";

/// Manages all paths used by portal-reports
#[derive(Debug, Clone)]
pub struct ReportPaths {
    /// Base directory for settings and exports
    base_dir: PathBuf,
}

impl ReportPaths {
    /// Resolve the base directory
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined and the
    /// environment override is not set.
    pub fn new() -> Result<Self, ReportError> {
        let base_dir = match std::env::var_os(HOME_ENV_VAR) {
            Some(custom) if !custom.is_empty() => PathBuf::from(custom),
            _ => ProjectDirs::from("", "", "portal-reports")
                .map(|dirs| dirs.config_dir().to_path_buf())
                .ok_or_else(|| {
                    ReportError::Config("Could not determine a configuration directory".into())
                })?,
        };

        Ok(Self { base_dir })
    }

    /// Create ReportPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Default directory for rendered reports
    pub fn output_dir(&self) -> PathBuf {
        self.base_dir.join("exports")
    }

    /// Ensure the base directory exists
    pub fn ensure_directories(&self) -> Result<(), ReportError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| ReportError::Io(format!("Failed to create base directory: {}", e)))
    }

    /// Check if a settings file has been written
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}
