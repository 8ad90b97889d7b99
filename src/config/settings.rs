//! User settings for portal-reports
//!
//! Export presentation preferences and per-report zero-display overrides.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::paths::ReportPaths;
use crate::display::number::ZeroPolicy;
use crate::error::ReportError;
use crate::export::DEFAULT_PAGE_SIZE;
use crate::reports::{ReportKind, ReportSpec};

/// User settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Issuing organization, printed above every export
    #[serde(default)]
    pub organization: String,

    /// Generation timestamp format (strftime)
    #[serde(default = "default_timestamp_format")]
    pub timestamp_format: String,

    /// CSS `@page` size for print output
    #[serde(default = "default_page_size")]
    pub page_size: String,

    /// Where rendered reports go when no output path is given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,

    /// Zero/missing display overrides keyed by report
    #[serde(default)]
    pub zero_policies: BTreeMap<ReportKind, ZeroPolicy>,
}

fn default_schema_version() -> u32 {
    1
}

fn default_timestamp_format() -> String {
    "%Y-%m-%d %H:%M:%S".to_string()
}

fn default_page_size() -> String {
    DEFAULT_PAGE_SIZE.to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            organization: String::new(),
            timestamp_format: default_timestamp_format(),
            page_size: default_page_size(),
            output_dir: None,
            zero_policies: BTreeMap::new(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or default settings if the file doesn't exist
    pub fn load_or_create(paths: &ReportPaths) -> Result<Self, ReportError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path).map_err(|e| {
                ReportError::Io(format!("Failed to read settings file: {}", e))
            })?;

            serde_json::from_str(&contents).map_err(|e| {
                ReportError::Config(format!("Failed to parse settings file: {}", e))
            })
        } else {
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &ReportPaths) -> Result<(), ReportError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self).map_err(|e| {
            ReportError::Config(format!("Failed to serialize settings: {}", e))
        })?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| ReportError::Io(format!("Failed to write settings file: {}", e)))
    }

    /// Export directory: the configured override, else the default under the base dir
    pub fn output_dir(&self, paths: &ReportPaths) -> PathBuf {
        self.output_dir
            .clone()
            .unwrap_or_else(|| paths.output_dir())
    }

    /// Apply the configured zero policy override, if any, to a report spec
    pub fn apply(&self, spec: ReportSpec) -> ReportSpec {
        match self.zero_policies.get(&spec.kind) {
            Some(policy) => spec.with_zero_policy(policy.clone()),
            None => spec,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.schema_version, 1);
        assert_eq!(settings.page_size, "A4 landscape");
        assert!(settings.zero_policies.is_empty());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = ReportPaths::with_base_dir(temp_dir.path().to_path_buf());

        let mut settings = Settings::default();
        settings.organization = "Water Board".to_string();
        settings
            .zero_policies
            .insert(ReportKind::TrialBalance, ZeroPolicy::dash());
        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.organization, "Water Board");
        assert_eq!(
            loaded.zero_policies.get(&ReportKind::TrialBalance),
            Some(&ZeroPolicy::dash())
        );
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let paths = ReportPaths::with_base_dir(temp_dir.path().to_path_buf());
        std::fs::write(
            paths.settings_file(),
            r#"{"zero_policies":{"job-card":{"missing":"--","zero":"0"}}}"#,
        )
        .unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.timestamp_format, "%Y-%m-%d %H:%M:%S");
        assert_eq!(
            loaded.zero_policies.get(&ReportKind::JobCard),
            Some(&ZeroPolicy::new("--", "0"))
        );
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let paths = ReportPaths::with_base_dir(temp_dir.path().to_path_buf());
        std::fs::write(paths.settings_file(), "{not json").unwrap();

        let err = Settings::load_or_create(&paths).unwrap_err();
        assert!(matches!(err, ReportError::Config(_)));
    }

    #[test]
    fn test_apply_overrides_zero_policy() {
        let mut settings = Settings::default();
        settings
            .zero_policies
            .insert(ReportKind::IncomeExpenditure, ZeroPolicy::zero_decimal());

        let spec = settings.apply(ReportSpec::for_kind(ReportKind::IncomeExpenditure));
        assert_eq!(spec.zero_policy, ZeroPolicy::zero_decimal());

        let untouched = settings.apply(ReportSpec::for_kind(ReportKind::JobCard));
        assert_eq!(untouched.zero_policy, ZeroPolicy::not_available());
    }

    #[test]
    fn test_output_dir_override() {
        let temp_dir = TempDir::new().unwrap();
        let paths = ReportPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut settings = Settings::default();
        assert_eq!(settings.output_dir(&paths), paths.output_dir());

        settings.output_dir = Some(PathBuf::from("/srv/reports"));
        assert_eq!(settings.output_dir(&paths), PathBuf::from("/srv/reports"));
    }
}
