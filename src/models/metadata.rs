//! Report metadata printed above (and below) exported tables

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Descriptive information about one report invocation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Report title, e.g. "Trial Balance"
    pub title: String,

    /// File-name friendly report name, e.g. "TrialBalance"
    pub report_name: String,

    /// Scope identifier (cost center id, department id, province id)
    pub scope_id: String,

    /// Scope display name
    #[serde(default)]
    pub scope_name: String,

    /// Reporting period, e.g. "2024-03"
    pub period: String,

    /// Issuing organization, printed in headers when non-empty
    #[serde(default)]
    pub organization: String,

    /// When the report was generated
    pub generated_at: NaiveDateTime,

    /// strftime format for `generated_at`
    #[serde(default = "default_timestamp_format")]
    pub timestamp_format: String,
}

fn default_timestamp_format() -> String {
    "%Y-%m-%d %H:%M:%S".to_string()
}

impl ReportMetadata {
    /// Create metadata stamped with the current local time
    pub fn new(
        title: impl Into<String>,
        report_name: impl Into<String>,
        scope_id: impl Into<String>,
        period: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            report_name: report_name.into(),
            scope_id: scope_id.into(),
            scope_name: String::new(),
            period: period.into(),
            organization: String::new(),
            generated_at: chrono::Local::now().naive_local(),
            timestamp_format: default_timestamp_format(),
        }
    }

    /// Builder-style: set the scope display name
    pub fn with_scope_name(mut self, name: impl Into<String>) -> Self {
        self.scope_name = name.into();
        self
    }

    /// Builder-style: set the organization
    pub fn with_organization(mut self, organization: impl Into<String>) -> Self {
        self.organization = organization.into();
        self
    }

    /// Builder-style: pin the generation timestamp
    pub fn generated_at(mut self, at: NaiveDateTime) -> Self {
        self.generated_at = at;
        self
    }

    /// Generation timestamp rendered with the configured format
    pub fn timestamp(&self) -> String {
        self.generated_at.format(&self.timestamp_format).to_string()
    }

    /// "510.20 - Colombo North", or just the id when no name is known
    pub fn scope_label(&self) -> String {
        if self.scope_name.trim().is_empty() {
            self.scope_id.clone()
        } else {
            format!("{} - {}", self.scope_id, self.scope_name)
        }
    }

    /// Export file name: `{ReportName}_{ScopeId}_{Period}.{extension}`
    pub fn file_name(&self, extension: &str) -> String {
        format!(
            "{}_{}_{}.{}",
            sanitize(&self.report_name),
            sanitize(&self.scope_id),
            sanitize(&self.period),
            extension
        )
    }
}

/// Replace characters that are unsafe in file names
fn sanitize(part: &str) -> String {
    part.trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '-',
            c if c.is_whitespace() => '-',
            c => c,
        })
        .collect()
}
