//! JSON export
//!
//! Machine-readable dump of a report table with schema versioning. Cells are
//! exported as the same formatted strings the CSV and HTML outputs carry.

use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::error::{ReportError, ReportResult};
use crate::models::ReportMetadata;
use crate::reports::{ReportTable, RowKind, TableRow};

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Top-level JSON document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportExport {
    /// Schema version for compatibility checking
    pub schema_version: String,

    /// Application version that created the export
    pub app_version: String,

    pub metadata: ReportMetadata,

    pub headers: Vec<String>,

    pub sections: Vec<SectionExport>,

    pub grand_total: RowExport,

    /// Number of data rows across all sections
    pub row_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionExport {
    pub label: String,
    pub rows: Vec<RowExport>,
    pub subtotal: RowExport,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RowExport {
    pub kind: RowKind,
    pub cells: Vec<String>,
}

impl RowExport {
    fn from_row(row: &TableRow, table: &ReportTable) -> Self {
        Self {
            kind: row.kind,
            cells: row.render(&table.zero_policy),
        }
    }
}

impl ReportExport {
    /// Build the export document for a table
    pub fn new(table: &ReportTable, meta: &ReportMetadata) -> Self {
        Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            metadata: meta.clone(),
            headers: table.headers.clone(),
            sections: table
                .sections
                .iter()
                .map(|s| SectionExport {
                    label: s.label.clone(),
                    rows: s.rows.iter().map(|r| RowExport::from_row(r, table)).collect(),
                    subtotal: RowExport::from_row(&s.subtotal, table),
                })
                .collect(),
            grand_total: RowExport::from_row(&table.grand_total, table),
            row_count: table.row_count(),
        }
    }
}

/// Render a report table as pretty-printed JSON
pub fn to_json(table: &ReportTable, meta: &ReportMetadata) -> ReportResult<String> {
    serde_json::to_string_pretty(&ReportExport::new(table, meta))
        .map_err(|e| ReportError::Export(e.to_string()))
}

/// Write a report table as JSON
pub fn write_json<W: Write>(
    table: &ReportTable,
    meta: &ReportMetadata,
    writer: &mut W,
    pretty: bool,
) -> ReportResult<()> {
    let export = ReportExport::new(table, meta);
    if pretty {
        serde_json::to_writer_pretty(writer, &export)
    } else {
        serde_json::to_writer(writer, &export)
    }
    .map_err(|e| ReportError::Export(e.to_string()))
}
