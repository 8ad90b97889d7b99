//! Export module
//!
//! Serializes a `ReportTable` plus its `ReportMetadata`:
//! - CSV: spreadsheet-compatible, metadata lines above the header
//! - HTML: print-ready document with an inline print stylesheet
//! - JSON: machine-readable, schema-versioned

pub mod csv;
pub mod html;
pub mod json;

pub use csv::{escape_csv, to_csv, write_csv};
pub use html::{escape_html, to_print_html, to_print_html_with, HtmlOptions, DEFAULT_PAGE_SIZE};
pub use json::{to_json, write_json, ReportExport, EXPORT_SCHEMA_VERSION};
