//! portal-reports - hierarchical financial aggregation and tabular export
//!
//! Takes flat ledger-style rows fetched from a reporting backend, buckets them
//! into categories, rolls measures up into category subtotals and a grand
//! total (optionally cross-tabulated by cost center, area or province), and
//! renders the result as CSV, print-ready HTML, JSON or a terminal table.
//!
//! # Architecture
//!
//! - `models`: rows, categories, measures, money, report metadata
//! - `services`: classifier, aggregator, cross tab builder, row import
//! - `display`: currency formatting and terminal rendering
//! - `reports`: per-report presets and the exportable table
//! - `export`: CSV, HTML and JSON writers
//! - `config`: path resolution and user settings
//! - `cli`: command handlers for the `portal` binary
//!
//! # Example
//!
//! ```rust
//! use portal_reports::export::to_csv;
//! use portal_reports::models::{Measure, ReportMetadata, TransactionRow};
//! use portal_reports::reports::{ReportKind, ReportSpec};
//!
//! let rows = vec![
//!     TransactionRow::new("A100", "Cash").with(Measure::ClosingBalance, 100),
//!     TransactionRow::new("L100", "Loans").with(Measure::ClosingBalance, -20),
//! ];
//! let table = ReportSpec::for_kind(ReportKind::TrialBalance).build_table(&rows);
//! let meta = ReportMetadata::new("Trial Balance", "TrialBalance", "510", "2024-06");
//! let csv = to_csv(&table, &meta);
//! assert!(csv.contains("Grand Total,,0.00,0.00,0.00,80.00"));
//! ```

pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod models;
pub mod reports;
pub mod services;

pub use error::{ReportError, ReportResult};
