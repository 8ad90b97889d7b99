//! Report definitions
//!
//! `spec` holds the per-report presets; `table` is the exportable result of
//! running one.

pub mod spec;
pub mod table;

pub use spec::{Layout, ReportKind, ReportSpec, SecondaryDimension};
pub use table::{Cell, Column, ColumnKind, ReportTable, RowKind, TableRow, TableSection, GRAND_TOTAL_LABEL};
