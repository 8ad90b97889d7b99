//! Report services
//!
//! The aggregation core (classification, roll-ups, cross tabs) plus the
//! import adapter that feeds it normalized rows.

pub mod aggregator;
pub mod classifier;
pub mod crosstab;
pub mod import;

pub use aggregator::{
    boundaries, order_rows, sections, Aggregation, Aggregator, CategoryTotal, GrandTotal,
    MeasureTotals, RowBoundary, RowOrdering, Section,
};
pub use classifier::Classifier;
pub use crosstab::{CrossTab, CrossTabBuilder, CrossTabGroup, CrossTabRow, DEFAULT_SECONDARY_KEY};
pub use import::{import_csv, import_file, import_json, FieldMap};
