//! Core data models for portal-reports
//!
//! Rows, categories, measures and amounts shared by the aggregation core and
//! the exporters.

pub mod category;
pub mod measure;
pub mod metadata;
pub mod money;
pub mod row;

pub use category::Category;
pub use measure::Measure;
pub use metadata::ReportMetadata;
pub use money::{Money, MoneyParseError};
pub use row::TransactionRow;
