//! CLI command handlers
//!
//! Bridges clap argument parsing with the report engine.

pub mod report;

pub use report::{format_report_list, handle_report_command, ExportFormat, ReportArgs, ReportCommands};
