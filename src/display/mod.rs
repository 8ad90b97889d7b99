//! Display formatting
//!
//! `number` holds the currency formatter shared by every output; `report`
//! renders whole tables for the terminal.

pub mod number;
pub mod report;

pub use number::{format_amount, format_f64, format_ratio, format_signed, ratio_percent, ZeroPolicy};
pub use report::format_terminal;
