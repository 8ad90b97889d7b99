//! Report categories
//!
//! A category is the semantic bucket a row lands in after classification.
//! It is never stored on a row; it is recomputed from the classification key
//! whenever it is needed.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A semantic bucket produced by a classifier
///
/// The declaration order is the display order used when a report groups its
/// rows by category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Assets,
    Liabilities,
    Income,
    Revenue,
    Expenditure,
    /// Catch-all for keys no rule recognises
    Other,
}

impl Category {
    /// Human-readable label used in headers and subtotal rows
    pub fn label(&self) -> &'static str {
        match self {
            Category::Assets => "Assets",
            Category::Liabilities => "Liabilities",
            Category::Income => "Income",
            Category::Revenue => "Revenue",
            Category::Expenditure => "Expenditure",
            Category::Other => "Other",
        }
    }

    /// Label of the subtotal row closing this category's section
    pub fn total_label(&self) -> String {
        format!("Total {}", self.label())
    }

    /// Whether this is the catch-all bucket
    pub fn is_other(&self) -> bool {
        matches!(self, Category::Other)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
