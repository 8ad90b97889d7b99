//! Row classification
//!
//! Maps a classification key to a `Category`. Both rules are total: every
//! input, including the empty string, lands in exactly one category.

use serde::{Deserialize, Serialize};

use crate::models::{Category, TransactionRow};

/// The classification rule a report uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classifier {
    /// Uppercased first character of the account code:
    /// `A` Assets, `E` Expenditure, `L` Liabilities, `R` Revenue, else Other
    AccountPrefix,
    /// Explicit category flag on the row: `I` Income, `X`/`E` Expenditure
    CategoryFlag,
}

const PREFIX_CATEGORIES: &[Category] = &[
    Category::Assets,
    Category::Liabilities,
    Category::Revenue,
    Category::Expenditure,
    Category::Other,
];

const FLAG_CATEGORIES: &[Category] = &[Category::Income, Category::Expenditure];

impl Classifier {
    /// Classify a discriminant (account code or flag)
    pub fn classify(&self, code: &str) -> Category {
        let first = code.chars().next().map(|c| c.to_ascii_uppercase());
        match self {
            Classifier::AccountPrefix => match first {
                Some('A') => Category::Assets,
                Some('E') => Category::Expenditure,
                Some('L') => Category::Liabilities,
                Some('R') => Category::Revenue,
                _ => Category::Other,
            },
            Classifier::CategoryFlag => match code.trim().to_ascii_uppercase().as_str() {
                "I" => Category::Income,
                "X" | "E" => Category::Expenditure,
                _ => Category::Other,
            },
        }
    }

    /// The part of a row this rule looks at
    pub fn discriminant<'r>(&self, row: &'r TransactionRow) -> &'r str {
        match self {
            Classifier::AccountPrefix => &row.key,
            Classifier::CategoryFlag => row.flag.as_deref().unwrap_or(""),
        }
    }

    /// Classify a whole row
    pub fn classify_row(&self, row: &TransactionRow) -> Category {
        self.classify(self.discriminant(row))
    }

    /// Categories this rule declares up front
    ///
    /// `Other` is always reachable as the catch-all, but only the prefix rule
    /// declares it; flag reports only show it when a row actually lands there.
    pub fn categories(&self) -> &'static [Category] {
        match self {
            Classifier::AccountPrefix => PREFIX_CATEGORIES,
            Classifier::CategoryFlag => FLAG_CATEGORIES,
        }
    }
}
