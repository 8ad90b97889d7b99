//! Normalized report rows
//!
//! A `TransactionRow` is the strongly typed form of one fetched ledger line.
//! Shape tolerance for the upstream payload lives in the import adapter; by
//! the time a row reaches the core its fields are fixed.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::measure::Measure;
use super::money::Money;

/// One ledger / report line
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionRow {
    /// Classification key (account or category code)
    pub key: String,

    /// Human-readable name or description
    #[serde(default)]
    pub name: String,

    /// Explicit category flag ("I", "X", "E") for flag-classified reports
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flag: Option<String>,

    /// Secondary dimension key (cost center, area, province)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary: Option<String>,

    /// Measures present on the row; absent means missing upstream
    #[serde(default)]
    measures: BTreeMap<Measure, Money>,
}

impl TransactionRow {
    /// Create a row with a key and name and no measures
    pub fn new(key: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    /// Builder-style: set a measure
    pub fn with(mut self, measure: Measure, value: impl Into<Money>) -> Self {
        self.measures.insert(measure, value.into());
        self
    }

    /// Builder-style: set the category flag
    pub fn with_flag(mut self, flag: impl Into<String>) -> Self {
        self.flag = Some(flag.into());
        self
    }

    /// Builder-style: set the secondary key
    pub fn with_secondary(mut self, secondary: impl Into<String>) -> Self {
        self.secondary = Some(secondary.into());
        self
    }

    /// Set a measure in place
    pub fn set(&mut self, measure: Measure, value: Money) {
        self.measures.insert(measure, value);
    }

    /// Measure value for aggregation; missing values count as zero
    pub fn measure(&self, measure: Measure) -> Money {
        self.measures.get(&measure).copied().unwrap_or_default()
    }

    /// Measure value as fetched, `None` when missing
    pub fn raw(&self, measure: Measure) -> Option<Money> {
        self.measures.get(&measure).copied()
    }

    /// Secondary key, treating blank strings as absent
    pub fn secondary_key(&self) -> Option<&str> {
        self.secondary
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_measure_reads_zero() {
        let row = TransactionRow::new("A100", "Cash").with(Measure::Debit, 10);
        assert_eq!(row.measure(Measure::Debit), Money::from_units(10));
        assert_eq!(row.measure(Measure::Credit), Money::zero());
        assert_eq!(row.raw(Measure::Credit), None);
    }

    #[test]
    fn test_blank_secondary_is_absent() {
        let row = TransactionRow::new("4100", "Sales").with_secondary("  ");
        assert_eq!(row.secondary_key(), None);

        let row = TransactionRow::new("4100", "Sales").with_secondary(" 510.20 ");
        assert_eq!(row.secondary_key(), Some("510.20"));
    }
}
