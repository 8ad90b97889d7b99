//! Account × secondary-key cross tabulation
//!
//! Splits one measure of every account across a second dimension (cost
//! center, area, province) and produces row, column and grand totals.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use tracing::debug;

use crate::models::{Category, Measure, Money, TransactionRow};

use super::classifier::Classifier;

/// Column assigned to rows that carry no secondary key
pub const DEFAULT_SECONDARY_KEY: &str = "DEFAULT";

/// One account's cells across every observed secondary key
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrossTabRow {
    pub account: String,
    pub name: String,
    /// One cell per entry of `CrossTab::secondary_keys`, zero when absent
    pub cells: Vec<Money>,
    pub total: Money,
}

/// Accounts sharing a category (or all accounts when ungrouped)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrossTabGroup {
    pub category: Option<Category>,
    pub rows: Vec<CrossTabRow>,
    /// Column-wise sum over this group's accounts
    pub subtotals: Vec<Money>,
    pub total: Money,
}

/// A complete cross tab
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrossTab {
    pub measure: Measure,
    /// Column order, ascending on the raw key string
    pub secondary_keys: Vec<String>,
    pub groups: Vec<CrossTabGroup>,
    pub column_totals: Vec<Money>,
    pub grand_total: Money,
}

impl CrossTab {
    /// Every account row, in display order
    pub fn account_rows(&self) -> impl Iterator<Item = &CrossTabRow> {
        self.groups.iter().flat_map(|g| g.rows.iter())
    }

    /// Row totals in display order
    pub fn row_totals(&self) -> Vec<Money> {
        self.account_rows().map(|r| r.total).collect()
    }

    /// Value of one (account, secondary key) cell, zero when absent
    pub fn cell(&self, account: &str, secondary_key: &str) -> Money {
        let Some(column) = self.secondary_keys.iter().position(|k| k == secondary_key) else {
            return Money::zero();
        };
        self.account_rows()
            .filter(|r| r.account == account)
            .map(|r| r.cells[column])
            .sum()
    }

    /// Σ row totals == Σ column totals == grand total
    pub fn is_consistent(&self) -> bool {
        let by_rows: Money = self.row_totals().iter().sum();
        let by_columns: Money = self.column_totals.iter().sum();
        by_rows == by_columns && by_columns == self.grand_total
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Builds cross tabs for a single measure
#[derive(Debug, Clone)]
pub struct CrossTabBuilder {
    classifier: Classifier,
    measure: Measure,
    group_by_category: bool,
}

impl CrossTabBuilder {
    pub fn new(classifier: Classifier, measure: Measure) -> Self {
        Self {
            classifier,
            measure,
            group_by_category: false,
        }
    }

    /// Group accounts under category sub-headers
    pub fn grouped_by_category(mut self, grouped: bool) -> Self {
        self.group_by_category = grouped;
        self
    }

    /// Build using each row's own secondary key
    pub fn build(&self, rows: &[TransactionRow]) -> CrossTab {
        self.build_with(rows, |row| row.secondary_key().map(str::to_string))
    }

    /// Build with a caller-supplied secondary key extractor
    ///
    /// Rows without a secondary key land in the `DEFAULT` column rather than
    /// being dropped.
    pub fn build_with<F>(&self, rows: &[TransactionRow], secondary_key_of: F) -> CrossTab
    where
        F: Fn(&TransactionRow) -> Option<String>,
    {
        let keyed: Vec<(&TransactionRow, String)> = rows
            .iter()
            .map(|row| {
                let key = secondary_key_of(row)
                    .filter(|k| !k.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_SECONDARY_KEY.to_string());
                (row, key)
            })
            .collect();

        let secondary_keys: Vec<String> = keyed
            .iter()
            .map(|(_, k)| k.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let column_of: BTreeMap<&str, usize> = secondary_keys
            .iter()
            .enumerate()
            .map(|(idx, k)| (k.as_str(), idx))
            .collect();
        let width = secondary_keys.len();

        // (category, account) -> (name, cells)
        let mut accounts: BTreeMap<(Option<Category>, String), (String, Vec<Money>)> =
            BTreeMap::new();
        for (row, key) in &keyed {
            let category = self
                .group_by_category
                .then(|| self.classifier.classify_row(row));
            let entry = accounts
                .entry((category, row.key.clone()))
                .or_insert_with(|| (row.name.clone(), vec![Money::zero(); width]));
            if entry.0.is_empty() {
                entry.0 = row.name.clone();
            }
            entry.1[column_of[key.as_str()]] += row.measure(self.measure);
        }

        let mut groups: Vec<CrossTabGroup> = Vec::new();
        for ((category, account), (name, cells)) in accounts {
            if groups.last().map(|g| g.category) != Some(category) {
                groups.push(CrossTabGroup {
                    category,
                    rows: Vec::new(),
                    subtotals: vec![Money::zero(); width],
                    total: Money::zero(),
                });
            }
            let total: Money = cells.iter().sum();
            if let Some(group) = groups.last_mut() {
                for (subtotal, cell) in group.subtotals.iter_mut().zip(&cells) {
                    *subtotal += *cell;
                }
                group.total += total;
                group.rows.push(CrossTabRow {
                    account,
                    name,
                    cells,
                    total,
                });
            }
        }

        let mut column_totals = vec![Money::zero(); width];
        for group in &groups {
            for (column_total, subtotal) in column_totals.iter_mut().zip(&group.subtotals) {
                *column_total += *subtotal;
            }
        }
        let grand_total: Money = column_totals.iter().sum();

        debug!(
            rows = rows.len(),
            columns = width,
            groups = groups.len(),
            "built cross tab"
        );

        CrossTab {
            measure: self.measure,
            secondary_keys,
            groups,
            column_totals,
            grand_total,
        }
    }
}
