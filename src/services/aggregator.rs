//! Category roll-ups
//!
//! Groups rows by category, keeps one full-precision accumulator per measure
//! and category, and derives the grand total from the category totals.
//! Also detects the section boundaries used when rendering grouped tables.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::models::{Category, Measure, Money, TransactionRow};

use super::classifier::Classifier;

/// One accumulator per measure
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MeasureTotals(BTreeMap<Measure, Money>);

impl MeasureTotals {
    /// Accumulators for the given measures, all starting at zero
    pub fn zeroed(measures: &[Measure]) -> Self {
        Self(measures.iter().map(|m| (*m, Money::zero())).collect())
    }

    /// Add the row's value for every tracked measure (missing counts as zero)
    pub fn add_row(&mut self, row: &TransactionRow) {
        for (measure, total) in self.0.iter_mut() {
            accumulate(*measure, total, row.measure(*measure));
        }
    }

    /// Field-wise add another set of totals
    pub fn merge(&mut self, other: &MeasureTotals) {
        for (measure, value) in &other.0 {
            accumulate(*measure, self.0.entry(*measure).or_default(), *value);
        }
    }

    /// Total for a measure; untracked measures read as zero
    pub fn get(&self, measure: Measure) -> Money {
        self.0.get(&measure).copied().unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Measure, Money)> + '_ {
        self.0.iter().map(|(m, v)| (*m, *v))
    }
}

/// Out-of-range totals clamp to the decimal bounds
fn accumulate(measure: Measure, total: &mut Money, value: Money) {
    match total.checked_add(value) {
        Some(sum) => *total = sum,
        None => {
            warn!(measure = %measure, "total exceeds the decimal range; clamped");
            *total += value;
        }
    }
}

/// Aggregate for one category within one report invocation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category: Category,
    pub totals: MeasureTotals,
    pub row_count: usize,
}

impl CategoryTotal {
    fn new(category: Category, measures: &[Measure]) -> Self {
        Self {
            category,
            totals: MeasureTotals::zeroed(measures),
            row_count: 0,
        }
    }
}

/// Aggregate across every category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GrandTotal {
    pub totals: MeasureTotals,
    pub row_count: usize,
}

/// Result of one aggregation pass
#[derive(Debug, Clone, Serialize)]
pub struct Aggregation {
    /// Totals keyed by category; every declared category is present
    pub category_totals: BTreeMap<Category, CategoryTotal>,
    pub grand_total: GrandTotal,
}

impl Aggregation {
    /// Totals for one category
    pub fn get(&self, category: Category) -> Option<&CategoryTotal> {
        self.category_totals.get(&category)
    }

    /// Number of rows that fell through to the catch-all bucket
    pub fn unmapped_count(&self) -> usize {
        self.get(Category::Other).map(|t| t.row_count).unwrap_or(0)
    }
}

/// Rolls rows up into category and grand totals
#[derive(Debug, Clone)]
pub struct Aggregator {
    classifier: Classifier,
    measures: Vec<Measure>,
}

impl Aggregator {
    /// Create an aggregator tracking the given measures
    pub fn new(classifier: Classifier, measures: &[Measure]) -> Self {
        Self {
            classifier,
            measures: measures.to_vec(),
        }
    }

    pub fn classifier(&self) -> Classifier {
        self.classifier
    }

    pub fn measures(&self) -> &[Measure] {
        &self.measures
    }

    /// Aggregate rows in a single pass
    pub fn aggregate(&self, rows: &[TransactionRow]) -> Aggregation {
        let mut category_totals: BTreeMap<Category, CategoryTotal> = self
            .classifier
            .categories()
            .iter()
            .map(|c| (*c, CategoryTotal::new(*c, &self.measures)))
            .collect();

        for row in rows {
            let category = self.classifier.classify_row(row);
            let entry = category_totals
                .entry(category)
                .or_insert_with(|| CategoryTotal::new(category, &self.measures));
            entry.totals.add_row(row);
            entry.row_count += 1;
        }

        // Derived from the category totals, never from a second pass over rows
        let mut grand = GrandTotal {
            totals: MeasureTotals::zeroed(&self.measures),
            row_count: 0,
        };
        for total in category_totals.values() {
            grand.totals.merge(&total.totals);
            grand.row_count += total.row_count;
        }

        let aggregation = Aggregation {
            category_totals,
            grand_total: grand,
        };

        debug!(
            rows = rows.len(),
            categories = aggregation.category_totals.len(),
            "aggregated report rows"
        );
        let unmapped = aggregation.unmapped_count();
        if unmapped > 0 {
            warn!(
                rows = unmapped,
                "rows did not match any category and were bucketed as Other"
            );
        }

        aggregation
    }
}

/// How rows are ordered before sections are detected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowOrdering {
    /// Trust the order the rows were fetched in
    #[default]
    AsFetched,
    /// Stable-sort by category display order first
    ByCategory,
}

/// Apply a row ordering, preserving input order within a category
pub fn order_rows<'r>(
    rows: &'r [TransactionRow],
    classifier: Classifier,
    ordering: RowOrdering,
) -> Vec<&'r TransactionRow> {
    let mut ordered: Vec<&TransactionRow> = rows.iter().collect();
    if ordering == RowOrdering::ByCategory {
        ordered.sort_by_key(|row| classifier.classify_row(row));
    }
    ordered
}

/// Where a row sits relative to its category run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowBoundary {
    pub category: Category,
    /// Category differs from the previous row's: emit a header before it
    pub opens_section: bool,
    /// Category differs from the next row's (or last row): emit a subtotal after it
    pub closes_section: bool,
}

/// Detect category boundaries in an already ordered row sequence
pub fn boundaries(rows: &[&TransactionRow], classifier: Classifier) -> Vec<RowBoundary> {
    let categories: Vec<Category> = rows.iter().map(|r| classifier.classify_row(r)).collect();

    categories
        .iter()
        .enumerate()
        .map(|(idx, category)| RowBoundary {
            category: *category,
            opens_section: idx == 0 || categories[idx - 1] != *category,
            closes_section: categories.get(idx + 1) != Some(category),
        })
        .collect()
}

/// A contiguous run of rows sharing a category
#[derive(Debug, Clone)]
pub struct Section<'r> {
    pub category: Category,
    pub rows: Vec<&'r TransactionRow>,
}

/// Split an ordered row sequence into category runs
///
/// The same category may appear in more than one run when the input is not
/// sorted by category.
pub fn sections<'r>(rows: &[&'r TransactionRow], classifier: Classifier) -> Vec<Section<'r>> {
    let mut out: Vec<Section<'r>> = Vec::new();
    for (row, boundary) in rows.iter().copied().zip(boundaries(rows, classifier)) {
        if boundary.opens_section {
            out.push(Section {
                category: boundary.category,
                rows: Vec::new(),
            });
        }
        if let Some(section) = out.last_mut() {
            section.rows.push(row);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tb_row(code: &str, closing: i64) -> TransactionRow {
        TransactionRow::new(code, code).with(Measure::ClosingBalance, closing)
    }

    fn closing_aggregator() -> Aggregator {
        Aggregator::new(Classifier::AccountPrefix, &[Measure::ClosingBalance])
    }

    #[test]
    fn test_scenario_subtotals_and_grand_total() {
        let rows = vec![tb_row("A100", 100), tb_row("A200", -50), tb_row("L100", 30)];
        let agg = closing_aggregator().aggregate(&rows);

        let assets = agg.get(Category::Assets).unwrap();
        assert_eq!(assets.totals.get(Measure::ClosingBalance), Money::from_units(50));
        assert_eq!(assets.row_count, 2);
        assert_eq!(
            agg.get(Category::Liabilities)
                .unwrap()
                .totals
                .get(Measure::ClosingBalance),
            Money::from_units(30)
        );
        assert_eq!(
            agg.grand_total.totals.get(Measure::ClosingBalance),
            Money::from_units(80)
        );
        assert_eq!(agg.grand_total.row_count, 3);
    }

    #[test]
    fn test_declared_categories_present_with_zero_totals() {
        let agg = closing_aggregator().aggregate(&[tb_row("A100", 10)]);
        let revenue = agg.get(Category::Revenue).unwrap();
        assert_eq!(revenue.row_count, 0);
        assert_eq!(revenue.totals.get(Measure::ClosingBalance), Money::zero());
        assert_eq!(agg.category_totals.len(), 5);
    }

    #[test]
    fn test_flag_rules_add_other_only_when_used() {
        let agg = Aggregator::new(Classifier::CategoryFlag, &[Measure::Actual])
            .aggregate(&[TransactionRow::new("4100", "Sales")
                .with_flag("I")
                .with(Measure::Actual, 5)]);
        assert!(agg.get(Category::Other).is_none());
        assert!(agg.get(Category::Expenditure).is_some());

        let agg = Aggregator::new(Classifier::CategoryFlag, &[Measure::Actual])
            .aggregate(&[TransactionRow::new("4100", "Sales").with_flag("Z")]);
        assert_eq!(agg.unmapped_count(), 1);
    }

    #[test]
    fn test_missing_measure_counts_row_but_adds_zero() {
        let rows = vec![TransactionRow::new("A100", "Cash"), tb_row("A200", 7)];
        let agg = closing_aggregator().aggregate(&rows);
        let assets = agg.get(Category::Assets).unwrap();
        assert_eq!(assets.row_count, 2);
        assert_eq!(assets.totals.get(Measure::ClosingBalance), Money::from_units(7));
    }

    #[test]
    fn test_grand_total_matches_category_sum_exactly() {
        let rows: Vec<TransactionRow> = (0..200)
            .map(|i| {
                let prefix = ["A", "E", "L", "R", "Z"][i % 5];
                TransactionRow::new(format!("{}{}", prefix, i), "x")
                    .with(Measure::Debit, Money::parse(&format!("{}.{:02}", i, i % 100)).unwrap())
                    .with(Measure::Credit, Money::parse(&format!("-0.{:03}", i)).unwrap())
            })
            .collect();
        let agg = Aggregator::new(Classifier::AccountPrefix, &[Measure::Debit, Measure::Credit])
            .aggregate(&rows);

        for measure in [Measure::Debit, Measure::Credit] {
            let sum: Money = agg
                .category_totals
                .values()
                .map(|t| t.totals.get(measure))
                .sum();
            assert_eq!(agg.grand_total.totals.get(measure), sum);
        }
    }

    #[test]
    fn test_overflowing_rows_do_not_abort() {
        let huge = Money::parse("50000000000000000000000000000").unwrap();
        let rows = vec![
            TransactionRow::new("A100", "Cash").with(Measure::ClosingBalance, huge),
            TransactionRow::new("A200", "Bank").with(Measure::ClosingBalance, huge),
            tb_row("L100", 30),
        ];
        let agg = closing_aggregator().aggregate(&rows);

        let assets = agg.get(Category::Assets).unwrap();
        assert_eq!(assets.row_count, 2);
        assert_eq!(
            assets.totals.get(Measure::ClosingBalance),
            Money::new(rust_decimal::Decimal::MAX)
        );
        assert_eq!(agg.grand_total.row_count, 3);
        assert_eq!(
            agg.grand_total.totals.get(Measure::ClosingBalance),
            Money::new(rust_decimal::Decimal::MAX)
        );
    }

    #[test]
    fn test_empty_input() {
        let agg = closing_aggregator().aggregate(&[]);
        assert_eq!(agg.grand_total.row_count, 0);
        assert_eq!(
            agg.grand_total.totals.get(Measure::ClosingBalance),
            Money::zero()
        );
    }

    #[test]
    fn test_boundaries() {
        let rows = vec![tb_row("A1", 1), tb_row("A2", 1), tb_row("L1", 1), tb_row("A3", 1)];
        let refs: Vec<&TransactionRow> = rows.iter().collect();
        let b = boundaries(&refs, Classifier::AccountPrefix);

        assert!(b[0].opens_section && !b[0].closes_section);
        assert!(!b[1].opens_section && b[1].closes_section);
        assert!(b[2].opens_section && b[2].closes_section);
        assert!(b[3].opens_section && b[3].closes_section);
    }

    #[test]
    fn test_sections_as_fetched_keep_disjoint_runs() {
        let rows = vec![tb_row("A1", 1), tb_row("L1", 1), tb_row("A2", 1)];
        let ordered = order_rows(&rows, Classifier::AccountPrefix, RowOrdering::AsFetched);
        let s = sections(&ordered, Classifier::AccountPrefix);
        let cats: Vec<Category> = s.iter().map(|s| s.category).collect();
        assert_eq!(
            cats,
            vec![Category::Assets, Category::Liabilities, Category::Assets]
        );
    }

    #[test]
    fn test_sections_by_category_are_stable() {
        let rows = vec![tb_row("L1", 1), tb_row("A2", 1), tb_row("L0", 1), tb_row("A1", 1)];
        let ordered = order_rows(&rows, Classifier::AccountPrefix, RowOrdering::ByCategory);
        let s = sections(&ordered, Classifier::AccountPrefix);

        assert_eq!(s.len(), 2);
        assert_eq!(s[0].category, Category::Assets);
        let keys: Vec<&str> = s[0].rows.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, vec!["A2", "A1"]);
        let keys: Vec<&str> = s[1].rows.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, vec!["L1", "L0"]);
    }

    #[test]
    fn test_sections_empty() {
        assert!(sections(&[], Classifier::AccountPrefix).is_empty());
    }
}
