//! The exportable report table
//!
//! A `ReportTable` is an ordered list of category sections (header, data
//! rows, subtotal) followed by one grand-total row. Cells keep raw values;
//! formatting happens when the table is rendered or exported.

use serde::{Deserialize, Serialize};

use crate::display::number::{format_amount, format_ratio, ratio_percent, ZeroPolicy};
use crate::models::{Measure, Money, TransactionRow};
use crate::services::{CrossTab, MeasureTotals};

/// What a column shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ColumnKind {
    Key,
    Name,
    Measure(Measure),
    /// `numerator / denominator × 100`
    Ratio {
        numerator: Measure,
        denominator: Measure,
    },
}

impl ColumnKind {
    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnKind::Measure(_) | ColumnKind::Ratio { .. })
    }
}

/// A column of a flat report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Column {
    pub header: String,
    pub kind: ColumnKind,
}

impl Column {
    pub fn new(header: impl Into<String>, kind: ColumnKind) -> Self {
        Self {
            header: header.into(),
            kind,
        }
    }

    /// A measure column headed with the measure's default header
    pub fn measure(measure: Measure) -> Self {
        Self::new(measure.header(), ColumnKind::Measure(measure))
    }
}

/// A single table cell
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Cell {
    Text(String),
    /// `None` when the value was missing upstream
    Amount(Option<Money>),
    /// Percentage; zero doubles as the division-by-zero sentinel
    Ratio(Money),
}

impl Cell {
    pub fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }

    /// Render under a zero policy
    pub fn render(&self, policy: &ZeroPolicy) -> String {
        match self {
            Cell::Text(s) => s.clone(),
            Cell::Amount(v) => format_amount(*v, policy),
            Cell::Ratio(v) => format_ratio(*v),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowKind {
    Data,
    Subtotal,
    GrandTotal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRow {
    pub kind: RowKind,
    pub cells: Vec<Cell>,
}

impl TableRow {
    /// Data row for one fetched row
    pub fn data(columns: &[Column], row: &TransactionRow) -> Self {
        let cells = columns
            .iter()
            .map(|column| match column.kind {
                ColumnKind::Key => Cell::text(row.key.as_str()),
                ColumnKind::Name => Cell::text(row.name.as_str()),
                ColumnKind::Measure(m) => Cell::Amount(row.raw(m)),
                ColumnKind::Ratio {
                    numerator,
                    denominator,
                } => Cell::Ratio(ratio_percent(
                    row.measure(numerator),
                    row.measure(denominator),
                )),
            })
            .collect();
        Self {
            kind: RowKind::Data,
            cells,
        }
    }

    /// Total row; the label goes in the first column
    ///
    /// Ratios are recomputed from the summed numerator and denominator.
    pub fn total(kind: RowKind, columns: &[Column], label: &str, totals: &MeasureTotals) -> Self {
        let mut cells: Vec<Cell> = columns
            .iter()
            .map(|column| match column.kind {
                ColumnKind::Measure(m) => Cell::Amount(Some(totals.get(m))),
                ColumnKind::Ratio {
                    numerator,
                    denominator,
                } => Cell::Ratio(ratio_percent(
                    totals.get(numerator),
                    totals.get(denominator),
                )),
                _ => Cell::text(""),
            })
            .collect();
        if let Some(first) = cells.first_mut() {
            *first = Cell::text(label);
        }
        Self { kind, cells }
    }

    /// Render every cell under a zero policy
    pub fn render(&self, policy: &ZeroPolicy) -> Vec<String> {
        self.cells.iter().map(|c| c.render(policy)).collect()
    }
}

/// One category's header, rows and subtotal
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableSection {
    pub label: String,
    pub rows: Vec<TableRow>,
    pub subtotal: TableRow,
}

/// The exportable unit
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportTable {
    pub title: String,
    pub headers: Vec<String>,
    /// Which columns hold numbers (right-aligned when rendered)
    pub numeric_columns: Vec<bool>,
    pub sections: Vec<TableSection>,
    pub grand_total: TableRow,
    pub zero_policy: ZeroPolicy,
}

impl ReportTable {
    /// Table for a flat column layout; starts with no sections and a zero grand total
    pub fn for_columns(title: impl Into<String>, columns: &[Column], policy: ZeroPolicy) -> Self {
        let zero = MeasureTotals::default();
        Self {
            title: title.into(),
            headers: columns.iter().map(|c| c.header.clone()).collect(),
            numeric_columns: columns.iter().map(|c| c.kind.is_numeric()).collect(),
            sections: Vec::new(),
            grand_total: TableRow::total(RowKind::GrandTotal, columns, GRAND_TOTAL_LABEL, &zero),
            zero_policy: policy,
        }
    }

    /// Table for a cross tab: key, name, one column per secondary key, total
    pub fn from_cross_tab(
        title: impl Into<String>,
        key_header: &str,
        name_header: &str,
        tab: &CrossTab,
        policy: ZeroPolicy,
    ) -> Self {
        let mut headers = vec![key_header.to_string(), name_header.to_string()];
        headers.extend(tab.secondary_keys.iter().cloned());
        headers.push("Total".to_string());

        let mut numeric_columns = vec![false, false];
        numeric_columns.extend(std::iter::repeat(true).take(tab.secondary_keys.len() + 1));

        let amount_cells = |values: &[Money], total: Money| -> Vec<Cell> {
            values
                .iter()
                .chain(std::iter::once(&total))
                .map(|v| Cell::Amount(Some(*v)))
                .collect()
        };

        let sections = tab
            .groups
            .iter()
            .map(|group| {
                let label = group
                    .category
                    .map(|c| c.label().to_string())
                    .unwrap_or_else(|| "Accounts".to_string());
                let rows = group
                    .rows
                    .iter()
                    .map(|r| {
                        let mut cells = vec![Cell::text(r.account.as_str()), Cell::text(r.name.as_str())];
                        cells.extend(amount_cells(&r.cells, r.total));
                        TableRow {
                            kind: RowKind::Data,
                            cells,
                        }
                    })
                    .collect();
                let mut subtotal_cells = vec![Cell::text(format!("Total {}", label)), Cell::text("")];
                subtotal_cells.extend(amount_cells(&group.subtotals, group.total));
                TableSection {
                    label,
                    rows,
                    subtotal: TableRow {
                        kind: RowKind::Subtotal,
                        cells: subtotal_cells,
                    },
                }
            })
            .collect();

        let mut grand_cells = vec![Cell::text(GRAND_TOTAL_LABEL), Cell::text("")];
        grand_cells.extend(amount_cells(&tab.column_totals, tab.grand_total));

        Self {
            title: title.into(),
            headers,
            numeric_columns,
            sections,
            grand_total: TableRow {
                kind: RowKind::GrandTotal,
                cells: grand_cells,
            },
            zero_policy: policy,
        }
    }

    /// Number of columns
    pub fn width(&self) -> usize {
        self.headers.len()
    }

    /// Number of data rows across all sections
    pub fn row_count(&self) -> usize {
        self.sections.iter().map(|s| s.rows.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }

    /// Whether a column holds numbers
    pub fn is_numeric_column(&self, idx: usize) -> bool {
        self.numeric_columns.get(idx).copied().unwrap_or(false)
    }
}

pub const GRAND_TOTAL_LABEL: &str = "Grand Total";
