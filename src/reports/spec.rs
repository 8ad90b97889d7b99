//! Per-report configuration
//!
//! Every concrete report is a `ReportSpec`: which classifier buckets its rows,
//! which columns it shows, how rows are ordered, and how zero and missing
//! values print. `build_table` runs the aggregation core and produces the
//! exportable `ReportTable`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::display::number::ZeroPolicy;
use crate::error::ReportError;
use crate::models::{Measure, TransactionRow};
use crate::services::{order_rows, sections, Aggregator, Classifier, CrossTabBuilder, FieldMap, RowOrdering};

use super::table::{Column, ColumnKind, ReportTable, RowKind, TableRow, TableSection, GRAND_TOTAL_LABEL};

const ACCOUNT_KEYS: &[&str] = &["AccountCode", "AccCode", "GlCode", "Code"];
const ACCOUNT_NAMES: &[&str] = &["AccountName", "AccName", "Description", "Name"];
const JOB_KEYS: &[&str] = &["ProjectNo", "JobNo", "JobNumber", "Job", "Code"];
const JOB_NAMES: &[&str] = &["Description", "ProjectName", "JobDescription", "Name"];
const CATEGORY_FLAGS: &[&str] = &["CatFlag", "CategoryFlag", "Flag"];

/// Every report the engine knows how to build
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReportKind {
    TrialBalance,
    IncomeExpenditure,
    IeCostCenter,
    IeArea,
    IeProvince,
    WorkInProgress,
    JobCard,
    InventoryConsumption,
}

impl ReportKind {
    /// All kinds, in listing order
    pub fn all() -> &'static [ReportKind] {
        &[
            ReportKind::TrialBalance,
            ReportKind::IncomeExpenditure,
            ReportKind::IeCostCenter,
            ReportKind::IeArea,
            ReportKind::IeProvince,
            ReportKind::WorkInProgress,
            ReportKind::JobCard,
            ReportKind::InventoryConsumption,
        ]
    }

    /// Command-line / config name
    pub fn name(&self) -> &'static str {
        match self {
            ReportKind::TrialBalance => "trial-balance",
            ReportKind::IncomeExpenditure => "income-expenditure",
            ReportKind::IeCostCenter => "ie-cost-center",
            ReportKind::IeArea => "ie-area",
            ReportKind::IeProvince => "ie-province",
            ReportKind::WorkInProgress => "work-in-progress",
            ReportKind::JobCard => "job-card",
            ReportKind::InventoryConsumption => "inventory-consumption",
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for ReportKind {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().replace('_', "-");
        ReportKind::all()
            .iter()
            .copied()
            .find(|k| k.name().eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| ReportError::UnknownReport(s.to_string()))
    }
}

/// Second dimension of a cross-tab report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SecondaryDimension {
    CostCenter,
    Area,
    Province,
}

impl SecondaryDimension {
    /// Payload fields that may carry this dimension's key
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            SecondaryDimension::CostCenter => &["DeptId", "CostCenter", "CostCentre", "CcCode"],
            SecondaryDimension::Area => &["AreaNo", "AreaCode", "Area"],
            SecondaryDimension::Province => &["ProvinceId", "ProvinceCode", "Province"],
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SecondaryDimension::CostCenter => "Cost Center",
            SecondaryDimension::Area => "Area",
            SecondaryDimension::Province => "Province",
        }
    }
}

/// Column layout of a report
#[derive(Debug, Clone, PartialEq)]
pub enum Layout {
    /// One row per fetched row, fixed columns
    Flat { columns: Vec<Column> },
    /// One row per account, one column per observed secondary key
    CrossTab {
        measure: Measure,
        dimension: SecondaryDimension,
        key_header: &'static str,
        name_header: &'static str,
    },
}

/// Configuration for one report
#[derive(Debug, Clone)]
pub struct ReportSpec {
    pub kind: ReportKind,
    /// Human-readable title printed in export headers
    pub title: &'static str,
    /// File-name stem, e.g. `TrialBalance`
    pub report_name: &'static str,
    pub classifier: Classifier,
    pub layout: Layout,
    pub ordering: RowOrdering,
    /// Render declared categories that received no rows (flat layouts only;
    /// a cross tab never shows a category without accounts)
    pub show_empty_sections: bool,
    pub zero_policy: ZeroPolicy,
    /// Ingestion aliases for this report's payload
    pub fields: FieldMap,
}

impl ReportSpec {
    /// The preset for a report kind
    pub fn for_kind(kind: ReportKind) -> Self {
        match kind {
            ReportKind::TrialBalance => Self {
                kind,
                title: "Trial Balance",
                report_name: "TrialBalance",
                classifier: Classifier::AccountPrefix,
                layout: Layout::Flat {
                    columns: vec![
                        Column::new("Code", ColumnKind::Key),
                        Column::new("Name", ColumnKind::Name),
                        Column::measure(Measure::OpeningBalance),
                        Column::measure(Measure::Debit),
                        Column::measure(Measure::Credit),
                        Column::measure(Measure::ClosingBalance),
                    ],
                },
                ordering: RowOrdering::AsFetched,
                show_empty_sections: true,
                zero_policy: ZeroPolicy::zero_decimal(),
                fields: FieldMap::new(ACCOUNT_KEYS, ACCOUNT_NAMES)
                    .measure(Measure::OpeningBalance, &["OpeningBalance", "OpBal", "Opening"])
                    .measure(Measure::Debit, &["Debit", "DrAmt", "DebitAmount"])
                    .measure(Measure::Credit, &["Credit", "CrAmt", "CreditAmount"])
                    .measure(Measure::ClosingBalance, &["ClosingBalance", "ClBal", "Closing"]),
            },
            ReportKind::IncomeExpenditure => Self {
                kind,
                title: "Income & Expenditure",
                report_name: "IncomeExpenditure",
                classifier: Classifier::CategoryFlag,
                layout: Layout::Flat {
                    columns: vec![
                        Column::new("Code", ColumnKind::Key),
                        Column::new("Name", ColumnKind::Name),
                        Column::measure(Measure::Budget),
                        Column::measure(Measure::Actual),
                        Column::measure(Measure::Variance),
                    ],
                },
                ordering: RowOrdering::ByCategory,
                show_empty_sections: true,
                zero_policy: ZeroPolicy::dash(),
                fields: FieldMap::new(ACCOUNT_KEYS, ACCOUNT_NAMES)
                    .with_flag(CATEGORY_FLAGS)
                    .measure(Measure::Budget, &["Budget", "BudgetAmount", "BudAmt"])
                    .measure(Measure::Actual, &["Actual", "ActualAmount", "Amount"])
                    .measure(Measure::Variance, &["Variance", "VarAmt"]),
            },
            ReportKind::IeCostCenter => Self::income_cross_tab(
                kind,
                "Income & Expenditure by Cost Center",
                "IncomeExpenditureCostCenter",
                SecondaryDimension::CostCenter,
            ),
            ReportKind::IeArea => Self::income_cross_tab(
                kind,
                "Income & Expenditure by Area",
                "IncomeExpenditureArea",
                SecondaryDimension::Area,
            ),
            ReportKind::IeProvince => Self::income_cross_tab(
                kind,
                "Income & Expenditure by Province",
                "IncomeExpenditureProvince",
                SecondaryDimension::Province,
            ),
            ReportKind::WorkInProgress => Self {
                kind,
                title: "Work in Progress",
                report_name: "WorkInProgress",
                classifier: Classifier::AccountPrefix,
                layout: Layout::Flat {
                    columns: vec![
                        Column::new("Job", ColumnKind::Key),
                        Column::new("Description", ColumnKind::Name),
                        Column::measure(Measure::Estimated),
                        Column::measure(Measure::Labour),
                        Column::measure(Measure::Material),
                        Column::measure(Measure::OtherCost),
                        Column::measure(Measure::Committed),
                    ],
                },
                ordering: RowOrdering::ByCategory,
                show_empty_sections: true,
                zero_policy: ZeroPolicy::not_available(),
                fields: FieldMap::new(JOB_KEYS, JOB_NAMES)
                    .measure(Measure::Estimated, &["EstimatedCost", "Estimated", "EstCost"])
                    .measure(Measure::Labour, &["LabourCost", "LaborCost", "Labour"])
                    .measure(Measure::Material, &["MaterialCost", "Material"])
                    .measure(Measure::OtherCost, &["OtherCost", "Other"])
                    .measure(Measure::Committed, &["CommittedCost", "Committed"]),
            },
            ReportKind::JobCard => Self {
                kind,
                title: "Job Card",
                report_name: "JobCard",
                classifier: Classifier::AccountPrefix,
                layout: Layout::Flat {
                    columns: vec![
                        Column::new("Job", ColumnKind::Key),
                        Column::new("Description", ColumnKind::Name),
                        Column::measure(Measure::Estimated),
                        Column::measure(Measure::Actual),
                        Column::measure(Measure::Variance),
                        Column::new(
                            "Variance %",
                            ColumnKind::Ratio {
                                numerator: Measure::Variance,
                                denominator: Measure::Estimated,
                            },
                        ),
                    ],
                },
                ordering: RowOrdering::AsFetched,
                show_empty_sections: true,
                zero_policy: ZeroPolicy::not_available(),
                fields: FieldMap::new(JOB_KEYS, JOB_NAMES)
                    .measure(Measure::Estimated, &["EstimatedCost", "Estimated", "EstCost"])
                    .measure(Measure::Actual, &["ActualCost", "Actual"])
                    .measure(Measure::Variance, &["Variance", "VarianceAmount"]),
            },
            ReportKind::InventoryConsumption => Self {
                kind,
                title: "Inventory Consumption",
                report_name: "InventoryConsumption",
                classifier: Classifier::AccountPrefix,
                layout: Layout::Flat {
                    columns: vec![
                        Column::new("Item", ColumnKind::Key),
                        Column::new("Description", ColumnKind::Name),
                        Column::measure(Measure::Quantity),
                        Column::measure(Measure::Cost),
                    ],
                },
                ordering: RowOrdering::ByCategory,
                show_empty_sections: true,
                zero_policy: ZeroPolicy::blank(),
                fields: FieldMap::new(&["ItemCode", "ItemNo", "Code"], &["Description", "ItemName", "Name"])
                    .measure(Measure::Quantity, &["Quantity", "Qty", "IssuedQty"])
                    .measure(Measure::Cost, &["Cost", "TotalCost", "Amount"]),
            },
        }
    }

    fn income_cross_tab(
        kind: ReportKind,
        title: &'static str,
        report_name: &'static str,
        dimension: SecondaryDimension,
    ) -> Self {
        Self {
            kind,
            title,
            report_name,
            classifier: Classifier::CategoryFlag,
            layout: Layout::CrossTab {
                measure: Measure::Actual,
                dimension,
                key_header: "Code",
                name_header: "Name",
            },
            ordering: RowOrdering::ByCategory,
            show_empty_sections: false,
            zero_policy: ZeroPolicy::zero_decimal(),
            fields: FieldMap::new(ACCOUNT_KEYS, ACCOUNT_NAMES)
                .with_flag(CATEGORY_FLAGS)
                .with_secondary(dimension.aliases())
                .measure(Measure::Actual, &["Actual", "ActualAmount", "Amount"]),
        }
    }

    /// Builder-style: override the zero policy
    pub fn with_zero_policy(mut self, policy: ZeroPolicy) -> Self {
        self.zero_policy = policy;
        self
    }

    /// Measures the report aggregates, in column order without duplicates
    pub fn measures(&self) -> Vec<Measure> {
        let mut measures = Vec::new();
        let mut push = |m: Measure| {
            if !measures.contains(&m) {
                measures.push(m);
            }
        };
        match &self.layout {
            Layout::Flat { columns } => {
                for column in columns {
                    match column.kind {
                        ColumnKind::Measure(m) => push(m),
                        ColumnKind::Ratio {
                            numerator,
                            denominator,
                        } => {
                            push(numerator);
                            push(denominator);
                        }
                        _ => {}
                    }
                }
            }
            Layout::CrossTab { measure, .. } => push(*measure),
        }
        measures
    }

    /// Run the core over fetched rows and lay out the result
    pub fn build_table(&self, rows: &[TransactionRow]) -> ReportTable {
        let table = match &self.layout {
            Layout::Flat { columns } => self.build_flat(columns, rows),
            Layout::CrossTab {
                measure,
                key_header,
                name_header,
                ..
            } => {
                let tab = CrossTabBuilder::new(self.classifier, *measure)
                    .grouped_by_category(self.ordering == RowOrdering::ByCategory)
                    .build(rows);
                ReportTable::from_cross_tab(
                    self.title,
                    key_header,
                    name_header,
                    &tab,
                    self.zero_policy.clone(),
                )
            }
        };
        debug!(
            report = %self.kind,
            rows = table.row_count(),
            sections = table.sections.len(),
            "built report table"
        );
        table
    }

    fn build_flat(&self, columns: &[Column], rows: &[TransactionRow]) -> ReportTable {
        let mut table = ReportTable::for_columns(self.title, columns, self.zero_policy.clone());
        if rows.is_empty() {
            return table;
        }

        let aggregation = Aggregator::new(self.classifier, &self.measures()).aggregate(rows);
        let ordered = order_rows(rows, self.classifier, self.ordering);

        for section in sections(&ordered, self.classifier) {
            let totals = aggregation
                .get(section.category)
                .map(|t| t.totals.clone())
                .unwrap_or_default();
            table.sections.push(TableSection {
                label: section.category.label().to_string(),
                rows: section.rows.iter().map(|r| TableRow::data(columns, r)).collect(),
                subtotal: TableRow::total(
                    RowKind::Subtotal,
                    columns,
                    &section.category.total_label(),
                    &totals,
                ),
            });
        }

        if self.show_empty_sections {
            for total in aggregation.category_totals.values().filter(|t| t.row_count == 0) {
                table.sections.push(TableSection {
                    label: total.category.label().to_string(),
                    rows: Vec::new(),
                    subtotal: TableRow::total(
                        RowKind::Subtotal,
                        columns,
                        &total.category.total_label(),
                        &total.totals,
                    ),
                });
            }
        }

        table.grand_total = TableRow::total(
            RowKind::GrandTotal,
            columns,
            GRAND_TOTAL_LABEL,
            &aggregation.grand_total.totals,
        );
        table
    }
}
