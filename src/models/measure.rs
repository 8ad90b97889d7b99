//! Numeric measures carried by report rows

use serde::{Deserialize, Serialize};
use std::fmt;

/// A named numeric field of a row
///
/// Every report picks the subset it aggregates and displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Measure {
    OpeningBalance,
    Debit,
    Credit,
    ClosingBalance,
    Budget,
    Actual,
    Variance,
    Estimated,
    /// Committed cost, labour resources
    Labour,
    /// Committed cost, material resources
    Material,
    /// Committed cost, any other resource type
    OtherCost,
    Committed,
    Quantity,
    Cost,
}

impl Measure {
    /// Default column header for this measure
    pub fn header(&self) -> &'static str {
        match self {
            Measure::OpeningBalance => "Opening Balance",
            Measure::Debit => "Debit",
            Measure::Credit => "Credit",
            Measure::ClosingBalance => "Closing Balance",
            Measure::Budget => "Budget",
            Measure::Actual => "Actual",
            Measure::Variance => "Variance",
            Measure::Estimated => "Estimated Cost",
            Measure::Labour => "Labour",
            Measure::Material => "Material",
            Measure::OtherCost => "Other",
            Measure::Committed => "Committed Cost",
            Measure::Quantity => "Quantity",
            Measure::Cost => "Cost",
        }
    }
}

impl fmt::Display for Measure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header())
    }
}
