//! Summary specification models and errors.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::conf::TUP_SUMMARY_FIELDS;

////////////////////////////////////////////////////////////////////////////////
// #region Company

/// Company whose field tables drive the calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum EnumCompany {
    /// Company A (`companyId = 1`).
    Bigc,
    /// Company B (`companyId = 2`).
    Bjc,
}

impl EnumCompany {
    /// Numeric id used by the server API.
    pub fn id(self) -> i64 {
        match self {
            Self::Bigc => 1,
            Self::Bjc => 2,
        }
    }

    /// Short company code.
    pub fn code(self) -> &'static str {
        match self {
            Self::Bigc => "BIGC",
            Self::Bjc => "BJC",
        }
    }
}

impl TryFrom<i64> for EnumCompany {
    type Error = SummaryError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Bigc),
            2 => Ok(Self::Bjc),
            _ => Err(SummaryError::UnknownCompany(value)),
        }
    }
}

impl From<EnumCompany> for i64 {
    fn from(value: EnumCompany) -> Self {
        value.id()
    }
}

impl fmt::Display for EnumCompany {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// The four source field tables of one company.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpecFieldTables {
    pub le_with_sb: &'static [&'static str],
    pub le_without_sb: &'static [&'static str],
    pub budget_with_sb: &'static [&'static str],
    pub budget_without_sb: &'static [&'static str],
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region SummaryResult

/// The 8 derived totals. `Default` is the all-zero result.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SpecSummaryResult {
    #[serde(rename = "monthlyEstimateWithSB")]
    pub monthly_estimate_with_sb: f64,
    #[serde(rename = "monthlyEstimateWithoutSB")]
    pub monthly_estimate_without_sb: f64,
    #[serde(rename = "yearlyEstimateWithSB")]
    pub yearly_estimate_with_sb: f64,
    #[serde(rename = "yearlyEstimateWithoutSB")]
    pub yearly_estimate_without_sb: f64,
    #[serde(rename = "monthlyBudgetWithSB")]
    pub monthly_budget_with_sb: f64,
    #[serde(rename = "monthlyBudgetWithoutSB")]
    pub monthly_budget_without_sb: f64,
    #[serde(rename = "yearlyBudgetWithSB")]
    pub yearly_budget_with_sb: f64,
    #[serde(rename = "yearlyBudgetWithoutSB")]
    pub yearly_budget_without_sb: f64,
}

impl SpecSummaryResult {
    /// `(record key, value)` pairs in canonical order.
    pub fn to_fields(&self) -> [(&'static str, f64); 8] {
        let tup_values = [
            self.monthly_estimate_with_sb,
            self.monthly_estimate_without_sb,
            self.yearly_estimate_with_sb,
            self.yearly_estimate_without_sb,
            self.monthly_budget_with_sb,
            self.monthly_budget_without_sb,
            self.yearly_budget_with_sb,
            self.yearly_budget_without_sb,
        ];
        std::array::from_fn(|n_idx| (TUP_SUMMARY_FIELDS[n_idx], tup_values[n_idx]))
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Validation

/// One summary field whose stored value disagrees with the recomputed one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecSummaryMismatch {
    /// Record key of the summary field.
    pub field: String,
    /// Recomputed value.
    pub expected: f64,
    /// Value found in the record (`0.0` when absent or non-numeric).
    pub actual: f64,
    /// Absolute difference.
    pub difference: f64,
}

/// Outcome of checking an already-populated record.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecSummaryValidation {
    pub is_valid: bool,
    /// Call-level errors (unknown company). Empty when the check ran.
    pub errors: Vec<String>,
    pub mismatches: Vec<SpecSummaryMismatch>,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Errors

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SummaryError {
    #[error("Unknown companyId: {0}")]
    UnknownCompany(i64),
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
