//! Summary calculator: table sums multiplied by month counts.

use tracing::{error, warn};

use crate::conf::{
    C_FIELD_LE_OF_MONTH, C_FIELD_NO_OF_MONTH, N_MONTHS_BUDGET_DEFAULT, N_MONTHS_ESTIMATE_DEFAULT,
    N_TOLERANCE_SUMMARY_DEFAULT,
};
use crate::record::RowRecord;
use crate::spec::{
    EnumCompany, SpecSummaryMismatch, SpecSummaryResult, SpecSummaryValidation, SummaryError,
};
use crate::table::select_field_tables;

/// Relative slack added to the tolerance so that a difference of exactly the
/// tolerance is not rejected by float noise. Scaled by the compared magnitude
/// (at least 1).
const N_TOLERANCE_EPSILON: f64 = 1e-12;

////////////////////////////////////////////////////////////////////////////////
// #region Calculation

/// Sum `fields` of `record`, folding missing/null/non-numeric values to `0.0`.
///
/// A sum that overflows to infinity is folded to `0.0` as well.
pub fn sum_record_fields(record: &RowRecord, fields: &[&str]) -> f64 {
    let n_sum: f64 = fields
        .iter()
        .map(|c_field| record.get_number_or_zero(c_field))
        .sum();
    fold_non_finite("sum", n_sum)
}

/// Months multiplier for yearly estimate totals.
pub fn derive_estimate_months(record: &RowRecord) -> f64 {
    record
        .get_number(C_FIELD_LE_OF_MONTH)
        .unwrap_or(N_MONTHS_ESTIMATE_DEFAULT)
}

/// Months multiplier for yearly budget totals.
pub fn derive_budget_months(record: &RowRecord) -> f64 {
    record
        .get_number(C_FIELD_NO_OF_MONTH)
        .unwrap_or(N_MONTHS_BUDGET_DEFAULT)
}

/// Compute the 8 summary totals for a typed company. Never fails.
pub fn calculate_summary(record: &RowRecord, company: EnumCompany) -> SpecSummaryResult {
    let tables = select_field_tables(company);
    let n_months_estimate = derive_estimate_months(record);
    let n_months_budget = derive_budget_months(record);

    let n_monthly_estimate_with_sb = sum_record_fields(record, tables.le_with_sb);
    let n_monthly_estimate_without_sb = sum_record_fields(record, tables.le_without_sb);
    let n_monthly_budget_with_sb = sum_record_fields(record, tables.budget_with_sb);
    let n_monthly_budget_without_sb = sum_record_fields(record, tables.budget_without_sb);

    SpecSummaryResult {
        monthly_estimate_with_sb: n_monthly_estimate_with_sb,
        monthly_estimate_without_sb: n_monthly_estimate_without_sb,
        yearly_estimate_with_sb: fold_non_finite(
            "yearly_estimate",
            n_monthly_estimate_with_sb * n_months_estimate,
        ),
        yearly_estimate_without_sb: fold_non_finite(
            "yearly_estimate",
            n_monthly_estimate_without_sb * n_months_estimate,
        ),
        monthly_budget_with_sb: n_monthly_budget_with_sb,
        monthly_budget_without_sb: n_monthly_budget_without_sb,
        yearly_budget_with_sb: fold_non_finite(
            "yearly_budget",
            n_monthly_budget_with_sb * n_months_budget,
        ),
        yearly_budget_without_sb: fold_non_finite(
            "yearly_budget",
            n_monthly_budget_without_sb * n_months_budget,
        ),
    }
}

/// Overflowed totals become `0.0` so every summary output stays finite.
fn fold_non_finite(c_total: &str, n_value: f64) -> f64 {
    if n_value.is_finite() {
        return n_value;
    }
    warn!(total = c_total, "summary total overflowed, folded to 0");
    0.0
}

/// Compute the 8 summary totals for a raw company id.
///
/// Unknown ids are logged and returned as [`SummaryError::UnknownCompany`].
/// Callers that must keep rendering can fall back with `unwrap_or_default()`,
/// which yields the all-zero result.
pub fn calculate_summary_by_id(
    record: &RowRecord,
    company_id: i64,
) -> Result<SpecSummaryResult, SummaryError> {
    let company = resolve_company(company_id)?;
    Ok(calculate_summary(record, company))
}

/// Compute the summary and write the 8 fields onto `record`.
///
/// On an unknown company id the record is left untouched.
pub fn populate_summary_fields(
    record: &mut RowRecord,
    company_id: i64,
) -> Result<SpecSummaryResult, SummaryError> {
    let summary = calculate_summary_by_id(record, company_id)?;
    write_summary_fields(record, &summary);
    Ok(summary)
}

/// Write every field of `summary` onto `record`, replacing existing values.
pub fn write_summary_fields(record: &mut RowRecord, summary: &SpecSummaryResult) {
    for (c_field, n_value) in summary.to_fields() {
        record.insert(c_field, n_value);
    }
}

fn resolve_company(company_id: i64) -> Result<EnumCompany, SummaryError> {
    EnumCompany::try_from(company_id).inspect_err(|err| {
        error!(company_id, "summary calculation rejected: {err}");
    })
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Validation

/// Recompute the summary and compare it against the values stored on `record`.
///
/// `tolerance` defaults to [`N_TOLERANCE_SUMMARY_DEFAULT`]; a difference equal
/// to the tolerance passes. Unknown company ids fail immediately with a single
/// error and no mismatches.
pub fn validate_summary_fields(
    record: &RowRecord,
    company_id: i64,
    tolerance: Option<f64>,
) -> SpecSummaryValidation {
    let company = match EnumCompany::try_from(company_id) {
        Ok(company) => company,
        Err(err) => {
            return SpecSummaryValidation {
                is_valid: false,
                errors: vec![err.to_string()],
                mismatches: vec![],
            };
        }
    };
    let n_tolerance = tolerance.unwrap_or(N_TOLERANCE_SUMMARY_DEFAULT).abs();

    let summary = calculate_summary(record, company);
    let mismatches: Vec<SpecSummaryMismatch> = summary
        .to_fields()
        .into_iter()
        .filter_map(|(c_field, n_expected)| {
            let n_actual = record.get_number_or_zero(c_field);
            let n_difference = (n_expected - n_actual).abs();
            let n_slack = N_TOLERANCE_EPSILON * n_expected.abs().max(n_actual.abs()).max(1.0);
            if n_difference > n_tolerance + n_slack {
                Some(SpecSummaryMismatch {
                    field: c_field.to_string(),
                    expected: n_expected,
                    actual: n_actual,
                    difference: n_difference,
                })
            } else {
                None
            }
        })
        .collect();

    SpecSummaryValidation {
        is_valid: mismatches.is_empty(),
        errors: vec![],
        mismatches,
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
