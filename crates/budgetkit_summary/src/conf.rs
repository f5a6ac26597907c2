//! Summary constants: month fields, defaults and output field names.

/// Record field carrying the number of latest-estimate months.
pub const C_FIELD_LE_OF_MONTH: &str = "le_of_month";
/// Record field carrying the number of budget months.
pub const C_FIELD_NO_OF_MONTH: &str = "no_of_month";

/// Estimate months used when `le_of_month` is absent.
pub const N_MONTHS_ESTIMATE_DEFAULT: f64 = 0.0;
/// Budget months used when `no_of_month` is absent.
pub const N_MONTHS_BUDGET_DEFAULT: f64 = 12.0;
/// Absolute tolerance used by summary validation (inclusive).
pub const N_TOLERANCE_SUMMARY_DEFAULT: f64 = 0.02;

pub const C_FIELD_MONTHLY_ESTIMATE_WITH_SB: &str = "monthly_estimate_with_sb";
pub const C_FIELD_MONTHLY_ESTIMATE_WITHOUT_SB: &str = "monthly_estimate_without_sb";
pub const C_FIELD_YEARLY_ESTIMATE_WITH_SB: &str = "yearly_estimate_with_sb";
pub const C_FIELD_YEARLY_ESTIMATE_WITHOUT_SB: &str = "yearly_estimate_without_sb";
pub const C_FIELD_MONTHLY_BUDGET_WITH_SB: &str = "monthly_budget_with_sb";
pub const C_FIELD_MONTHLY_BUDGET_WITHOUT_SB: &str = "monthly_budget_without_sb";
pub const C_FIELD_YEARLY_BUDGET_WITH_SB: &str = "yearly_budget_with_sb";
pub const C_FIELD_YEARLY_BUDGET_WITHOUT_SB: &str = "yearly_budget_without_sb";

/// The 8 summary record keys in canonical order.
pub const TUP_SUMMARY_FIELDS: [&str; 8] = [
    C_FIELD_MONTHLY_ESTIMATE_WITH_SB,
    C_FIELD_MONTHLY_ESTIMATE_WITHOUT_SB,
    C_FIELD_YEARLY_ESTIMATE_WITH_SB,
    C_FIELD_YEARLY_ESTIMATE_WITHOUT_SB,
    C_FIELD_MONTHLY_BUDGET_WITH_SB,
    C_FIELD_MONTHLY_BUDGET_WITHOUT_SB,
    C_FIELD_YEARLY_BUDGET_WITH_SB,
    C_FIELD_YEARLY_BUDGET_WITHOUT_SB,
];

/// Return the 8 summary record keys in canonical order.
pub fn summary_field_names() -> &'static [&'static str] {
    &TUP_SUMMARY_FIELDS
}
