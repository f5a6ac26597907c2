//! Static per-company source field tables.
//!
//! Each company carries four ordered tables: latest estimate (LE) and budget,
//! each with and without the S&B-only fields. The with-S&B table always lists
//! the without-S&B fields first, followed by the S&B-only fields.

use crate::spec::{EnumCompany, SpecFieldTables};

////////////////////////////////////////////////////////////////////////////////
// #region BIGCTables

/// BIGC latest-estimate monthly fields, without S&B.
pub const BIGC_LE_WITHOUT_SB: &[&str] = &[
    "payroll_le",
    "premium_le",
    "sal_with_en_le",
    "sal_not_en_le",
    "bonus_le",
    "fleet_card_le",
    "car_allowance_le",
    "license_allowance_le",
    "housing_allowance_le",
    "gasoline_allowance_le",
    "wage_student_le",
    "car_rental_le",
    "skill_pay_allowance_le",
    "other_allowance_le",
    "social_security_le",
    "labor_fund_fee_le",
    "other_staff_benefit_le",
    "provident_fund_le",
    "employee_welfare_le",
    "provision_le",
    "interest_le",
    "staff_insurance_le",
    "medical_expense_le",
    "medical_inhouse_le",
    "training_le",
    "long_service_le",
];

/// BIGC latest-estimate monthly fields, with S&B.
pub const BIGC_LE_WITH_SB: &[&str] = &[
    "payroll_le",
    "premium_le",
    "sal_with_en_le",
    "sal_not_en_le",
    "bonus_le",
    "fleet_card_le",
    "car_allowance_le",
    "license_allowance_le",
    "housing_allowance_le",
    "gasoline_allowance_le",
    "wage_student_le",
    "car_rental_le",
    "skill_pay_allowance_le",
    "other_allowance_le",
    "social_security_le",
    "labor_fund_fee_le",
    "other_staff_benefit_le",
    "provident_fund_le",
    "employee_welfare_le",
    "provision_le",
    "interest_le",
    "staff_insurance_le",
    "medical_expense_le",
    "medical_inhouse_le",
    "training_le",
    "long_service_le",
    "sb_salary_increase_le",
    "sb_bonus_provision_le",
];

/// BIGC budget monthly fields, without S&B.
pub const BIGC_BUDGET_WITHOUT_SB: &[&str] = &[
    "payroll_budget",
    "premium_budget",
    "sal_with_en_budget",
    "sal_not_en_budget",
    "bonus_budget",
    "fleet_card_budget",
    "car_allowance_budget",
    "license_allowance_budget",
    "housing_allowance_budget",
    "gasoline_allowance_budget",
    "wage_student_budget",
    "car_rental_budget",
    "skill_pay_allowance_budget",
    "other_allowance_budget",
    "social_security_budget",
    "labor_fund_fee_budget",
    "other_staff_benefit_budget",
    "provident_fund_budget",
    "employee_welfare_budget",
    "provision_budget",
    "interest_budget",
    "staff_insurance_budget",
    "medical_expense_budget",
    "medical_inhouse_budget",
    "training_budget",
    "long_service_budget",
];

/// BIGC budget monthly fields, with S&B.
pub const BIGC_BUDGET_WITH_SB: &[&str] = &[
    "payroll_budget",
    "premium_budget",
    "sal_with_en_budget",
    "sal_not_en_budget",
    "bonus_budget",
    "fleet_card_budget",
    "car_allowance_budget",
    "license_allowance_budget",
    "housing_allowance_budget",
    "gasoline_allowance_budget",
    "wage_student_budget",
    "car_rental_budget",
    "skill_pay_allowance_budget",
    "other_allowance_budget",
    "social_security_budget",
    "labor_fund_fee_budget",
    "other_staff_benefit_budget",
    "provident_fund_budget",
    "employee_welfare_budget",
    "provision_budget",
    "interest_budget",
    "staff_insurance_budget",
    "medical_expense_budget",
    "medical_inhouse_budget",
    "training_budget",
    "long_service_budget",
    "sb_salary_increase_budget",
    "sb_bonus_provision_budget",
];

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region BJCTables

/// BJC latest-estimate monthly fields, without S&B.
pub const BJC_LE_WITHOUT_SB: &[&str] = &[
    "payroll_le",
    "premium_le",
    "bonus_le",
    "car_allowance_le",
    "housing_allowance_le",
    "gasoline_allowance_le",
    "mobile_allowance_le",
    "shift_allowance_le",
    "overtime_le",
    "social_security_le",
    "provident_fund_le",
    "workmen_compensation_le",
    "group_insurance_le",
    "medical_outside_le",
    "medical_inhouse_le",
    "annual_health_check_le",
    "uniform_le",
    "staff_activities_le",
    "severance_provision_le",
];

/// BJC latest-estimate monthly fields, with S&B.
pub const BJC_LE_WITH_SB: &[&str] = &[
    "payroll_le",
    "premium_le",
    "bonus_le",
    "car_allowance_le",
    "housing_allowance_le",
    "gasoline_allowance_le",
    "mobile_allowance_le",
    "shift_allowance_le",
    "overtime_le",
    "social_security_le",
    "provident_fund_le",
    "workmen_compensation_le",
    "group_insurance_le",
    "medical_outside_le",
    "medical_inhouse_le",
    "annual_health_check_le",
    "uniform_le",
    "staff_activities_le",
    "severance_provision_le",
    "sb_salary_increase_le",
    "sb_bonus_provision_le",
    "sb_incentive_le",
];

/// BJC budget monthly fields, without S&B.
pub const BJC_BUDGET_WITHOUT_SB: &[&str] = &[
    "payroll_budget",
    "premium_budget",
    "bonus_budget",
    "car_allowance_budget",
    "housing_allowance_budget",
    "gasoline_allowance_budget",
    "mobile_allowance_budget",
    "shift_allowance_budget",
    "overtime_budget",
    "social_security_budget",
    "provident_fund_budget",
    "workmen_compensation_budget",
    "group_insurance_budget",
    "medical_outside_budget",
    "medical_inhouse_budget",
    "annual_health_check_budget",
    "uniform_budget",
    "staff_activities_budget",
    "severance_provision_budget",
];

/// BJC budget monthly fields, with S&B.
pub const BJC_BUDGET_WITH_SB: &[&str] = &[
    "payroll_budget",
    "premium_budget",
    "bonus_budget",
    "car_allowance_budget",
    "housing_allowance_budget",
    "gasoline_allowance_budget",
    "mobile_allowance_budget",
    "shift_allowance_budget",
    "overtime_budget",
    "social_security_budget",
    "provident_fund_budget",
    "workmen_compensation_budget",
    "group_insurance_budget",
    "medical_outside_budget",
    "medical_inhouse_budget",
    "annual_health_check_budget",
    "uniform_budget",
    "staff_activities_budget",
    "severance_provision_budget",
    "sb_salary_increase_budget",
    "sb_bonus_provision_budget",
    "sb_incentive_budget",
];

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region TableSelection

/// Select the four field tables for `company`.
pub fn select_field_tables(company: EnumCompany) -> SpecFieldTables {
    match company {
        EnumCompany::Bigc => SpecFieldTables {
            le_with_sb: BIGC_LE_WITH_SB,
            le_without_sb: BIGC_LE_WITHOUT_SB,
            budget_with_sb: BIGC_BUDGET_WITH_SB,
            budget_without_sb: BIGC_BUDGET_WITHOUT_SB,
        },
        EnumCompany::Bjc => SpecFieldTables {
            le_with_sb: BJC_LE_WITH_SB,
            le_without_sb: BJC_LE_WITHOUT_SB,
            budget_with_sb: BJC_BUDGET_WITH_SB,
            budget_without_sb: BJC_BUDGET_WITHOUT_SB,
        },
    }
}

/// Fields present in `table_with` but not in `table_without`, in table order.
pub fn sb_only_fields(
    table_with: &[&'static str],
    table_without: &[&'static str],
) -> Vec<&'static str> {
    table_with
        .iter()
        .copied()
        .filter(|c_field| !table_without.contains(c_field))
        .collect()
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
