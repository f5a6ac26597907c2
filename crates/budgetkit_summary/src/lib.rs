//! `budgetkit_summary` v1:
//! Payroll/benefit summary engine for allocation rows.
//!
//! Module layout:
//! - `conf`   : month defaults, tolerance and summary field names
//! - `spec`   : company enum, result/validation models, errors
//! - `record` : flat row record model
//! - `table`  : static per-company source field tables
//! - `calc`   : summary calculation and validation
pub mod calc;
pub mod conf;
pub mod record;
pub mod spec;
pub mod table;

pub use calc::{
    calculate_summary, calculate_summary_by_id, populate_summary_fields, sum_record_fields,
    validate_summary_fields, write_summary_fields,
};
pub use conf::{
    C_FIELD_LE_OF_MONTH, C_FIELD_NO_OF_MONTH, N_TOLERANCE_SUMMARY_DEFAULT, TUP_SUMMARY_FIELDS,
    summary_field_names,
};
pub use record::{EnumFieldValue, RowRecord};
pub use spec::{
    EnumCompany, SpecFieldTables, SpecSummaryMismatch, SpecSummaryResult, SpecSummaryValidation,
    SummaryError,
};
pub use table::{sb_only_fields, select_field_tables};
