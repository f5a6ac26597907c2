//! Batch specification models: rows, issues, options, outcomes and errors.

use std::collections::BTreeMap;

use budgetkit_collect::{CollectError, SpecRawField};
use budgetkit_summary::{RowRecord, SummaryError};
use thiserror::Error;

use crate::api::{ApiError, SpecOption, SpecSaveAck};
use crate::conf::TUP_MASTER_SHARED_FIELDS;

////////////////////////////////////////////////////////////////////////////////
// #region Rows

/// Role of a row inside one allocation batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumRowKind {
    /// Carries the employee-level fields shared by the batch.
    Master,
    /// One extra cost-center allocation of the same employee.
    Child,
}

/// State of one allocation row.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecAllocationRow {
    pub row_id: u32,
    pub kind: EnumRowKind,
    pub cost_center_code: Option<String>,
    /// Share of the employee cost charged to the cost center, in percent.
    pub allocation_pct: Option<f64>,
    /// Raw form fields keyed by form field key.
    pub raw_fields: BTreeMap<String, SpecRawField>,
    /// Fields returned by the benefit calculation endpoint.
    pub benefit_fields: RowRecord,
}

impl SpecAllocationRow {
    pub fn new(row_id: u32, kind: EnumRowKind) -> Self {
        Self {
            row_id,
            kind,
            cost_center_code: None,
            allocation_pct: None,
            raw_fields: BTreeMap::new(),
            benefit_fields: RowRecord::new(),
        }
    }

    pub fn is_master(&self) -> bool {
        self.kind == EnumRowKind::Master
    }

    /// Raw fields as ordered `(key, field)` pairs for the collector.
    pub fn raw_field_pairs(&self) -> Vec<(String, SpecRawField)> {
        self.raw_fields
            .iter()
            .map(|(key, raw)| (key.clone(), raw.clone()))
            .collect()
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Validation

/// One user-correctable problem that blocks a save.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EnumBatchIssue {
    #[error("The batch has no rows.")]
    EmptyBatch,
    #[error("The batch has no master row.")]
    MissingMaster,
    #[error("Please select a company on the master row.")]
    MissingCompany,
    #[error("Row {row_id}: please select a cost center.")]
    MissingCostCenter { row_id: u32 },
    #[error("Row {row_id}: please enter an allocation percentage.")]
    MissingAllocation { row_id: u32 },
    #[error("Row {row_id}: allocation percentage {pct} must be between 0 and 100.")]
    AllocationOutOfRange { row_id: u32, pct: f64 },
    #[error("Allocation percentages total {total}%, expected 100%.")]
    AllocationTotal { total: f64 },
    #[error("Cost center {code} is used by rows {row_ids:?}.")]
    DuplicateCostCenter { code: String, row_ids: Vec<u32> },
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region SaveOptions

/// Options for the save pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecSaveOptions {
    /// Raw fields copied from master to children before collection.
    pub shared_fields: Vec<String>,
    /// Send the auxiliary batch configuration after a successful save.
    pub if_save_configuration: bool,
}

impl Default for SpecSaveOptions {
    fn default() -> Self {
        Self {
            shared_fields: TUP_MASTER_SHARED_FIELDS
                .iter()
                .map(ToString::to_string)
                .collect(),
            if_save_configuration: true,
        }
    }
}

/// Result of a successful save.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecSaveOutcome {
    pub ack: SpecSaveAck,
    /// Records sent to the save endpoint, summary fields included.
    pub records: Vec<RowRecord>,
    /// Non-blocking warnings (auxiliary save failures, collector warnings).
    pub warnings: Vec<String>,
}

/// Dropdown lists loaded in dependency order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpecDropdownOptions {
    pub companies: Vec<SpecOption>,
    /// Company the dependent lists were loaded for.
    pub company_id: Option<String>,
    pub cost_centers: Vec<SpecOption>,
    pub job_bands: Vec<SpecOption>,
    pub employee_types: Vec<SpecOption>,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Errors

#[derive(Debug, Error)]
pub enum BatchError {
    #[error("Row {0} not found.")]
    RowNotFound(u32),
    #[error("The batch already has a master row (row {0}).")]
    MasterAlreadyExists(u32),
    #[error("The batch has no master row.")]
    NoMaster,
    #[error("Row {0} is the master row and still has child rows.")]
    MasterHasChildren(u32),
    #[error("Validation failed: {}", format_issues(.0))]
    Validation(Vec<EnumBatchIssue>),
    #[error("{0}")]
    FieldMapping(String),
    #[error("Invalid company id {0:?} on master row.")]
    InvalidCompanyId(String),
    #[error(transparent)]
    Summary(#[from] SummaryError),
    #[error(transparent)]
    Collect(#[from] CollectError),
    #[error("API request failed: {0}")]
    Api(#[from] ApiError),
}

fn format_issues(issues: &[EnumBatchIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
