//! Server API seam: request/response models and the client trait.
//!
//! Transport is left to implementers; endpoint URLs come from
//! [`crate::conf::SpecBudgetkitConfig::derive_endpoint_url`].

use std::collections::BTreeMap;

use budgetkit_summary::RowRecord;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Dropdown lists served by the options endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnumOptionList {
    Companies,
    CostCenters,
    JobBands,
    EmployeeTypes,
    Positions,
}

impl EnumOptionList {
    /// Query value sent to the options endpoint.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Companies => "companies",
            Self::CostCenters => "cost_centers",
            Self::JobBands => "job_bands",
            Self::EmployeeTypes => "employee_types",
            Self::Positions => "positions",
        }
    }
}

/// One dropdown entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecOption {
    pub value: String,
    pub text: String,
}

/// Benefit calculation request for several cost centers sharing one set of
/// employee parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecBenefitRequest {
    pub company_id: i64,
    pub cost_center_codes: Vec<String>,
    /// Collected master record.
    pub shared: RowRecord,
}

/// Benefit fields calculated for one cost center.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecBenefitEstimate {
    pub cost_center_code: String,
    pub fields: RowRecord,
}

/// Acknowledgement of the batch-save endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecSaveAck {
    pub saved_count: usize,
    #[serde(default)]
    pub batch_id: Option<String>,
}

/// One cost-center share in the auxiliary batch configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecAllocationShare {
    pub cost_center_code: String,
    pub allocation_pct: f64,
}

/// Auxiliary configuration saved after the primary batch save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecBatchConfiguration {
    pub batch_id: Option<String>,
    pub company_id: i64,
    pub allocations: Vec<SpecAllocationShare>,
}

/// Transport-level failure reported by an [`AllocationApi`] implementer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },
    #[error("transport error: {0}")]
    Transport(String),
    #[error("response decode error: {0}")]
    Decode(String),
}

/// Client of the budget server API. Calls are sequential and blocking.
pub trait AllocationApi {
    /// Populate one dropdown list; `params` narrows dependent lists.
    fn list_options(
        &mut self,
        list: EnumOptionList,
        params: &BTreeMap<String, String>,
    ) -> Result<Vec<SpecOption>, ApiError>;

    fn calculate_benefits(
        &mut self,
        request: &SpecBenefitRequest,
    ) -> Result<Vec<SpecBenefitEstimate>, ApiError>;

    fn save_batch(&mut self, records: &[RowRecord]) -> Result<SpecSaveAck, ApiError>;

    fn save_configuration(&mut self, config: &SpecBatchConfiguration) -> Result<(), ApiError>;
}
