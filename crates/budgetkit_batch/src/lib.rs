//! `budgetkit_batch` v1:
//! Allocation batch rows, validation and the save pipeline.
//!
//! Module layout:
//! - `conf`        : endpoints, allocation constants, shared master fields
//! - `spec`        : rows, issues, save options/outcomes, errors
//! - `api`         : server API models and the client trait
//! - `registry`    : allocation row registry
//! - `validate`    : pre-save batch validation
//! - `orchestrate` : dropdown loading, benefit estimates, save pipeline
pub mod api;
pub mod conf;
pub mod orchestrate;
pub mod registry;
pub mod spec;
pub mod validate;

pub use api::{
    AllocationApi, ApiError, EnumOptionList, SpecAllocationShare, SpecBatchConfiguration,
    SpecBenefitEstimate, SpecBenefitRequest, SpecOption, SpecSaveAck,
};
pub use conf::SpecBudgetkitConfig;
pub use orchestrate::{
    collect_batch_records, fetch_benefit_estimates, load_dependent_options,
    resolve_batch_company, save_batch,
};
pub use registry::AllocationContext;
pub use spec::{
    BatchError, EnumBatchIssue, EnumRowKind, SpecAllocationRow, SpecDropdownOptions,
    SpecSaveOptions, SpecSaveOutcome,
};
pub use validate::validate_batch;
