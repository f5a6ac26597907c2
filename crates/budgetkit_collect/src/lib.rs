//! `budgetkit_collect` v1:
//! Form-field normalization into row records.
//!
//! Module layout:
//! - `conf`    : sniffing layouts and naming constants
//! - `spec`    : raw inputs, field configuration, reports, errors
//! - `util`    : pure transform/coercion helpers
//! - `collect` : row collection pipeline
//! - `naming`  : dto naming-convention check
pub mod collect;
pub mod conf;
pub mod naming;
pub mod spec;
pub mod util;

pub use collect::{collect_row, derive_field_value, select_raw_value, validate_field_configs};
pub use naming::{check_dto_name, check_field_naming};
pub use spec::{
    CollectError, EnumDerivedRule, EnumFieldDataType, EnumFieldTransform, EnumNamingIssueKind,
    EnumRawValue, EnumValueSource, SpecCollectReport, SpecCollectedRow, SpecDerivedField,
    SpecFieldConfig, SpecFieldConfigTable, SpecNamingIssue, SpecNamingReport, SpecRawField,
};
