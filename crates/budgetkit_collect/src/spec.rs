//! Collector specification models: raw inputs, field configuration, reports
//! and errors.

use std::collections::BTreeMap;
use std::fmt;

use budgetkit_summary::{EnumFieldValue, RowRecord};
use serde::{Deserialize, Serialize};
use thiserror::Error;

////////////////////////////////////////////////////////////////////////////////
// #region RawInput

/// Value read from one form control.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum EnumRawValue {
    /// Control missing or value undefined.
    #[default]
    None,
    /// Text value (inputs, select values).
    Text(String),
    /// Numeric value (numeric inputs).
    Number(f64),
    /// Boolean value (checkboxes).
    Bool(bool),
}

impl EnumRawValue {
    /// Missing, or empty text.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::None => true,
            Self::Text(s) => s.is_empty(),
            Self::Number(_) | Self::Bool(_) => false,
        }
    }
}

impl From<&str> for EnumRawValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for EnumRawValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for EnumRawValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<bool> for EnumRawValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// Everything the collector can read from one form control.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpecRawField {
    /// Control value.
    pub value: EnumRawValue,
    /// Displayed text (selected option label).
    pub text: Option<String>,
    /// Checked state for checkboxes/radios.
    pub checked: Option<bool>,
}

impl SpecRawField {
    /// Raw field carrying only a value.
    pub fn from_value(value: impl Into<EnumRawValue>) -> Self {
        Self {
            value: value.into(),
            ..Default::default()
        }
    }

    /// Raw select field with value and displayed label.
    pub fn from_select(value: impl Into<EnumRawValue>, text: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            text: Some(text.into()),
            checked: None,
        }
    }

    /// Raw checkbox field.
    pub fn from_checked(checked: bool) -> Self {
        Self {
            value: EnumRawValue::None,
            text: None,
            checked: Some(checked),
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region FieldConfiguration

/// Target data type of one collected field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnumFieldDataType {
    /// Integer; decimal text truncates toward zero.
    Int,
    /// Floating-point number.
    Decimal,
    /// Accepts `"true"`, `"1"` or `true`.
    Boolean,
    /// Passed through unchanged.
    Date,
    /// Text.
    #[default]
    String,
}

/// Which part of the control feeds the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnumValueSource {
    #[default]
    Value,
    /// Displayed text of a select.
    Text,
    /// Checked state of a checkbox.
    Checked,
}

/// Text transform applied before type coercion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "arg", rename_all = "snake_case")]
pub enum EnumFieldTransform {
    Trim,
    Uppercase,
    Lowercase,
    /// Drop `,` grouping separators (`"1,250.50"` ⇒ `"1250.50"`).
    StripThousandsSeparator,
    /// Drop a trailing `%`.
    StripPercent,
    /// Keep the text before the first separator, trimmed.
    TakeBefore(String),
    /// Keep the text after the first separator, trimmed.
    TakeAfter(String),
}

/// Rule producing an extra output entry from the raw value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EnumDerivedRule {
    /// Coerce the raw value with another data type.
    Copy { data_type: EnumFieldDataType },
    /// `when_true` if the raw text equals `value` (trimmed, case-insensitive),
    /// otherwise `when_false`.
    FlagEquals {
        value: String,
        when_true: EnumFieldValue,
        when_false: EnumFieldValue,
    },
    /// The `index`-th part of the raw text split by `separator`, trimmed.
    SplitPart { separator: String, index: usize },
}

/// One derived output entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecDerivedField {
    pub dto_name: String,
    pub rule: EnumDerivedRule,
}

/// Collector configuration of one form field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecFieldConfig {
    /// Output name on the collected record.
    pub dto_name: String,
    #[serde(default)]
    pub data_type: EnumFieldDataType,
    #[serde(default)]
    pub value_source: EnumValueSource,
    #[serde(default)]
    pub transform: Option<EnumFieldTransform>,
    /// Maximum text length in characters.
    #[serde(default)]
    pub max_length: Option<usize>,
    #[serde(default)]
    pub derived_fields: Vec<SpecDerivedField>,
}

impl SpecFieldConfig {
    pub fn new(dto_name: impl Into<String>, data_type: EnumFieldDataType) -> Self {
        Self {
            dto_name: dto_name.into(),
            data_type,
            value_source: EnumValueSource::Value,
            transform: None,
            max_length: None,
            derived_fields: vec![],
        }
    }

    pub fn with_source(mut self, value_source: EnumValueSource) -> Self {
        self.value_source = value_source;
        self
    }

    pub fn with_transform(mut self, transform: EnumFieldTransform) -> Self {
        self.transform = Some(transform);
        self
    }

    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = Some(max_length);
        self
    }

    pub fn with_derived(mut self, dto_name: impl Into<String>, rule: EnumDerivedRule) -> Self {
        self.derived_fields.push(SpecDerivedField {
            dto_name: dto_name.into(),
            rule,
        });
        self
    }
}

/// Field configuration table keyed by form field key.
pub type SpecFieldConfigTable = BTreeMap<String, SpecFieldConfig>;

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Reports

/// Counters and diagnostics for one collected row.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpecCollectReport {
    /// Fields written through their configuration.
    pub cnt_configured: u64,
    /// Fields written through the unconfigured fallback path.
    pub cnt_fallback: u64,
    /// Derived entries written.
    pub cnt_derived: u64,
    /// Text values cut to `max_length`.
    pub cnt_truncated: u64,
    /// Non-fatal warnings.
    pub warnings: Vec<String>,
}

impl SpecCollectReport {
    pub fn warn(&mut self, msg: impl AsRef<str>) {
        self.warnings.push(msg.as_ref().to_string());
    }
}

impl fmt::Display for SpecCollectReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[COLLECT] configured={} fallback={} derived={} truncated={} warnings={}",
            self.cnt_configured,
            self.cnt_fallback,
            self.cnt_derived,
            self.cnt_truncated,
            self.warnings.len()
        )
    }
}

/// Normalized record plus its collection report.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpecCollectedRow {
    pub record: RowRecord,
    pub report: SpecCollectReport,
}

/// Kind of naming-convention violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumNamingIssueKind {
    /// PascalCase name starting with a period prefix (`LePayroll`).
    LegacyPrefix,
    /// Not camelCase at all (underscores, leading capital, punctuation).
    NotCamelCase,
}

/// One dto name that breaks the naming convention.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecNamingIssue {
    pub field_key: String,
    pub dto_name: String,
    pub kind: EnumNamingIssueKind,
    /// Conformant replacement when one can be derived.
    pub suggestion: Option<String>,
}

/// Naming-convention check result.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpecNamingReport {
    pub issues: Vec<SpecNamingIssue>,
}

impl SpecNamingReport {
    pub fn is_ok(&self) -> bool {
        self.issues.is_empty()
    }

    /// Multi-line diagnostic suitable for a blocking message.
    pub fn format_diagnostic(&self) -> String {
        let mut l_lines = vec![format!(
            "Field mapping check failed: {} field name(s) do not follow camelCase with period suffix.",
            self.issues.len()
        )];
        for issue in &self.issues {
            let c_kind = match issue.kind {
                EnumNamingIssueKind::LegacyPrefix => "legacy prefix",
                EnumNamingIssueKind::NotCamelCase => "not camelCase",
            };
            let c_line = match &issue.suggestion {
                Some(c_suggestion) => format!(
                    "- {} -> {:?} ({c_kind}), expected {c_suggestion:?}",
                    issue.field_key, issue.dto_name
                ),
                None => format!("- {} -> {:?} ({c_kind})", issue.field_key, issue.dto_name),
            };
            l_lines.push(c_line);
        }
        l_lines.join("\n")
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Errors

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CollectError {
    #[error("Field {field_key:?} has an empty dto name.")]
    EmptyDtoName { field_key: String },
    #[error("Dto name {dto_name:?} is produced by both {first:?} and {second:?}.")]
    DuplicateDtoName {
        dto_name: String,
        first: String,
        second: String,
    },
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
