//! Row collection: raw form fields to a normalized row record.

use std::collections::BTreeMap;

use budgetkit_summary::{EnumFieldValue, RowRecord};
use tracing::{debug, warn};

use crate::spec::{
    CollectError, EnumDerivedRule, EnumRawValue, EnumValueSource, SpecCollectReport,
    SpecCollectedRow, SpecFieldConfig, SpecFieldConfigTable, SpecRawField,
};
use crate::util::{
    apply_transform, coerce_raw_value, derive_default_dto_name, sniff_raw_value, truncate_chars,
};

/// Collect one row of raw form fields into a normalized record.
///
/// Configured fields go through source selection, transform, type coercion,
/// `max_length` truncation and derived entries. Unconfigured fields take the
/// compatibility path: a capitalized default name and naive type sniffing.
/// When two raw fields write the same output name, the later one wins.
pub fn collect_row(
    raw_fields: &[(String, SpecRawField)],
    table: &SpecFieldConfigTable,
) -> Result<SpecCollectedRow, CollectError> {
    validate_field_configs(table)?;

    let mut record = RowRecord::new();
    let mut report = SpecCollectReport::default();

    for (field_key, raw_field) in raw_fields {
        match table.get(field_key) {
            Some(cfg_field) => {
                collect_configured_field(field_key, raw_field, cfg_field, &mut record, &mut report);
            }
            None => {
                let dto_name = derive_default_dto_name(field_key);
                debug!(field_key = %field_key, dto_name = %dto_name, "unconfigured field, using fallback mapping");
                record.insert(dto_name, sniff_raw_value(&raw_field.value));
                report.cnt_fallback += 1;
            }
        }
    }

    Ok(SpecCollectedRow { record, report })
}

/// Reject empty dto names and output names produced by more than one field.
pub fn validate_field_configs(table: &SpecFieldConfigTable) -> Result<(), CollectError> {
    let mut dict_owner: BTreeMap<&str, &str> = BTreeMap::new();
    for (field_key, cfg_field) in table {
        let l_names = std::iter::once(cfg_field.dto_name.as_str()).chain(
            cfg_field
                .derived_fields
                .iter()
                .map(|derived| derived.dto_name.as_str()),
        );
        for dto_name in l_names {
            if dto_name.trim().is_empty() {
                return Err(CollectError::EmptyDtoName {
                    field_key: field_key.clone(),
                });
            }
            if let Some(first) = dict_owner.insert(dto_name, field_key.as_str()) {
                return Err(CollectError::DuplicateDtoName {
                    dto_name: dto_name.to_string(),
                    first: first.to_string(),
                    second: field_key.clone(),
                });
            }
        }
    }
    Ok(())
}

/// Pick the raw value configured by `value_source`.
pub fn select_raw_value(raw_field: &SpecRawField, value_source: EnumValueSource) -> EnumRawValue {
    match value_source {
        EnumValueSource::Value => raw_field.value.clone(),
        EnumValueSource::Text => raw_field
            .text
            .clone()
            .map_or(EnumRawValue::None, EnumRawValue::Text),
        EnumValueSource::Checked => EnumRawValue::Bool(raw_field.checked.unwrap_or(false)),
    }
}

/// Evaluate one derived-field rule against the raw value.
pub fn derive_field_value(rule: &EnumDerivedRule, raw: &EnumRawValue) -> EnumFieldValue {
    if raw.is_empty() {
        return EnumFieldValue::Null;
    }

    match rule {
        EnumDerivedRule::Copy { data_type } => coerce_raw_value(raw, *data_type),
        EnumDerivedRule::FlagEquals {
            value,
            when_true,
            when_false,
        } => {
            let if_equal = match raw {
                EnumRawValue::Text(s) => s.trim().eq_ignore_ascii_case(value.trim()),
                EnumRawValue::Number(n) => n.to_string() == value.trim(),
                EnumRawValue::Bool(b) => b.to_string().eq_ignore_ascii_case(value.trim()),
                EnumRawValue::None => false,
            };
            if if_equal {
                when_true.clone()
            } else {
                when_false.clone()
            }
        }
        EnumDerivedRule::SplitPart { separator, index } => match raw {
            EnumRawValue::Text(s) => s
                .split(separator.as_str())
                .nth(*index)
                .map(str::trim)
                .filter(|c_part| !c_part.is_empty())
                .map_or(EnumFieldValue::Null, |c_part| {
                    EnumFieldValue::Text(c_part.to_string())
                }),
            _ => EnumFieldValue::Null,
        },
    }
}

fn collect_configured_field(
    field_key: &str,
    raw_field: &SpecRawField,
    cfg_field: &SpecFieldConfig,
    record: &mut RowRecord,
    report: &mut SpecCollectReport,
) {
    let raw = select_raw_value(raw_field, cfg_field.value_source);

    let value = if raw.is_empty() {
        EnumFieldValue::Null
    } else {
        let raw_transformed = match &cfg_field.transform {
            Some(transform) => apply_transform(&raw, transform),
            None => raw.clone(),
        };
        coerce_raw_value(&raw_transformed, cfg_field.data_type)
    };

    let value = match (value, cfg_field.max_length) {
        (EnumFieldValue::Text(c_text), Some(n_max)) => match truncate_chars(&c_text, n_max) {
            Some(c_cut) => {
                warn!(
                    field_key,
                    dto_name = %cfg_field.dto_name,
                    max_length = n_max,
                    "value truncated to max length"
                );
                report.cnt_truncated += 1;
                report.warn(format!(
                    "{field_key}: value truncated to {n_max} characters."
                ));
                EnumFieldValue::Text(c_cut)
            }
            None => EnumFieldValue::Text(c_text),
        },
        (value, _) => value,
    };

    record.insert(cfg_field.dto_name.clone(), value);
    report.cnt_configured += 1;

    for derived in &cfg_field.derived_fields {
        record.insert(derived.dto_name.clone(), derive_field_value(&derived.rule, &raw));
        report.cnt_derived += 1;
    }
}

#[cfg(test)]
mod tests {
    use budgetkit_summary::EnumFieldValue;

    use super::{collect_row, validate_field_configs};
    use crate::spec::{
        CollectError, EnumDerivedRule, EnumFieldDataType, EnumFieldTransform, EnumValueSource,
        SpecFieldConfig, SpecFieldConfigTable, SpecRawField,
    };

    fn build_table() -> SpecFieldConfigTable {
        let mut table = SpecFieldConfigTable::new();
        table.insert(
            "payroll".to_string(),
            SpecFieldConfig::new("payrollLe", EnumFieldDataType::Decimal)
                .with_transform(EnumFieldTransform::StripThousandsSeparator),
        );
        table.insert(
            "headcount".to_string(),
            SpecFieldConfig::new("headcountBudget", EnumFieldDataType::Int),
        );
        table.insert(
            "executive".to_string(),
            SpecFieldConfig::new("executive", EnumFieldDataType::String)
                .with_transform(EnumFieldTransform::Uppercase)
                .with_derived(
                    "nonExecutive",
                    EnumDerivedRule::FlagEquals {
                        value: "N".to_string(),
                        when_true: EnumFieldValue::from("Y"),
                        when_false: EnumFieldValue::from("N"),
                    },
                ),
        );
        table.insert(
            "cost_center".to_string(),
            SpecFieldConfig::new("costCenterName", EnumFieldDataType::String)
                .with_source(EnumValueSource::Text)
                .with_transform(EnumFieldTransform::TakeAfter("|".to_string()))
                .with_max_length(10)
                .with_derived(
                    "costCenterCode",
                    EnumDerivedRule::SplitPart {
                        separator: "|".to_string(),
                        index: 0,
                    },
                ),
        );
        table.insert(
            "is_new_hire".to_string(),
            SpecFieldConfig::new("isNewHire", EnumFieldDataType::Boolean)
                .with_source(EnumValueSource::Checked),
        );
        table
    }

    #[test]
    fn collect_row_applies_config_rules() {
        let raw_fields = vec![
            ("payroll".to_string(), SpecRawField::from_value("1,250,000.50")),
            ("headcount".to_string(), SpecRawField::from_value("3.7")),
            ("executive".to_string(), SpecRawField::from_value("n")),
            (
                "cost_center".to_string(),
                SpecRawField::from_select("1001", "CC1001 | Store Operations Bangkok"),
            ),
            ("is_new_hire".to_string(), SpecRawField::from_checked(true)),
        ];

        let collected = collect_row(&raw_fields, &build_table()).expect("collect");
        let record = &collected.record;
        assert_eq!(record.get_number("payrollLe"), Some(1_250_000.5));
        assert_eq!(record.get_number("headcountBudget"), Some(3.0));
        assert_eq!(record.get_text("executive"), Some("N"));
        assert_eq!(record.get_text("nonExecutive"), Some("Y"));
        assert_eq!(record.get_text("costCenterName"), Some("Store Oper"));
        assert_eq!(record.get_text("costCenterCode"), Some("CC1001"));
        assert_eq!(record.get("isNewHire"), Some(&EnumFieldValue::Bool(true)));

        assert_eq!(collected.report.cnt_configured, 5);
        assert_eq!(collected.report.cnt_derived, 2);
        assert_eq!(collected.report.cnt_truncated, 1);
        assert_eq!(collected.report.warnings.len(), 1);
        assert_eq!(collected.report.cnt_fallback, 0);
    }

    #[test]
    fn derived_fields_read_raw_value_not_coerced_value() {
        let mut table = SpecFieldConfigTable::new();
        table.insert(
            "months".to_string(),
            SpecFieldConfig::new("noOfMonth", EnumFieldDataType::Int).with_derived(
                "noOfMonthText",
                EnumDerivedRule::Copy {
                    data_type: EnumFieldDataType::String,
                },
            ),
        );
        let raw_fields = vec![("months".to_string(), SpecRawField::from_value("9.5"))];

        let collected = collect_row(&raw_fields, &table).expect("collect");
        assert_eq!(collected.record.get_number("noOfMonth"), Some(9.0));
        assert_eq!(collected.record.get_text("noOfMonthText"), Some("9.5"));
    }

    #[test]
    fn empty_values_become_null() {
        let raw_fields = vec![
            ("payroll".to_string(), SpecRawField::from_value("")),
            ("headcount".to_string(), SpecRawField::default()),
            ("executive".to_string(), SpecRawField::from_value("")),
        ];

        let collected = collect_row(&raw_fields, &build_table()).expect("collect");
        assert_eq!(collected.record.get("payrollLe"), Some(&EnumFieldValue::Null));
        assert_eq!(
            collected.record.get("headcountBudget"),
            Some(&EnumFieldValue::Null)
        );
        assert_eq!(
            collected.record.get("nonExecutive"),
            Some(&EnumFieldValue::Null)
        );
    }

    #[test]
    fn unconfigured_fields_use_fallback_mapping() {
        let raw_fields = vec![
            ("remark_text".to_string(), SpecRawField::from_value("hello")),
            ("start_date".to_string(), SpecRawField::from_value("2025-04-01")),
            ("extra_amount".to_string(), SpecRawField::from_value("250.75")),
        ];

        let collected = collect_row(&raw_fields, &build_table()).expect("collect");
        assert_eq!(collected.record.get_text("RemarkText"), Some("hello"));
        assert_eq!(collected.record.get_text("StartDate"), Some("2025-04-01"));
        assert_eq!(collected.record.get_number("ExtraAmount"), Some(250.75));
        assert_eq!(collected.report.cnt_fallback, 3);
        assert_eq!(collected.report.cnt_configured, 0);
    }

    #[test]
    fn duplicate_output_names_are_rejected() {
        let mut table = build_table();
        table.insert(
            "payroll_copy".to_string(),
            SpecFieldConfig::new("payrollLe", EnumFieldDataType::Decimal),
        );

        let err = validate_field_configs(&table).expect_err("must fail");
        assert!(matches!(err, CollectError::DuplicateDtoName { .. }));
    }
}
