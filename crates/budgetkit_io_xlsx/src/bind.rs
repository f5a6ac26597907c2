//! Bind row records to a typed DataFrame, one column per mapping.
//!
//! Columns are named by their letter. Numeric and temporal mappings become
//! `Float64` columns (dates as Excel serials); a mapping whose values cannot
//! all be read that way falls back to a text column with a report warning.

use budgetkit_summary::{EnumFieldValue, RowRecord};
use polars::prelude::{Column, DataFrame, NamedFrom, PlSmallStr, Series};
use tracing::warn;

use crate::spec::{
    EnumCellValue, EnumColumnFormat, EnumComputedRule, SpecColumnMapping, SpecXlsxReport,
    XlsxExportError,
};
use crate::util::{format_column_letter, normalize_percentage, parse_excel_serial};

/// Build the export DataFrame for `mappings` resolved to column indices.
pub fn bind_records_to_dataframe(
    records: &[RowRecord],
    mappings: &[(usize, &SpecColumnMapping)],
    report: &mut SpecXlsxReport,
) -> Result<DataFrame, XlsxExportError> {
    let mut l_columns: Vec<Column> = Vec::with_capacity(mappings.len());

    for (n_idx, mapping) in mappings {
        let c_letter = format_column_letter(*n_idx);
        let (l_values, n_unreadable) = derive_column_values(records, mapping);

        let series = if n_unreadable == 0 && mapping.format.is_numeric() {
            let l_numbers: Vec<Option<f64>> = l_values
                .iter()
                .map(|value| match value {
                    EnumCellValue::Number(n) => Some(*n),
                    _ => None,
                })
                .collect();
            Series::new(PlSmallStr::from(c_letter.as_str()), l_numbers)
        } else {
            if n_unreadable > 0 {
                let c_msg = format!(
                    "Column {c_letter} ({}): {n_unreadable} value(s) are not {:?}; column written as text.",
                    mapping.header, mapping.format
                );
                warn!("{c_msg}");
                report.warn(c_msg);
            }
            let l_texts: Vec<Option<String>> = records
                .iter()
                .enumerate()
                .map(|(n_row, record)| derive_text_value(record, n_row, mapping))
                .collect();
            Series::new(PlSmallStr::from(c_letter.as_str()), l_texts)
        };
        l_columns.push(Column::from(series));
    }

    Ok(DataFrame::new(l_columns)?)
}

/// Typed cell values of one mapping plus the number of unreadable values.
pub fn derive_column_values(
    records: &[RowRecord],
    mapping: &SpecColumnMapping,
) -> (Vec<EnumCellValue>, usize) {
    let mut n_unreadable = 0usize;
    let l_values: Vec<EnumCellValue> = records
        .iter()
        .enumerate()
        .map(|(n_row, record)| {
            let value = derive_cell_value(record, n_row, mapping);
            if value.is_none() {
                n_unreadable += 1;
            }
            value.unwrap_or(EnumCellValue::None)
        })
        .collect();
    (l_values, n_unreadable)
}

/// Typed value of one cell; `None` when a present value cannot be read in
/// the mapping's format.
fn derive_cell_value(
    record: &RowRecord,
    n_row: usize,
    mapping: &SpecColumnMapping,
) -> Option<EnumCellValue> {
    if let Some(rule) = &mapping.computed {
        return Some(apply_computed_rule(rule, record, n_row));
    }

    let value = match record.get(&mapping.field) {
        None | Some(EnumFieldValue::Null) => return Some(EnumCellValue::None),
        Some(EnumFieldValue::Text(s)) if s.trim().is_empty() => return Some(EnumCellValue::None),
        Some(value) => value,
    };

    match mapping.format {
        EnumColumnFormat::Text => Some(EnumCellValue::String(value.to_string())),
        EnumColumnFormat::Number | EnumColumnFormat::Decimal => {
            value.as_f64().map(EnumCellValue::Number)
        }
        EnumColumnFormat::Percentage => value
            .as_f64()
            .map(|n| EnumCellValue::Number(normalize_percentage(n))),
        EnumColumnFormat::Date | EnumColumnFormat::Datetime => match value {
            EnumFieldValue::Text(s) => {
                parse_excel_serial(s, mapping.format).map(EnumCellValue::Number)
            }
            EnumFieldValue::Number(n) if n.is_finite() => Some(EnumCellValue::Number(*n)),
            _ => None,
        },
    }
}

fn derive_text_value(
    record: &RowRecord,
    n_row: usize,
    mapping: &SpecColumnMapping,
) -> Option<String> {
    match &mapping.computed {
        Some(rule) => match apply_computed_rule(rule, record, n_row) {
            EnumCellValue::None => None,
            EnumCellValue::String(s) => Some(s),
            EnumCellValue::Number(n) => Some(n.to_string()),
        },
        None => record
            .get(&mapping.field)
            .filter(|value| !value.is_null())
            .map(ToString::to_string),
    }
}

/// Evaluate a computed column for the record at `n_row` (0-based).
pub fn apply_computed_rule(
    rule: &EnumComputedRule,
    record: &RowRecord,
    n_row: usize,
) -> EnumCellValue {
    match rule {
        EnumComputedRule::FlagEquals {
            field,
            value,
            when_true,
            when_false,
        } => {
            let if_equal = record
                .get(field)
                .is_some_and(|v| v.to_string().trim().eq_ignore_ascii_case(value.trim()));
            let c_value = if if_equal { when_true } else { when_false };
            EnumCellValue::String(c_value.clone())
        }
        EnumComputedRule::Sum { fields } => EnumCellValue::Number(
            fields
                .iter()
                .map(|c_field| record.get_number_or_zero(c_field))
                .sum(),
        ),
        EnumComputedRule::RowNumber => EnumCellValue::Number((n_row + 1) as f64),
    }
}

#[cfg(test)]
mod tests {
    use budgetkit_summary::RowRecord;
    use polars::prelude::{AnyValue, DataType};

    use super::{apply_computed_rule, bind_records_to_dataframe};
    use crate::mapping::validate_column_mappings;
    use crate::spec::{
        EnumCellValue, EnumColumnFormat, EnumComputedRule, SpecColumnMapping, SpecXlsxReport,
    };

    fn build_records() -> Vec<RowRecord> {
        let mut record_a = RowRecord::new();
        record_a.insert("cost_center_code", "CC1");
        record_a.insert("allocation_pct", 60.0);
        record_a.insert("join_date", "2024-01-01");
        record_a.insert("executive", "N");
        record_a.insert("payroll_le", 1_000.0);
        record_a.insert("premium_le", "250");

        let mut record_b = RowRecord::new();
        record_b.insert("cost_center_code", "CC2");
        record_b.insert("allocation_pct", 0.4);
        record_b.insert("join_date", "next month");
        record_b.insert("executive", "Y");
        record_b.insert("payroll_le", 2_000.0);

        vec![record_a, record_b]
    }

    #[test]
    fn columns_are_typed_by_format() {
        let l_mappings = vec![
            SpecColumnMapping::new("A", "row", "No.", EnumColumnFormat::Number)
                .with_computed(EnumComputedRule::RowNumber),
            SpecColumnMapping::new("B", "cost_center_code", "CC", EnumColumnFormat::Text),
            SpecColumnMapping::new("D", "allocation_pct", "Pct", EnumColumnFormat::Percentage),
            SpecColumnMapping::new("E", "join_date", "Joined", EnumColumnFormat::Date),
            SpecColumnMapping::new("F", "total", "Total", EnumColumnFormat::Decimal)
                .with_computed(EnumComputedRule::Sum {
                    fields: vec!["payroll_le".to_string(), "premium_le".to_string()],
                }),
        ];
        let l_resolved = validate_column_mappings(&l_mappings).expect("valid");
        let mut report = SpecXlsxReport::default();
        let df = bind_records_to_dataframe(&build_records(), &l_resolved, &mut report)
            .expect("bind");

        let l_cols = df.get_columns();
        assert_eq!(df.height(), 2);
        assert_eq!(l_cols[0].name().as_str(), "A");
        assert_eq!(l_cols[2].name().as_str(), "D");

        assert_eq!(l_cols[0].get(1).expect("cell"), AnyValue::Float64(2.0));
        assert_eq!(l_cols[1].dtype(), &DataType::String);
        assert_eq!(l_cols[2].get(0).expect("cell"), AnyValue::Float64(0.6));
        assert_eq!(l_cols[2].get(1).expect("cell"), AnyValue::Float64(0.4));
        assert_eq!(l_cols[4].get(0).expect("cell"), AnyValue::Float64(1_250.0));

        assert_eq!(l_cols[3].dtype(), &DataType::String);
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].starts_with("Column E (Joined): 1 value(s)"));
    }

    #[test]
    fn flag_rule_compares_text_case_insensitively() {
        let rule = EnumComputedRule::FlagEquals {
            field: "executive".to_string(),
            value: "N".to_string(),
            when_true: "Y".to_string(),
            when_false: "N".to_string(),
        };
        let l_records = build_records();
        assert_eq!(
            apply_computed_rule(&rule, &l_records[0], 0),
            EnumCellValue::String("Y".to_string())
        );
        assert_eq!(
            apply_computed_rule(&rule, &l_records[1], 1),
            EnumCellValue::String("N".to_string())
        );

        let mut record_lower = RowRecord::new();
        record_lower.insert("executive", "n");
        assert_eq!(
            apply_computed_rule(&rule, &record_lower, 0),
            EnumCellValue::String("Y".to_string())
        );
        assert_eq!(
            apply_computed_rule(&rule, &RowRecord::new(), 0),
            EnumCellValue::String("N".to_string())
        );
    }
}
