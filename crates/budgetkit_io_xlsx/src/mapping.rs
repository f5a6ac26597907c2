//! Column mapping validation and default per-company layouts.

use std::collections::BTreeMap;

use budgetkit_summary::{EnumCompany, TUP_SUMMARY_FIELDS, select_field_tables};

use crate::spec::{EnumColumnFormat, EnumComputedRule, SpecColumnMapping, XlsxExportError};
use crate::util::{derive_header_from_field, format_column_letter, parse_column_letter};

/// Identity columns leading every default layout: `(field, header, format)`.
const TUP_IDENTITY_COLUMNS: [(&str, &str, EnumColumnFormat); 7] = [
    ("cost_center_code", "Cost Center", EnumColumnFormat::Text),
    ("allocation_pct", "Allocation %", EnumColumnFormat::Percentage),
    ("employee_type", "Employee Type", EnumColumnFormat::Text),
    ("job_band", "Job Band", EnumColumnFormat::Text),
    ("join_date", "Join Date", EnumColumnFormat::Date),
    ("le_of_month", "LE Months", EnumColumnFormat::Number),
    ("no_of_month", "Budget Months", EnumColumnFormat::Number),
];

/// Resolve every mapping to its zero-based column index, ordered by index.
///
/// Column letters must be valid and unique.
pub fn validate_column_mappings(
    mappings: &[SpecColumnMapping],
) -> Result<Vec<(usize, &SpecColumnMapping)>, XlsxExportError> {
    if mappings.is_empty() {
        return Err(XlsxExportError::EmptyMapping);
    }

    let mut dict_by_idx: BTreeMap<usize, &SpecColumnMapping> = BTreeMap::new();
    for mapping in mappings {
        let n_idx = parse_column_letter(&mapping.column)?;
        if dict_by_idx.insert(n_idx, mapping).is_some() {
            return Err(XlsxExportError::DuplicateColumn(format_column_letter(n_idx)));
        }
    }
    Ok(dict_by_idx.into_iter().collect())
}

/// Default layout for `company`: row number, identity columns, executive
/// flag, every LE and Budget field, then the highlighted summary columns.
pub fn derive_default_column_mappings(company: EnumCompany) -> Vec<SpecColumnMapping> {
    let tables = select_field_tables(company);
    let mut l_mappings = Vec::new();
    let mut push = |field: &str, header: String, format: EnumColumnFormat| {
        let c_column = format_column_letter(l_mappings.len());
        l_mappings.push(SpecColumnMapping::new(c_column, field, header, format));
    };

    push("row_number", "No.".to_string(), EnumColumnFormat::Number);
    for (c_field, c_header, format) in TUP_IDENTITY_COLUMNS {
        push(c_field, c_header.to_string(), format);
    }
    push("non_executive", "Non-Executive".to_string(), EnumColumnFormat::Text);
    for &c_field in tables.le_with_sb.iter().chain(tables.budget_with_sb) {
        push(c_field, derive_header_from_field(c_field), EnumColumnFormat::Decimal);
    }
    for c_field in TUP_SUMMARY_FIELDS {
        push(c_field, derive_header_from_field(c_field), EnumColumnFormat::Decimal);
    }

    for mapping in &mut l_mappings {
        match mapping.field.as_str() {
            "row_number" => {
                mapping.computed = Some(EnumComputedRule::RowNumber);
                mapping.width = Some(6.0);
            }
            "non_executive" => {
                mapping.computed = Some(EnumComputedRule::FlagEquals {
                    field: "executive".to_string(),
                    value: "N".to_string(),
                    when_true: "Y".to_string(),
                    when_false: "N".to_string(),
                });
            }
            c_field if TUP_SUMMARY_FIELDS.contains(&c_field) => mapping.highlight = true,
            _ => {}
        }
    }
    l_mappings
}

#[cfg(test)]
mod tests {
    use budgetkit_summary::{EnumCompany, select_field_tables};

    use super::{derive_default_column_mappings, validate_column_mappings};
    use crate::spec::{EnumColumnFormat, SpecColumnMapping, XlsxExportError};

    #[test]
    fn mappings_are_ordered_by_column_index() {
        let l_mappings = vec![
            SpecColumnMapping::new("AA", "c", "C", EnumColumnFormat::Text),
            SpecColumnMapping::new("b", "b", "B", EnumColumnFormat::Text),
            SpecColumnMapping::new("A", "a", "A", EnumColumnFormat::Text),
        ];
        let l_resolved = validate_column_mappings(&l_mappings).expect("valid");
        let l_idx: Vec<usize> = l_resolved.iter().map(|(n_idx, _)| *n_idx).collect();
        assert_eq!(l_idx, vec![0, 1, 26]);
        assert_eq!(l_resolved[1].1.field, "b");
    }

    #[test]
    fn invalid_and_duplicate_letters_are_rejected() {
        let l_dup = vec![
            SpecColumnMapping::new("C", "a", "A", EnumColumnFormat::Text),
            SpecColumnMapping::new("c", "b", "B", EnumColumnFormat::Text),
        ];
        assert!(matches!(
            validate_column_mappings(&l_dup),
            Err(XlsxExportError::DuplicateColumn(c)) if c == "C"
        ));

        let l_bad = vec![SpecColumnMapping::new("1A", "a", "A", EnumColumnFormat::Text)];
        assert!(matches!(
            validate_column_mappings(&l_bad),
            Err(XlsxExportError::InvalidColumnLetter(_))
        ));
        assert!(matches!(
            validate_column_mappings(&[]),
            Err(XlsxExportError::EmptyMapping)
        ));
    }

    #[test]
    fn default_layout_covers_every_field() {
        for company in [EnumCompany::Bigc, EnumCompany::Bjc] {
            let tables = select_field_tables(company);
            let l_mappings = derive_default_column_mappings(company);
            assert_eq!(
                l_mappings.len(),
                9 + tables.le_with_sb.len() + tables.budget_with_sb.len() + 8
            );
            assert!(validate_column_mappings(&l_mappings).is_ok());
            assert!(l_mappings[0].computed.is_some());
            assert_eq!(l_mappings.iter().filter(|m| m.highlight).count(), 8);
            assert!(
                l_mappings
                    .iter()
                    .any(|m| m.field == "yearly_budget_with_sb" && m.highlight)
            );
        }
    }
}
