//! Dto naming-convention check run before saving.
//!
//! Conformant names are camelCase, with period fields carrying a `Le` or
//! `Budget` suffix (`payrollLe`). Legacy mappings used PascalCase with the
//! period as a prefix (`LePayroll`); those block the save.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::spec::{EnumNamingIssueKind, SpecFieldConfigTable, SpecNamingIssue, SpecNamingReport};

static RE_LEGACY_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(Le|Budget)([A-Z][A-Za-z0-9]*)$").expect("valid regex"));
static RE_CAMEL_CASE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z][A-Za-z0-9]*$").expect("valid regex"));

/// Check every configured dto name (derived entries included).
pub fn check_field_naming(table: &SpecFieldConfigTable) -> SpecNamingReport {
    let mut report = SpecNamingReport::default();
    for (field_key, cfg_field) in table {
        let l_names = std::iter::once(cfg_field.dto_name.as_str()).chain(
            cfg_field
                .derived_fields
                .iter()
                .map(|derived| derived.dto_name.as_str()),
        );
        for dto_name in l_names {
            if let Some(issue) = check_dto_name(field_key, dto_name) {
                report.issues.push(issue);
            }
        }
    }
    report
}

/// Check one dto name; `None` when it conforms.
pub fn check_dto_name(field_key: &str, dto_name: &str) -> Option<SpecNamingIssue> {
    if let Some(caps) = RE_LEGACY_PREFIX.captures(dto_name) {
        let c_prefix = &caps[1];
        let c_rest = &caps[2];
        return Some(SpecNamingIssue {
            field_key: field_key.to_string(),
            dto_name: dto_name.to_string(),
            kind: EnumNamingIssueKind::LegacyPrefix,
            suggestion: Some(format!("{}{c_prefix}", lowercase_first(c_rest))),
        });
    }

    if RE_CAMEL_CASE.is_match(dto_name) {
        return None;
    }

    Some(SpecNamingIssue {
        field_key: field_key.to_string(),
        dto_name: dto_name.to_string(),
        kind: EnumNamingIssueKind::NotCamelCase,
        suggestion: derive_camel_case(dto_name),
    })
}

fn lowercase_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(chr) => chr.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn derive_camel_case(dto_name: &str) -> Option<String> {
    let l_parts: Vec<&str> = dto_name
        .split(|chr: char| !chr.is_ascii_alphanumeric())
        .filter(|c_part| !c_part.is_empty())
        .collect();
    let (c_head, l_tail) = l_parts.split_first()?;

    let mut c_out = lowercase_first(c_head);
    for c_part in l_tail {
        let mut chars = c_part.chars();
        if let Some(chr) = chars.next() {
            c_out.extend(chr.to_uppercase());
            c_out.push_str(chars.as_str());
        }
    }
    if RE_CAMEL_CASE.is_match(&c_out) {
        Some(c_out)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::{check_dto_name, check_field_naming};
    use crate::spec::{
        EnumFieldDataType, EnumNamingIssueKind, SpecFieldConfig, SpecFieldConfigTable,
    };

    #[test]
    fn conformant_names_pass() {
        assert!(check_dto_name("payroll", "payrollLe").is_none());
        assert!(check_dto_name("payroll", "payrollBudget").is_none());
        assert!(check_dto_name("cost_center", "costCenterCode").is_none());
    }

    #[test]
    fn legacy_prefix_is_flagged_with_suggestion() {
        let issue = check_dto_name("payroll", "LePayroll").expect("issue");
        assert_eq!(issue.kind, EnumNamingIssueKind::LegacyPrefix);
        assert_eq!(issue.suggestion.as_deref(), Some("payrollLe"));

        let issue = check_dto_name("bonus", "BudgetBonusType").expect("issue");
        assert_eq!(issue.suggestion.as_deref(), Some("bonusTypeBudget"));
    }

    #[test]
    fn snake_case_is_not_camel_case() {
        let issue = check_dto_name("payroll", "payroll_le").expect("issue");
        assert_eq!(issue.kind, EnumNamingIssueKind::NotCamelCase);
        assert_eq!(issue.suggestion.as_deref(), Some("payrollLe"));
    }

    #[test]
    fn table_check_reports_every_offender() {
        let mut table = SpecFieldConfigTable::new();
        table.insert(
            "payroll".to_string(),
            SpecFieldConfig::new("LePayroll", EnumFieldDataType::Decimal),
        );
        table.insert(
            "bonus".to_string(),
            SpecFieldConfig::new("bonusLe", EnumFieldDataType::Decimal),
        );
        table.insert(
            "premium".to_string(),
            SpecFieldConfig::new("BudgetPremium", EnumFieldDataType::Decimal),
        );

        let report = check_field_naming(&table);
        assert!(!report.is_ok());
        assert_eq!(report.issues.len(), 2);
        let txt = report.format_diagnostic();
        assert!(txt.contains("\"LePayroll\""));
        assert!(txt.contains("premiumBudget"));
    }
}
