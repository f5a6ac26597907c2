//! Stateless helpers used by the row collector.

use budgetkit_summary::EnumFieldValue;
use chrono::{NaiveDate, NaiveDateTime};

use crate::conf::{TUP_DATE_FORMATS_SNIFFED, TUP_DATETIME_FORMATS_SNIFFED, TUP_NAME_SEPARATORS};
use crate::spec::{EnumFieldDataType, EnumFieldTransform, EnumRawValue};

////////////////////////////////////////////////////////////////////////////////
// #region Transforms

/// Apply one text transform. Numbers are transformed through their text form;
/// booleans and missing values pass through.
pub fn apply_transform(value: &EnumRawValue, transform: &EnumFieldTransform) -> EnumRawValue {
    let c_text = match value {
        EnumRawValue::Text(s) => s.clone(),
        EnumRawValue::Number(n) => n.to_string(),
        EnumRawValue::Bool(_) | EnumRawValue::None => return value.clone(),
    };

    let c_out = match transform {
        EnumFieldTransform::Trim => c_text.trim().to_string(),
        EnumFieldTransform::Uppercase => c_text.to_uppercase(),
        EnumFieldTransform::Lowercase => c_text.to_lowercase(),
        EnumFieldTransform::StripThousandsSeparator => c_text.replace(',', ""),
        EnumFieldTransform::StripPercent => c_text.trim().trim_end_matches('%').to_string(),
        EnumFieldTransform::TakeBefore(c_sep) => match c_text.split_once(c_sep.as_str()) {
            Some((c_head, _)) => c_head.trim().to_string(),
            None => c_text.trim().to_string(),
        },
        EnumFieldTransform::TakeAfter(c_sep) => match c_text.split_once(c_sep.as_str()) {
            Some((_, c_tail)) => c_tail.trim().to_string(),
            None => c_text.trim().to_string(),
        },
    };
    EnumRawValue::Text(c_out)
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Coercion

/// Parse integer text; decimal text truncates toward zero. Non-finite ⇒ `None`.
pub fn parse_int_text(text: &str) -> Option<f64> {
    let c_text = text.trim();
    if let Ok(n) = c_text.parse::<i64>() {
        return Some(n as f64);
    }
    c_text
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .map(f64::trunc)
}

/// Parse decimal text. Non-finite ⇒ `None`.
pub fn parse_decimal_text(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Boolean acceptance: `"true"` (any case), `"1"`, `true`, or the number `1`.
pub fn parse_bool_value(value: &EnumRawValue) -> bool {
    match value {
        EnumRawValue::Bool(b) => *b,
        EnumRawValue::Text(s) => {
            let c_text = s.trim();
            c_text.eq_ignore_ascii_case("true") || c_text == "1"
        }
        EnumRawValue::Number(n) => *n == 1.0,
        EnumRawValue::None => false,
    }
}

/// Coerce a non-empty raw value to `data_type`.
pub fn coerce_raw_value(value: &EnumRawValue, data_type: EnumFieldDataType) -> EnumFieldValue {
    if value.is_empty() {
        return EnumFieldValue::Null;
    }

    match data_type {
        EnumFieldDataType::Int => match value {
            EnumRawValue::Number(n) if n.is_finite() => EnumFieldValue::Number(n.trunc()),
            EnumRawValue::Text(s) => parse_int_text(s).into(),
            _ => EnumFieldValue::Null,
        },
        EnumFieldDataType::Decimal => match value {
            EnumRawValue::Number(n) if n.is_finite() => EnumFieldValue::Number(*n),
            EnumRawValue::Text(s) => parse_decimal_text(s).into(),
            _ => EnumFieldValue::Null,
        },
        EnumFieldDataType::Boolean => EnumFieldValue::Bool(parse_bool_value(value)),
        EnumFieldDataType::Date => match value {
            EnumRawValue::Text(s) => EnumFieldValue::Text(s.clone()),
            EnumRawValue::Number(n) => EnumFieldValue::Number(*n),
            EnumRawValue::Bool(b) => EnumFieldValue::Bool(*b),
            EnumRawValue::None => EnumFieldValue::Null,
        },
        EnumFieldDataType::String => match value {
            EnumRawValue::Text(s) => EnumFieldValue::Text(s.clone()),
            EnumRawValue::Number(n) => EnumFieldValue::Text(n.to_string()),
            EnumRawValue::Bool(b) => EnumFieldValue::Text(b.to_string()),
            EnumRawValue::None => EnumFieldValue::Null,
        },
    }
}

/// Cut `text` to at most `n_chars_max` characters. Returns `None` when no cut
/// was needed.
pub fn truncate_chars(text: &str, n_chars_max: usize) -> Option<String> {
    if text.chars().count() <= n_chars_max {
        return None;
    }
    Some(text.chars().take(n_chars_max).collect())
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region FallbackPath

/// Default dto name for an unconfigured field key.
///
/// Each `_`/`-`/space separated segment gets its first letter capitalized:
/// `cost_center_code` ⇒ `CostCenterCode`, `jobBand` ⇒ `JobBand`.
pub fn derive_default_dto_name(field_key: &str) -> String {
    field_key
        .split(TUP_NAME_SEPARATORS)
        .filter(|c_part| !c_part.is_empty())
        .map(|c_part| {
            let mut chars = c_part.chars();
            match chars.next() {
                Some(chr) => chr.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

/// Whether `text` is a date/datetime in one of the sniffed layouts.
pub fn is_date_like(text: &str) -> bool {
    let c_text = text.trim();
    TUP_DATE_FORMATS_SNIFFED
        .iter()
        .any(|c_fmt| NaiveDate::parse_from_str(c_text, c_fmt).is_ok())
        || TUP_DATETIME_FORMATS_SNIFFED
            .iter()
            .any(|c_fmt| NaiveDateTime::parse_from_str(c_text, c_fmt).is_ok())
}

/// Naive type sniffing for unconfigured fields: numbers become `Number`,
/// dates and other text stay `Text`.
pub fn sniff_raw_value(value: &EnumRawValue) -> EnumFieldValue {
    match value {
        EnumRawValue::None => EnumFieldValue::Null,
        EnumRawValue::Bool(b) => EnumFieldValue::Bool(*b),
        EnumRawValue::Number(n) if n.is_finite() => EnumFieldValue::Number(*n),
        EnumRawValue::Number(_) => EnumFieldValue::Null,
        EnumRawValue::Text(s) if s.is_empty() => EnumFieldValue::Null,
        EnumRawValue::Text(s) if is_date_like(s) => EnumFieldValue::Text(s.clone()),
        EnumRawValue::Text(s) => match parse_decimal_text(s) {
            Some(n) => EnumFieldValue::Number(n),
            None => EnumFieldValue::Text(s.clone()),
        },
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use budgetkit_summary::EnumFieldValue;

    use super::{
        apply_transform, coerce_raw_value, derive_default_dto_name, is_date_like,
        parse_int_text, sniff_raw_value, truncate_chars,
    };
    use crate::spec::{EnumFieldDataType, EnumFieldTransform, EnumRawValue};

    #[test]
    fn int_coercion_truncates_and_guards_nan() {
        assert_eq!(parse_int_text("42"), Some(42.0));
        assert_eq!(parse_int_text(" 12.9 "), Some(12.0));
        assert_eq!(parse_int_text("-3.5"), Some(-3.0));
        assert_eq!(parse_int_text("abc"), None);
        assert_eq!(parse_int_text("NaN"), None);
        assert_eq!(
            coerce_raw_value(&EnumRawValue::from("x12"), EnumFieldDataType::Int),
            EnumFieldValue::Null
        );
    }

    #[test]
    fn boolean_coercion_accepts_true_and_one() {
        for raw in [
            EnumRawValue::from("true"),
            EnumRawValue::from("TRUE"),
            EnumRawValue::from("1"),
            EnumRawValue::Bool(true),
        ] {
            assert_eq!(
                coerce_raw_value(&raw, EnumFieldDataType::Boolean),
                EnumFieldValue::Bool(true)
            );
        }
        for raw in [EnumRawValue::from("yes"), EnumRawValue::from("0")] {
            assert_eq!(
                coerce_raw_value(&raw, EnumFieldDataType::Boolean),
                EnumFieldValue::Bool(false)
            );
        }
    }

    #[test]
    fn empty_raw_values_become_null_for_every_type() {
        for data_type in [
            EnumFieldDataType::Int,
            EnumFieldDataType::Decimal,
            EnumFieldDataType::Boolean,
            EnumFieldDataType::Date,
            EnumFieldDataType::String,
        ] {
            assert!(coerce_raw_value(&EnumRawValue::from(""), data_type).is_null());
            assert!(coerce_raw_value(&EnumRawValue::None, data_type).is_null());
        }
    }

    #[test]
    fn transforms_rewrite_text() {
        let raw = EnumRawValue::from("1,250,000.50");
        assert_eq!(
            apply_transform(&raw, &EnumFieldTransform::StripThousandsSeparator),
            EnumRawValue::from("1250000.50")
        );
        let raw = EnumRawValue::from("CC1001 - Store Operations");
        assert_eq!(
            apply_transform(&raw, &EnumFieldTransform::TakeBefore("-".to_string())),
            EnumRawValue::from("CC1001")
        );
        assert_eq!(
            apply_transform(&raw, &EnumFieldTransform::TakeAfter("-".to_string())),
            EnumRawValue::from("Store Operations")
        );
        assert_eq!(
            apply_transform(&EnumRawValue::from(" 35% "), &EnumFieldTransform::StripPercent),
            EnumRawValue::from("35")
        );
        assert_eq!(
            apply_transform(&EnumRawValue::Bool(true), &EnumFieldTransform::Uppercase),
            EnumRawValue::Bool(true)
        );
    }

    #[test]
    fn truncation_counts_characters() {
        assert_eq!(truncate_chars("abc", 5), None);
        assert_eq!(truncate_chars("abcdef", 3), Some("abc".to_string()));
        assert_eq!(truncate_chars("งบประมาณ", 2), Some("งบ".to_string()));
    }

    #[test]
    fn default_names_and_sniffing() {
        assert_eq!(derive_default_dto_name("cost_center_code"), "CostCenterCode");
        assert_eq!(derive_default_dto_name("jobBand"), "JobBand");
        assert_eq!(derive_default_dto_name("remark"), "Remark");

        assert_eq!(
            sniff_raw_value(&EnumRawValue::from("1500.25")),
            EnumFieldValue::Number(1500.25)
        );
        assert_eq!(
            sniff_raw_value(&EnumRawValue::from("2025-01-31")),
            EnumFieldValue::Text("2025-01-31".to_string())
        );
        assert!(is_date_like("31/01/2025"));
        assert!(!is_date_like("Store"));
        assert!(sniff_raw_value(&EnumRawValue::from("")).is_null());
    }
}
