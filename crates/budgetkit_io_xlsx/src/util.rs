//! Stateless helper utilities used by the XLSX exporter.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::conf::{
    N_LEN_EXCEL_SHEET_NAME_MAX, N_NCOLS_EXCEL_MAX, TUP_DATE_FORMATS_PARSED,
    TUP_DATETIME_FORMATS_PARSED, TUP_EXCEL_ILLEGAL,
};
use crate::spec::{EnumColumnFormat, XlsxExportError};

////////////////////////////////////////////////////////////////////////////////
// #region ColumnLetters

/// Parse a column letter (`"A"`, `"AA"`, `"XFD"`) into a zero-based index.
pub fn parse_column_letter(column: &str) -> Result<usize, XlsxExportError> {
    let c_column = column.trim().to_ascii_uppercase();
    if c_column.is_empty() || c_column.len() > 3 {
        return Err(XlsxExportError::InvalidColumnLetter(column.to_string()));
    }

    let mut n_idx = 0usize;
    for chr in c_column.chars() {
        if !chr.is_ascii_uppercase() {
            return Err(XlsxExportError::InvalidColumnLetter(column.to_string()));
        }
        n_idx = n_idx * 26 + (chr as usize - 'A' as usize + 1);
    }

    if n_idx > N_NCOLS_EXCEL_MAX {
        return Err(XlsxExportError::InvalidColumnLetter(column.to_string()));
    }
    Ok(n_idx - 1)
}

/// Format a zero-based column index as letters.
pub fn format_column_letter(col_idx: usize) -> String {
    let mut l_chars = Vec::new();
    let mut n_rest = col_idx + 1;
    while n_rest > 0 {
        let n_rem = (n_rest - 1) % 26;
        l_chars.push((b'A' + n_rem as u8) as char);
        n_rest = (n_rest - 1) / 26;
    }
    l_chars.iter().rev().collect()
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region CellValueConversion

/// Convert a datetime to an Excel serial number (days since 1899-12-30).
pub fn derive_excel_serial(dt: NaiveDateTime) -> Option<f64> {
    let dt_epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let n_seconds = (dt - dt_epoch).num_seconds();
    Some(n_seconds as f64 / 86_400.0)
}

/// Parse date or datetime text into an Excel serial number.
///
/// Date columns drop the time part.
pub fn parse_excel_serial(text: &str, format: EnumColumnFormat) -> Option<f64> {
    let c_text = text.trim();
    if c_text.is_empty() {
        return None;
    }

    let dt = parse_naive_datetime(c_text)?;
    let dt = match format {
        EnumColumnFormat::Date => dt.date().and_hms_opt(0, 0, 0)?,
        _ => dt,
    };
    derive_excel_serial(dt)
}

fn parse_naive_datetime(text: &str) -> Option<NaiveDateTime> {
    for c_fmt in TUP_DATETIME_FORMATS_PARSED {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, c_fmt) {
            return Some(dt);
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_local());
    }
    TUP_DATE_FORMATS_PARSED
        .iter()
        .find_map(|c_fmt| NaiveDate::parse_from_str(text, c_fmt).ok())
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

/// Stored percentages above 1 are whole percents (`50` means 50%).
pub fn normalize_percentage(value: f64) -> f64 {
    if value > 1.0 { value / 100.0 } else { value }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region TextUtils

/// Replace invalid chars and trim to a valid Excel sheet name.
pub fn sanitize_sheet_name(name: &str, replace_to: &str) -> String {
    let mut c_name = name.to_string();
    for c_illegal in TUP_EXCEL_ILLEGAL {
        c_name = c_name.replace(c_illegal, replace_to);
    }
    c_name = c_name.trim().trim_matches('\'').to_string();
    if c_name.is_empty() {
        c_name = "Sheet".to_string();
    }

    c_name.chars().take(N_LEN_EXCEL_SHEET_NAME_MAX).collect()
}

/// Rough display width of text; non-ASCII glyphs count wider.
pub fn estimate_unicode_string_width(s: &str) -> usize {
    let n_ascii = s.chars().filter(|chr| chr.is_ascii()).count();
    let n_non_ascii = s.chars().count().saturating_sub(n_ascii);
    n_ascii + (n_non_ascii as f64 * 1.6).round() as usize
}

/// Header label derived from a snake_case field name
/// (`"sb_bonus_provision_le"` becomes `"S&B Bonus Provision LE"`).
pub fn derive_header_from_field(field: &str) -> String {
    field
        .split('_')
        .filter(|part| !part.is_empty())
        .map(|part| match part {
            "le" => "LE".to_string(),
            "sb" => "S&B".to_string(),
            "pct" => "%".to_string(),
            _ => {
                let mut chars = part.chars();
                match chars.next() {
                    Some(chr) => chr.to_uppercase().chain(chars).collect(),
                    None => String::new(),
                }
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// `Content-Disposition` value with an ASCII fallback and an RFC 5987
/// UTF-8 file name.
pub fn build_content_disposition(file_name: &str) -> String {
    let c_ascii: String = file_name
        .chars()
        .map(|chr| {
            if chr.is_ascii() && !chr.is_ascii_control() && chr != '"' && chr != '\\' {
                chr
            } else {
                '_'
            }
        })
        .collect();
    format!(
        "attachment; filename=\"{c_ascii}\"; filename*=UTF-8''{}",
        encode_rfc5987(file_name)
    )
}

fn encode_rfc5987(text: &str) -> String {
    let mut c_out = String::with_capacity(text.len());
    for byte in text.bytes() {
        if byte.is_ascii_alphanumeric() || b"!#$&+-.^_`|~".contains(&byte) {
            c_out.push(byte as char);
        } else {
            c_out.push_str(&format!("%{byte:02X}"));
        }
    }
    c_out
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_letters_parse_and_format() {
        assert_eq!(parse_column_letter("A").expect("A"), 0);
        assert_eq!(parse_column_letter("z").expect("z"), 25);
        assert_eq!(parse_column_letter("AA").expect("AA"), 26);
        assert_eq!(parse_column_letter("XFD").expect("XFD"), 16_383);
        assert!(parse_column_letter("XFE").is_err());
        assert!(parse_column_letter("").is_err());
        assert!(parse_column_letter("A1").is_err());

        for n_idx in [0, 25, 26, 701, 702, 16_383] {
            assert_eq!(
                parse_column_letter(&format_column_letter(n_idx)).expect("parse"),
                n_idx
            );
        }
        assert_eq!(format_column_letter(27), "AB");
    }

    #[test]
    fn dates_become_excel_serials() {
        assert_eq!(
            parse_excel_serial("2024-01-01", EnumColumnFormat::Date),
            Some(45_292.0)
        );
        assert_eq!(
            parse_excel_serial("01/01/2024", EnumColumnFormat::Date),
            Some(45_292.0)
        );
        assert_eq!(
            parse_excel_serial("2024-01-01T12:00:00", EnumColumnFormat::Datetime),
            Some(45_292.5)
        );
        assert_eq!(
            parse_excel_serial("2024-01-01 18:00", EnumColumnFormat::Date),
            Some(45_292.0)
        );
        assert_eq!(parse_excel_serial("soon", EnumColumnFormat::Date), None);
        assert_eq!(parse_excel_serial("  ", EnumColumnFormat::Date), None);
    }

    #[test]
    fn percentages_above_one_are_scaled() {
        assert_eq!(normalize_percentage(50.0), 0.5);
        assert_eq!(normalize_percentage(0.25), 0.25);
        assert_eq!(normalize_percentage(1.0), 1.0);
    }

    #[test]
    fn headers_and_sheet_names() {
        assert_eq!(
            derive_header_from_field("sb_bonus_provision_le"),
            "S&B Bonus Provision LE"
        );
        assert_eq!(derive_header_from_field("allocation_pct"), "Allocation %");
        assert_eq!(sanitize_sheet_name("Q1/Q2 [draft]", "_"), "Q1_Q2 _draft_");
        assert_eq!(sanitize_sheet_name("   ", "_"), "Sheet");
    }

    #[test]
    fn content_disposition_encodes_utf8() {
        assert_eq!(
            build_content_disposition("allocation.xlsx"),
            "attachment; filename=\"allocation.xlsx\"; filename*=UTF-8''allocation.xlsx"
        );
        let c_value = build_content_disposition("งบ 2024.xlsx");
        assert!(c_value.starts_with("attachment; filename=\"__ 2024.xlsx\""));
        assert!(c_value.contains("%E0%B8%87"));
        assert!(c_value.contains("%202024.xlsx"));
    }
}
