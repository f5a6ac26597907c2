//! XLSX constants and default preset factories.

use crate::spec::SpecCellFormat;

/// Excel worksheet maximum row count.
pub const N_NROWS_EXCEL_MAX: usize = 1_048_576;
/// Excel worksheet maximum column count (`A..=XFD`).
pub const N_NCOLS_EXCEL_MAX: usize = 16_384;
/// Excel sheet name maximum length.
pub const N_LEN_EXCEL_SHEET_NAME_MAX: usize = 31;
/// Characters not allowed in sheet names.
pub const TUP_EXCEL_ILLEGAL: [&str; 7] = ["*", ":", "?", "/", "\\", "[", "]"];

/// MIME type of an `.xlsx` download.
pub const C_MIME_XLSX: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

pub const C_NUM_FORMAT_TEXT: &str = "@";
pub const C_NUM_FORMAT_NUMBER: &str = "#,##0";
pub const C_NUM_FORMAT_DECIMAL: &str = "#,##0.00";
pub const C_NUM_FORMAT_PERCENTAGE: &str = "0.00%";
pub const C_NUM_FORMAT_DATE: &str = "dd/mm/yyyy";
pub const C_NUM_FORMAT_DATETIME: &str = "dd/mm/yyyy hh:mm";

/// Text layouts accepted by date columns.
pub const TUP_DATE_FORMATS_PARSED: [&str; 3] = ["%Y-%m-%d", "%d/%m/%Y", "%Y/%m/%d"];
/// Text layouts accepted by datetime columns (date layouts are accepted too).
pub const TUP_DATETIME_FORMATS_PARSED: [&str; 5] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Default sheet name of exported batches.
pub const C_SHEET_NAME_DEFAULT: &str = "Allocation";
/// Fill color of highlighted columns.
pub const C_COLOR_HIGHLIGHT_DEFAULT: &str = "#FFF2CC";

/// Default header format.
pub fn derive_default_header_format() -> SpecCellFormat {
    derive_default_body_format().with_(SpecCellFormat {
        bold: Some(true),
        align: Some("center".to_string()),
        bg_color: Some("#D9E1F2".to_string()),
        text_wrap: Some(true),
        ..Default::default()
    })
}

/// Default body format; column formats overlay their number pattern on it.
pub fn derive_default_body_format() -> SpecCellFormat {
    SpecCellFormat {
        font_name: Some("Calibri".to_string()),
        font_size: Some(11),
        border: Some(1),
        valign: Some("vcenter".to_string()),
        ..Default::default()
    }
}
