//! Shared XLSX specification models, options and errors.

use polars::prelude::PolarsError;
use rust_xlsxwriter::XlsxError;
use thiserror::Error;

use crate::conf::{
    C_COLOR_HIGHLIGHT_DEFAULT, C_NUM_FORMAT_DATE, C_NUM_FORMAT_DATETIME, C_NUM_FORMAT_DECIMAL,
    C_NUM_FORMAT_NUMBER, C_NUM_FORMAT_PERCENTAGE, C_NUM_FORMAT_TEXT, C_SHEET_NAME_DEFAULT,
    derive_default_body_format, derive_default_header_format,
};

////////////////////////////////////////////////////////////////////////////////
// #region CellFormatSpecification

/// Cell format specification.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct SpecCellFormat {
    /// Font family name.
    pub font_name: Option<String>,
    /// Font size in points.
    pub font_size: Option<i64>,
    /// Bold style.
    pub bold: Option<bool>,

    /// Horizontal alignment.
    pub align: Option<String>,
    /// Vertical alignment.
    pub valign: Option<String>,
    /// Border style for all sides.
    pub border: Option<i64>,
    /// Text wrap.
    pub text_wrap: Option<bool>,

    /// Number format code.
    pub num_format: Option<String>,
    /// Background fill color.
    pub bg_color: Option<String>,
    /// Font color.
    pub font_color: Option<String>,
}

impl SpecCellFormat {
    /// Return a new format by overlaying `patch` onto `self`.
    pub fn with_(&self, patch: SpecCellFormat) -> SpecCellFormat {
        self.merge(&patch)
    }

    /// Merge two formats with right-side non-`None` overwrite semantics.
    pub fn merge(&self, other: &SpecCellFormat) -> SpecCellFormat {
        SpecCellFormat {
            font_name: other.font_name.clone().or_else(|| self.font_name.clone()),
            font_size: other.font_size.or(self.font_size),
            bold: other.bold.or(self.bold),
            align: other.align.clone().or_else(|| self.align.clone()),
            valign: other.valign.clone().or_else(|| self.valign.clone()),
            border: other.border.or(self.border),
            text_wrap: other.text_wrap.or(self.text_wrap),
            num_format: other.num_format.clone().or_else(|| self.num_format.clone()),
            bg_color: other.bg_color.clone().or_else(|| self.bg_color.clone()),
            font_color: other.font_color.clone().or_else(|| self.font_color.clone()),
        }
    }
}

/// Normalized cell value during the write pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum EnumCellValue {
    /// Missing/blank value.
    None,
    /// Text value.
    String(String),
    /// Numeric value (dates already converted to serial numbers).
    Number(f64),
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region ColumnMapping

/// Display format of one exported column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EnumColumnFormat {
    #[default]
    Text,
    /// Integer with thousands separator.
    Number,
    /// Two decimals with thousands separator.
    Decimal,
    /// Stored percent values above 1 are divided by 100.
    Percentage,
    Date,
    Datetime,
}

impl EnumColumnFormat {
    /// Excel number format pattern.
    pub fn pattern(self) -> &'static str {
        match self {
            Self::Text => C_NUM_FORMAT_TEXT,
            Self::Number => C_NUM_FORMAT_NUMBER,
            Self::Decimal => C_NUM_FORMAT_DECIMAL,
            Self::Percentage => C_NUM_FORMAT_PERCENTAGE,
            Self::Date => C_NUM_FORMAT_DATE,
            Self::Datetime => C_NUM_FORMAT_DATETIME,
        }
    }

    /// Whether cells are written as numbers.
    pub fn is_numeric(self) -> bool {
        !matches!(self, Self::Text)
    }

    /// Whether cells are written as Excel serial dates.
    pub fn is_temporal(self) -> bool {
        matches!(self, Self::Date | Self::Datetime)
    }
}

/// Column value computed from the record instead of read from one field.
#[derive(Debug, Clone, PartialEq)]
pub enum EnumComputedRule {
    /// `when_true` if `field`'s text equals `value` (case-insensitive), else
    /// `when_false`.
    FlagEquals {
        field: String,
        value: String,
        when_true: String,
        when_false: String,
    },
    /// Sum of numeric fields; non-numeric values count as 0.
    Sum { fields: Vec<String> },
    /// 1-based position of the record in the export.
    RowNumber,
}

/// One exported column.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecColumnMapping {
    /// Column letter(s), `A..=XFD`.
    pub column: String,
    /// Source record field; also the label of computed columns.
    pub field: String,
    pub header: String,
    pub format: EnumColumnFormat,
    /// Fixed width in character units; autofit when `None`.
    pub width: Option<f64>,
    pub highlight: bool,
    pub computed: Option<EnumComputedRule>,
}

impl SpecColumnMapping {
    pub fn new(
        column: impl Into<String>,
        field: impl Into<String>,
        header: impl Into<String>,
        format: EnumColumnFormat,
    ) -> Self {
        Self {
            column: column.into(),
            field: field.into(),
            header: header.into(),
            format,
            width: None,
            highlight: false,
            computed: None,
        }
    }

    pub fn with_width(mut self, width: f64) -> Self {
        self.width = Some(width);
        self
    }

    pub fn with_highlight(mut self) -> Self {
        self.highlight = true;
        self
    }

    pub fn with_computed(mut self, rule: EnumComputedRule) -> Self {
        self.computed = Some(rule);
        self
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region ExportOptions

/// Autofit policy for columns without a fixed width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecAutofitCellsPolicy {
    /// Max body rows inspected for width inference.
    pub height_body_inferred_max: Option<usize>,
    /// Minimum final width.
    pub width_cell_min: usize,
    /// Maximum final width.
    pub width_cell_max: usize,
    /// Width padding added after inference.
    pub width_cell_padding: usize,
}

impl Default for SpecAutofitCellsPolicy {
    fn default() -> Self {
        Self {
            height_body_inferred_max: Some(20_000),
            width_cell_min: 8,
            width_cell_max: 60,
            width_cell_padding: 2,
        }
    }
}

/// Writer-wide export options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecXlsxExportOptions {
    pub sheet_name: String,
    pub fmt_header: SpecCellFormat,
    /// Base format every column format overlays.
    pub fmt_body: SpecCellFormat,
    /// Fill color of highlighted columns.
    pub highlight_color: String,
    /// Freeze the header row.
    pub if_freeze_header: bool,
    pub policy_autofit: SpecAutofitCellsPolicy,
}

impl Default for SpecXlsxExportOptions {
    fn default() -> Self {
        Self {
            sheet_name: C_SHEET_NAME_DEFAULT.to_string(),
            fmt_header: derive_default_header_format(),
            fmt_body: derive_default_body_format(),
            highlight_color: C_COLOR_HIGHLIGHT_DEFAULT.to_string(),
            if_freeze_header: true,
            policy_autofit: SpecAutofitCellsPolicy::default(),
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region ReportSpecification

/// Per-sheet write report.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpecXlsxReport {
    /// Actual unique sheet name in the workbook.
    pub sheet_name: String,
    /// Body rows written.
    pub n_rows: usize,
    /// Mapped columns written.
    pub n_cols: usize,
    /// Non-fatal warnings.
    pub warnings: Vec<String>,
}

impl SpecXlsxReport {
    /// Add a warning message.
    pub fn warn(&mut self, msg: impl AsRef<str>) {
        self.warnings.push(msg.as_ref().to_string());
    }
}

/// In-memory workbook ready to be sent as a download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecXlsxDownload {
    pub file_name: String,
    pub mime_type: String,
    /// `Content-Disposition` header value.
    pub content_disposition: String,
    pub bytes: Vec<u8>,
    pub report: SpecXlsxReport,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Errors

#[derive(Debug, Error)]
pub enum XlsxExportError {
    #[error("Invalid column letter {0:?}; expected A..XFD.")]
    InvalidColumnLetter(String),
    #[error("Column {0} is mapped more than once.")]
    DuplicateColumn(String),
    #[error("No columns are mapped.")]
    EmptyMapping,
    #[error("Too many rows: {0} exceeds the worksheet limit.")]
    TooManyRows(usize),
    #[error("Cannot write after close().")]
    WriterClosed,
    #[error("Invalid autofit policy: {0}")]
    InvalidPolicy(String),
    #[error("dataframe error: {0}")]
    DataFrame(#[from] PolarsError),
    #[error("xlsx write error: {0}")]
    Xlsx(#[from] XlsxError),
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
