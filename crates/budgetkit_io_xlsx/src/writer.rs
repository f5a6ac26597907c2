//! XLSX writer kernel that turns mapped row records into workbook sheets.

use std::collections::BTreeSet;
use std::path::Path;

use budgetkit_summary::RowRecord;
use polars::prelude::AnyValue;
use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, Workbook, Worksheet};
use tracing::info;

use crate::bind::bind_records_to_dataframe;
use crate::conf::{C_NUM_FORMAT_TEXT, N_LEN_EXCEL_SHEET_NAME_MAX, N_NROWS_EXCEL_MAX};
use crate::mapping::validate_column_mappings;
use crate::spec::{
    EnumCellValue, EnumColumnFormat, SpecAutofitCellsPolicy, SpecCellFormat, SpecColumnMapping,
    SpecXlsxExportOptions, SpecXlsxReport, XlsxExportError,
};
use crate::util::{estimate_unicode_string_width, sanitize_sheet_name};

/// Stateful workbook writer.
///
/// The workbook is buffered in memory until [`Self::close`] or
/// [`Self::close_to_buffer`] is called.
pub struct XlsxWriter {
    workbook: Workbook,
    options: SpecXlsxExportOptions,
    set_sheet_names_existing: BTreeSet<String>,
    l_reports: Vec<SpecXlsxReport>,
    if_closed: bool,
}

impl XlsxWriter {
    pub fn new(options: SpecXlsxExportOptions) -> Self {
        Self {
            workbook: Workbook::new(),
            options,
            set_sheet_names_existing: BTreeSet::new(),
            l_reports: Vec::new(),
            if_closed: false,
        }
    }

    /// Return immutable snapshot of per-sheet write reports.
    pub fn report(&self) -> Vec<SpecXlsxReport> {
        self.l_reports.clone()
    }

    /// Flush workbook to disk. Idempotent.
    pub fn close(&mut self, path_file_out: &Path) -> Result<(), XlsxExportError> {
        if self.if_closed {
            return Ok(());
        }
        self.workbook.save(path_file_out)?;
        self.if_closed = true;
        info!(
            path = %path_file_out.display(),
            sheets = self.l_reports.len(),
            "workbook written"
        );
        Ok(())
    }

    /// Serialize the workbook to bytes and close the writer.
    pub fn close_to_buffer(&mut self) -> Result<Vec<u8>, XlsxExportError> {
        if self.if_closed {
            return Err(XlsxExportError::WriterClosed);
        }
        let v_bytes = self.workbook.save_to_buffer()?;
        self.if_closed = true;
        info!(
            bytes = v_bytes.len(),
            sheets = self.l_reports.len(),
            "workbook serialized"
        );
        Ok(v_bytes)
    }

    /// Write one sheet: a header row from the mapping headers, then one row
    /// per record. Unmapped columns stay blank.
    ///
    /// `sheet_name` defaults to the writer's sheet name.
    pub fn write_records(
        &mut self,
        records: &[RowRecord],
        mappings: &[SpecColumnMapping],
        sheet_name: Option<&str>,
    ) -> Result<SpecXlsxReport, XlsxExportError> {
        if self.if_closed {
            return Err(XlsxExportError::WriterClosed);
        }
        validate_policy_autofit(&self.options.policy_autofit)?;
        if records.len() >= N_NROWS_EXCEL_MAX {
            return Err(XlsxExportError::TooManyRows(records.len()));
        }

        let l_resolved = validate_column_mappings(mappings)?;
        let mut report = SpecXlsxReport::default();
        let df_data = bind_records_to_dataframe(records, &l_resolved, &mut report)?;

        let c_sheet_name = sanitize_sheet_name(
            sheet_name.unwrap_or(self.options.sheet_name.as_str()),
            "_",
        );
        let sheet_name_unique = self.derive_unique_sheet_name(&c_sheet_name);

        let fmt_header = derive_rust_xlsx_format(&self.options.fmt_header);
        let worksheet = self.workbook.add_worksheet();
        worksheet.set_name(&sheet_name_unique)?;

        for (n_pos, (n_idx_col, mapping)) in l_resolved.iter().enumerate() {
            let col = &df_data.get_columns()[n_pos];
            let if_is_numeric_col = col.dtype().is_numeric();
            let fmt_spec = derive_column_format(
                &self.options.fmt_body,
                mapping,
                if_is_numeric_col,
                &self.options.highlight_color,
            );
            let fmt_col = derive_rust_xlsx_format(&fmt_spec);
            let n_col = cast_col_num(*n_idx_col)?;

            worksheet.write_string_with_format(0, n_col, &mapping.header, &fmt_header)?;
            let mut n_width_max = estimate_unicode_string_width(&mapping.header);

            for n_row in 0..df_data.height() {
                let value = derive_cell_value_from_any_value(col.get(n_row)?);
                if self
                    .options
                    .policy_autofit
                    .height_body_inferred_max
                    .is_none_or(|n_max| n_row < n_max)
                {
                    n_width_max =
                        usize::max(n_width_max, estimate_width_len(&value, mapping.format));
                }
                write_cell_with_format(
                    worksheet,
                    cast_row_num(n_row + 1)?,
                    n_col,
                    &value,
                    &fmt_col,
                )?;
            }

            let n_width = match mapping.width {
                Some(n_width) => n_width,
                None => derive_autofit_width(n_width_max, &self.options.policy_autofit),
            };
            worksheet.set_column_width(n_col, n_width)?;
        }

        if self.options.if_freeze_header {
            worksheet.set_freeze_panes(1, 0)?;
        }

        report.sheet_name = sheet_name_unique;
        report.n_rows = df_data.height();
        report.n_cols = l_resolved.len();
        info!(
            sheet = %report.sheet_name,
            rows = report.n_rows,
            cols = report.n_cols,
            warnings = report.warnings.len(),
            "sheet written"
        );
        self.l_reports.push(report.clone());
        Ok(report)
    }

    fn derive_unique_sheet_name(&mut self, name: &str) -> String {
        if !self.set_sheet_names_existing.contains(name) {
            self.set_sheet_names_existing.insert(name.to_string());
            return name.to_string();
        }

        let base_name: String = name
            .chars()
            .take(usize::max(1, N_LEN_EXCEL_SHEET_NAME_MAX - 3))
            .collect();

        let mut n_idx = 2usize;
        loop {
            let candidate: String = format!("{base_name}__{n_idx}")
                .chars()
                .take(N_LEN_EXCEL_SHEET_NAME_MAX)
                .collect();
            if !self.set_sheet_names_existing.contains(&candidate) {
                self.set_sheet_names_existing.insert(candidate.clone());
                return candidate;
            }
            n_idx += 1;
        }
    }
}

/// Body format of one column: base format, number pattern, highlight fill.
///
/// Columns that fell back to text use the text pattern.
pub fn derive_column_format(
    fmt_body: &SpecCellFormat,
    mapping: &SpecColumnMapping,
    if_is_numeric_col: bool,
    highlight_color: &str,
) -> SpecCellFormat {
    let c_pattern = if if_is_numeric_col {
        mapping.format.pattern()
    } else {
        C_NUM_FORMAT_TEXT
    };
    let mut fmt_col = fmt_body.with_(SpecCellFormat {
        num_format: Some(c_pattern.to_string()),
        align: if if_is_numeric_col && !mapping.format.is_temporal() {
            Some("right".to_string())
        } else {
            None
        },
        ..Default::default()
    });
    if mapping.highlight {
        fmt_col.bg_color = Some(highlight_color.to_string());
    }
    fmt_col
}

/// Estimate displayed width units for one cell in `format`.
pub fn estimate_width_len(value: &EnumCellValue, format: EnumColumnFormat) -> usize {
    match value {
        EnumCellValue::None => 0,
        EnumCellValue::String(s) => estimate_unicode_string_width(s),
        EnumCellValue::Number(n) => match format {
            EnumColumnFormat::Date => 10,
            EnumColumnFormat::Datetime => 16,
            EnumColumnFormat::Percentage => format!("{:.2}%", n * 100.0).len(),
            EnumColumnFormat::Decimal => estimate_grouped_len(*n) + 3,
            EnumColumnFormat::Number | EnumColumnFormat::Text => estimate_grouped_len(*n),
        },
    }
}

fn estimate_grouped_len(n: f64) -> usize {
    let c_digits = format!("{:.0}", n.abs());
    let n_len = c_digits.len();
    n_len + n_len.saturating_sub(1) / 3 + usize::from(n < 0.0)
}

fn derive_autofit_width(n_width_recorded: usize, policy: &SpecAutofitCellsPolicy) -> f64 {
    let n_min = usize::max(1, policy.width_cell_min);
    let n_max = usize::min(255, usize::max(n_min, policy.width_cell_max));
    usize::min(n_max, usize::max(n_min, n_width_recorded + policy.width_cell_padding)) as f64
}

fn validate_policy_autofit(policy_autofit: &SpecAutofitCellsPolicy) -> Result<(), XlsxExportError> {
    if policy_autofit.width_cell_min == 0 {
        return Err(XlsxExportError::InvalidPolicy(
            "width_cell_min must be >= 1.".to_string(),
        ));
    }
    if policy_autofit.width_cell_max < policy_autofit.width_cell_min {
        return Err(XlsxExportError::InvalidPolicy(
            "width_cell_max must be >= width_cell_min.".to_string(),
        ));
    }
    Ok(())
}

fn derive_cell_value_from_any_value(value: AnyValue<'_>) -> EnumCellValue {
    match value {
        AnyValue::Null => EnumCellValue::None,
        AnyValue::String(val) => EnumCellValue::String(val.to_string()),
        AnyValue::StringOwned(val) => EnumCellValue::String(val.to_string()),
        AnyValue::Float64(val) => EnumCellValue::Number(val),
        AnyValue::Float32(val) => EnumCellValue::Number(val as f64),
        AnyValue::Int64(val) => EnumCellValue::Number(val as f64),
        AnyValue::Int32(val) => EnumCellValue::Number(val as f64),
        _ => EnumCellValue::String(value.to_string()),
    }
}

fn write_cell_with_format(
    worksheet: &mut Worksheet,
    row_num: u32,
    col_num: u16,
    value: &EnumCellValue,
    format: &Format,
) -> Result<(), XlsxExportError> {
    match value {
        EnumCellValue::None => {
            worksheet.write_blank(row_num, col_num, format)?;
        }
        EnumCellValue::String(val) => {
            worksheet.write_string_with_format(row_num, col_num, val, format)?;
        }
        EnumCellValue::Number(val) => {
            worksheet.write_number_with_format(row_num, col_num, *val, format)?;
        }
    }
    Ok(())
}

fn derive_rust_xlsx_format(spec: &SpecCellFormat) -> Format {
    let mut format = Format::new();

    if let Some(val) = &spec.font_name {
        format = format.set_font_name(val.clone());
    }
    if let Some(val) = spec.font_size {
        format = format.set_font_size(val as f64);
    }
    if spec.bold.unwrap_or(false) {
        format = format.set_bold();
    }

    if let Some(val) = &spec.align
        && let Some(align) = derive_format_align(val)
    {
        format = format.set_align(align);
    }
    if let Some(val) = &spec.valign
        && let Some(align) = derive_format_align(val)
    {
        format = format.set_align(align);
    }

    if let Some(val) = &spec.num_format {
        format = format.set_num_format(val.clone());
    }
    if let Some(val) = &spec.bg_color {
        format = format.set_background_color(val.as_str());
    }
    if let Some(val) = &spec.font_color {
        format = format.set_font_color(val.as_str());
    }
    if let Some(val) = spec.border {
        format = format.set_border(derive_format_border(val));
    }
    if spec.text_wrap.unwrap_or(false) {
        format = format.set_text_wrap();
    }

    format
}

fn derive_format_border(border: i64) -> FormatBorder {
    match border {
        1 => FormatBorder::Thin,
        2 => FormatBorder::Medium,
        3 => FormatBorder::Dashed,
        4 => FormatBorder::Dotted,
        5 => FormatBorder::Thick,
        6 => FormatBorder::Double,
        7 => FormatBorder::Hair,
        _ => FormatBorder::None,
    }
}

fn derive_format_align(align: &str) -> Option<FormatAlign> {
    let value = align.trim().to_ascii_lowercase();
    match value.as_str() {
        "general" => Some(FormatAlign::General),
        "left" => Some(FormatAlign::Left),
        "center" => Some(FormatAlign::Center),
        "right" => Some(FormatAlign::Right),
        "top" => Some(FormatAlign::Top),
        "bottom" => Some(FormatAlign::Bottom),
        "vcenter" | "vertical_center" => Some(FormatAlign::VerticalCenter),
        _ => None,
    }
}

fn cast_row_num(value: usize) -> Result<u32, XlsxExportError> {
    u32::try_from(value).map_err(|_| XlsxExportError::TooManyRows(value))
}

fn cast_col_num(value: usize) -> Result<u16, XlsxExportError> {
    u16::try_from(value).map_err(|_| XlsxExportError::InvalidColumnLetter(value.to_string()))
}
