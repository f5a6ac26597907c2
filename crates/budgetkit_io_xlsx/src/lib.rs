//! `budgetkit_io_xlsx` v1:
//! Allocation batch export to styled XLSX workbooks.
//!
//! Module layout:
//! - `conf`    : Excel limits, number patterns and default presets
//! - `spec`    : formats, column mappings, options, reports, errors
//! - `util`    : pure helper functions
//! - `mapping` : column mapping validation and default layouts
//! - `bind`    : record-to-DataFrame binding and computed columns
//! - `writer`  : stateful workbook writer
//! - `export`  : one-call file and download exports
pub mod bind;
pub mod conf;
pub mod export;
pub mod mapping;
pub mod spec;
pub mod util;
pub mod writer;

pub use bind::{apply_computed_rule, bind_records_to_dataframe};
pub use conf::{C_MIME_XLSX, N_LEN_EXCEL_SHEET_NAME_MAX, N_NCOLS_EXCEL_MAX, N_NROWS_EXCEL_MAX};
pub use export::{
    derive_export_file_name, export_company_batch, export_records_to_download,
    export_records_to_xlsx,
};
pub use mapping::{derive_default_column_mappings, validate_column_mappings};
pub use spec::{
    EnumCellValue, EnumColumnFormat, EnumComputedRule, SpecAutofitCellsPolicy, SpecCellFormat,
    SpecColumnMapping, SpecXlsxDownload, SpecXlsxExportOptions, SpecXlsxReport, XlsxExportError,
};
pub use util::{
    build_content_disposition, format_column_letter, parse_column_letter, sanitize_sheet_name,
};
pub use writer::XlsxWriter;
