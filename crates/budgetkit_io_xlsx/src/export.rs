//! One-call export entry points: file on disk or in-memory download.

use std::path::Path;

use budgetkit_summary::{EnumCompany, RowRecord};
use chrono::NaiveDate;

use crate::conf::C_MIME_XLSX;
use crate::mapping::derive_default_column_mappings;
use crate::spec::{
    SpecColumnMapping, SpecXlsxDownload, SpecXlsxExportOptions, SpecXlsxReport, XlsxExportError,
};
use crate::util::build_content_disposition;
use crate::writer::XlsxWriter;

/// Write `records` to one sheet of a new workbook at `path_file_out`.
pub fn export_records_to_xlsx(
    records: &[RowRecord],
    mappings: &[SpecColumnMapping],
    path_file_out: &Path,
    options: &SpecXlsxExportOptions,
) -> Result<SpecXlsxReport, XlsxExportError> {
    let mut writer = XlsxWriter::new(options.clone());
    let report = writer.write_records(records, mappings, None)?;
    writer.close(path_file_out)?;
    Ok(report)
}

/// Render `records` into workbook bytes with download metadata.
///
/// `file_name` gets an `.xlsx` extension when it has none.
pub fn export_records_to_download(
    records: &[RowRecord],
    mappings: &[SpecColumnMapping],
    file_name: &str,
    options: &SpecXlsxExportOptions,
) -> Result<SpecXlsxDownload, XlsxExportError> {
    let mut writer = XlsxWriter::new(options.clone());
    let report = writer.write_records(records, mappings, None)?;
    let bytes = writer.close_to_buffer()?;

    let file_name = if file_name.to_ascii_lowercase().ends_with(".xlsx") {
        file_name.to_string()
    } else {
        format!("{file_name}.xlsx")
    };
    Ok(SpecXlsxDownload {
        content_disposition: build_content_disposition(&file_name),
        file_name,
        mime_type: C_MIME_XLSX.to_string(),
        bytes,
        report,
    })
}

/// Download of a company batch with the default layout and file name.
pub fn export_company_batch(
    records: &[RowRecord],
    company: EnumCompany,
    date: NaiveDate,
    options: &SpecXlsxExportOptions,
) -> Result<SpecXlsxDownload, XlsxExportError> {
    let l_mappings = derive_default_column_mappings(company);
    export_records_to_download(
        records,
        &l_mappings,
        &derive_export_file_name(company, date),
        options,
    )
}

/// `allocation_<COMPANY>_<YYYYMMDD>.xlsx`
pub fn derive_export_file_name(company: EnumCompany, date: NaiveDate) -> String {
    format!("allocation_{}_{}.xlsx", company.code(), date.format("%Y%m%d"))
}

#[cfg(test)]
mod tests {
    use budgetkit_summary::{EnumCompany, RowRecord, populate_summary_fields};
    use chrono::NaiveDate;

    use super::{
        derive_export_file_name, export_company_batch, export_records_to_download,
        export_records_to_xlsx,
    };
    use crate::conf::C_MIME_XLSX;
    use crate::spec::{EnumColumnFormat, SpecColumnMapping, SpecXlsxExportOptions};

    fn build_batch() -> Vec<RowRecord> {
        let mut record = RowRecord::new();
        record.insert("cost_center_code", "CC1");
        record.insert("allocation_pct", 100.0);
        record.insert("executive", "N");
        record.insert("join_date", "2023-06-01");
        record.insert("le_of_month", 3.0);
        record.insert("payroll_le", 30_000.0);
        record.insert("payroll_budget", 31_000.0);
        populate_summary_fields(&mut record, 2).expect("known company");
        vec![record]
    }

    #[test]
    fn exports_file_to_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path_out = dir.path().join("out.xlsx");
        let l_mappings = vec![
            SpecColumnMapping::new("A", "cost_center_code", "Cost Center", EnumColumnFormat::Text),
            SpecColumnMapping::new("D", "join_date", "Join Date", EnumColumnFormat::Date),
        ];

        let report = export_records_to_xlsx(
            &build_batch(),
            &l_mappings,
            &path_out,
            &SpecXlsxExportOptions::default(),
        )
        .expect("export");
        assert_eq!(report.n_rows, 1);
        assert!(report.warnings.is_empty());
        assert!(path_out.exists());
    }

    #[test]
    fn download_carries_metadata() {
        let l_mappings = vec![SpecColumnMapping::new(
            "A",
            "cost_center_code",
            "Cost Center",
            EnumColumnFormat::Text,
        )];
        let download = export_records_to_download(
            &build_batch(),
            &l_mappings,
            "batch",
            &SpecXlsxExportOptions::default(),
        )
        .expect("export");
        assert_eq!(download.file_name, "batch.xlsx");
        assert_eq!(download.mime_type, C_MIME_XLSX);
        assert!(download.content_disposition.starts_with("attachment; filename=\"batch.xlsx\""));
        assert!(download.bytes.starts_with(b"PK"));
    }

    #[test]
    fn company_batch_uses_default_layout() {
        let date = NaiveDate::from_ymd_opt(2024, 10, 18).expect("date");
        assert_eq!(
            derive_export_file_name(EnumCompany::Bjc, date),
            "allocation_BJC_20241018.xlsx"
        );

        let download = export_company_batch(
            &build_batch(),
            EnumCompany::Bjc,
            date,
            &SpecXlsxExportOptions::default(),
        )
        .expect("export");
        assert_eq!(download.file_name, "allocation_BJC_20241018.xlsx");
        assert!(download.report.n_cols > 8);
        assert!(download.report.warnings.is_empty());
    }
}
