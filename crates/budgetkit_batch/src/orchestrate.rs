//! Sequential pipelines over [`AllocationApi`]: dependent dropdown loading,
//! benefit estimation and the validate/collect/save flow.

use std::collections::BTreeMap;

use budgetkit_collect::util::sniff_raw_value;
use budgetkit_collect::{EnumRawValue, SpecFieldConfigTable, check_field_naming, collect_row};
use budgetkit_summary::{EnumCompany, RowRecord, calculate_summary, write_summary_fields};
use tracing::{error, info, warn};

use crate::api::{
    AllocationApi, EnumOptionList, SpecAllocationShare, SpecBatchConfiguration,
    SpecBenefitRequest,
};
use crate::conf::{
    C_FIELD_ALLOCATION_PCT, C_FIELD_COMPANY_ID, C_FIELD_COST_CENTER_CODE, C_FIELD_ROW_ID,
    TUP_RECORD_SOURCE_FIELDS,
};
use crate::registry::AllocationContext;
use crate::spec::{
    BatchError, EnumBatchIssue, SpecDropdownOptions, SpecSaveOptions, SpecSaveOutcome,
};
use crate::validate::validate_batch;

////////////////////////////////////////////////////////////////////////////////
// #region Dropdowns

/// Load the company list, then the lists that depend on the chosen company.
///
/// `company_id` defaults to the first company returned.
pub fn load_dependent_options<A: AllocationApi + ?Sized>(
    api: &mut A,
    company_id: Option<&str>,
) -> Result<SpecDropdownOptions, BatchError> {
    let companies = api.list_options(EnumOptionList::Companies, &BTreeMap::new())?;

    let company_id = match company_id {
        Some(company_id) => Some(company_id.to_string()),
        None => companies.first().map(|option| option.value.clone()),
    };
    let Some(company_id) = company_id else {
        return Ok(SpecDropdownOptions {
            companies,
            ..Default::default()
        });
    };

    let mut dict_params = BTreeMap::new();
    dict_params.insert(C_FIELD_COMPANY_ID.to_string(), company_id.clone());

    let mut options = SpecDropdownOptions {
        companies,
        company_id: Some(company_id),
        ..Default::default()
    };
    for list in [
        EnumOptionList::CostCenters,
        EnumOptionList::JobBands,
        EnumOptionList::EmployeeTypes,
    ] {
        let l_options = api.list_options(list, &dict_params)?;
        info!(list = list.as_str(), count = l_options.len(), "dropdown loaded");
        match list {
            EnumOptionList::CostCenters => options.cost_centers = l_options,
            EnumOptionList::JobBands => options.job_bands = l_options,
            EnumOptionList::EmployeeTypes => options.employee_types = l_options,
            EnumOptionList::Companies | EnumOptionList::Positions => {}
        }
    }
    Ok(options)
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region BenefitEstimates

/// Ask the calculation endpoint for every selected cost center at once and
/// store the returned fields on the matching rows.
///
/// Returns the number of rows updated.
pub fn fetch_benefit_estimates<A: AllocationApi + ?Sized>(
    ctx: &mut AllocationContext,
    table: &SpecFieldConfigTable,
    api: &mut A,
) -> Result<usize, BatchError> {
    let company = resolve_batch_company(ctx)?;
    let master = ctx.master().ok_or(BatchError::NoMaster)?;
    let shared = collect_row(&master.raw_field_pairs(), table)?.record;

    let l_codes: Vec<String> = ctx
        .rows()
        .filter_map(|row| row.cost_center_code.clone())
        .collect();
    if l_codes.is_empty() {
        return Ok(0);
    }

    let request = SpecBenefitRequest {
        company_id: company.id(),
        cost_center_codes: l_codes,
        shared,
    };
    let l_estimates = api.calculate_benefits(&request).inspect_err(|err| {
        error!(company = %company, "benefit calculation failed: {err}");
    })?;

    let dict_estimates: BTreeMap<&str, &RowRecord> = l_estimates
        .iter()
        .map(|estimate| (estimate.cost_center_code.as_str(), &estimate.fields))
        .collect();
    let l_updates: Vec<(u32, RowRecord)> = ctx
        .rows()
        .filter_map(|row| {
            let code = row.cost_center_code.as_deref()?;
            dict_estimates
                .get(code)
                .map(|fields| (row.row_id, (*fields).clone()))
        })
        .collect();

    let n_updated = l_updates.len();
    for (row_id, fields) in l_updates {
        ctx.set_benefit_fields(row_id, fields)?;
    }
    info!(company = %company, rows = n_updated, "benefit estimates applied");
    Ok(n_updated)
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Save

/// Validate, collect and save the batch.
///
/// Steps run strictly in order and stop at the first failure:
/// 1. batch validation ([`BatchError::Validation`]),
/// 2. dto naming check ([`BatchError::FieldMapping`]),
/// 3. master-to-child copy, row collection and summary fields,
/// 4. the batch-save call ([`BatchError::Api`]).
///
/// The auxiliary configuration save runs last; its failure is logged and
/// returned as a warning on the outcome.
pub fn save_batch<A: AllocationApi + ?Sized>(
    ctx: &mut AllocationContext,
    table: &SpecFieldConfigTable,
    api: &mut A,
    options: &SpecSaveOptions,
) -> Result<SpecSaveOutcome, BatchError> {
    let l_issues = validate_batch(ctx);
    if !l_issues.is_empty() {
        warn!(issues = l_issues.len(), "batch validation failed");
        return Err(BatchError::Validation(l_issues));
    }

    let naming = check_field_naming(table);
    if !naming.is_ok() {
        warn!(issues = naming.issues.len(), "field mapping check failed");
        return Err(BatchError::FieldMapping(naming.format_diagnostic()));
    }

    ctx.apply_master_to_children(&options.shared_fields)?;
    let company = resolve_batch_company(ctx)?;
    let (records, mut warnings) = collect_batch_records(ctx, table, company)?;

    let ack = api.save_batch(&records).inspect_err(|err| {
        error!(rows = records.len(), "batch save failed: {err}");
    })?;
    info!(
        rows = records.len(),
        saved = ack.saved_count,
        batch_id = ?ack.batch_id,
        "batch saved"
    );

    if options.if_save_configuration {
        let config = build_batch_configuration(ctx, company, ack.batch_id.clone());
        if let Err(err) = api.save_configuration(&config) {
            warn!("batch configuration save failed: {err}");
            warnings.push(format!(
                "Batch saved, but its allocation configuration could not be saved: {err}"
            ));
        }
    }

    Ok(SpecSaveOutcome {
        ack,
        records,
        warnings,
    })
}

/// Collect every row into a save record with summary fields.
///
/// Each record holds the collected dto fields, the row's benefit fields, the
/// source fields of [`TUP_RECORD_SOURCE_FIELDS`] under their own keys, the
/// row id, cost center and allocation. The 8 summary fields are computed from
/// the record itself, so it passes `validate_summary_fields` as saved.
pub fn collect_batch_records(
    ctx: &AllocationContext,
    table: &SpecFieldConfigTable,
    company: EnumCompany,
) -> Result<(Vec<RowRecord>, Vec<String>), BatchError> {
    let mut l_records = Vec::with_capacity(ctx.len());
    let mut l_warnings = Vec::new();

    for row in ctx.rows() {
        let collected = collect_row(&row.raw_field_pairs(), table)?;
        l_warnings.extend(
            collected
                .report
                .warnings
                .iter()
                .map(|msg| format!("Row {}: {msg}", row.row_id)),
        );

        let mut record = collected.record;
        record.extend_from(&row.benefit_fields);
        record.insert(C_FIELD_ROW_ID, i64::from(row.row_id));
        record.insert(C_FIELD_COST_CENTER_CODE, row.cost_center_code.clone());
        record.insert(C_FIELD_ALLOCATION_PCT, row.allocation_pct);
        for c_field in TUP_RECORD_SOURCE_FIELDS {
            if let Some(raw) = row.raw_fields.get(c_field) {
                record.insert(c_field, sniff_raw_value(&raw.value));
            }
        }

        let summary = calculate_summary(&record, company);
        write_summary_fields(&mut record, &summary);
        l_records.push(record);
    }

    Ok((l_records, l_warnings))
}

/// Company selected on the master row.
pub fn resolve_batch_company(ctx: &AllocationContext) -> Result<EnumCompany, BatchError> {
    let master = ctx.master().ok_or(BatchError::NoMaster)?;
    let value = master
        .raw_fields
        .get(C_FIELD_COMPANY_ID)
        .map(|raw| &raw.value)
        .unwrap_or(&EnumRawValue::None);

    let company_id = match value {
        EnumRawValue::Text(s) if !s.trim().is_empty() => s
            .trim()
            .parse::<i64>()
            .map_err(|_| BatchError::InvalidCompanyId(s.clone()))?,
        EnumRawValue::Number(n) if n.is_finite() && n.fract() == 0.0 => *n as i64,
        EnumRawValue::Number(n) => return Err(BatchError::InvalidCompanyId(n.to_string())),
        _ => return Err(BatchError::Validation(vec![EnumBatchIssue::MissingCompany])),
    };

    EnumCompany::try_from(company_id).map_err(|err| {
        error!(company_id, "batch company rejected: {err}");
        BatchError::from(err)
    })
}

fn build_batch_configuration(
    ctx: &AllocationContext,
    company: EnumCompany,
    batch_id: Option<String>,
) -> SpecBatchConfiguration {
    SpecBatchConfiguration {
        batch_id,
        company_id: company.id(),
        allocations: ctx
            .rows()
            .filter_map(|row| {
                Some(SpecAllocationShare {
                    cost_center_code: row.cost_center_code.clone()?,
                    allocation_pct: row.allocation_pct?,
                })
            })
            .collect(),
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
