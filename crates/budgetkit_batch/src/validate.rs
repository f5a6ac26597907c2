//! Pre-save batch validation.

use std::collections::BTreeMap;

use crate::conf::{C_FIELD_COMPANY_ID, N_ALLOCATION_TOLERANCE_PCT, N_ALLOCATION_TOTAL_PCT};
use crate::registry::AllocationContext;
use crate::spec::EnumBatchIssue;

/// Collect every issue that blocks saving `ctx`. Empty means savable.
pub fn validate_batch(ctx: &AllocationContext) -> Vec<EnumBatchIssue> {
    if ctx.is_empty() {
        return vec![EnumBatchIssue::EmptyBatch];
    }

    let mut l_issues = Vec::new();

    match ctx.master() {
        None => l_issues.push(EnumBatchIssue::MissingMaster),
        Some(master) => {
            let if_has_company = master
                .raw_fields
                .get(C_FIELD_COMPANY_ID)
                .is_some_and(|raw| !raw.value.is_empty());
            if !if_has_company {
                l_issues.push(EnumBatchIssue::MissingCompany);
            }
        }
    }

    let mut dict_cost_centers: BTreeMap<&str, Vec<u32>> = BTreeMap::new();
    let mut n_total_pct = 0.0;
    for row in ctx.rows() {
        match &row.cost_center_code {
            Some(code) => dict_cost_centers
                .entry(code.as_str())
                .or_default()
                .push(row.row_id),
            None => l_issues.push(EnumBatchIssue::MissingCostCenter { row_id: row.row_id }),
        }

        match row.allocation_pct {
            Some(pct) if pct.is_finite() && (0.0..=N_ALLOCATION_TOTAL_PCT).contains(&pct) => {
                n_total_pct += pct;
            }
            Some(pct) => l_issues.push(EnumBatchIssue::AllocationOutOfRange {
                row_id: row.row_id,
                pct,
            }),
            None => l_issues.push(EnumBatchIssue::MissingAllocation { row_id: row.row_id }),
        }
    }

    for (code, row_ids) in dict_cost_centers {
        if row_ids.len() > 1 {
            l_issues.push(EnumBatchIssue::DuplicateCostCenter {
                code: code.to_string(),
                row_ids,
            });
        }
    }

    if (n_total_pct - N_ALLOCATION_TOTAL_PCT).abs() > N_ALLOCATION_TOLERANCE_PCT {
        l_issues.push(EnumBatchIssue::AllocationTotal {
            total: n_total_pct,
        });
    }

    l_issues
}

#[cfg(test)]
mod tests {
    use budgetkit_collect::SpecRawField;

    use super::validate_batch;
    use crate::registry::AllocationContext;
    use crate::spec::{EnumBatchIssue, EnumRowKind};

    fn build_ctx(l_rows: &[(&str, f64)]) -> AllocationContext {
        let mut ctx = AllocationContext::new();
        for (n_idx, (code, pct)) in l_rows.iter().enumerate() {
            let kind = if n_idx == 0 {
                EnumRowKind::Master
            } else {
                EnumRowKind::Child
            };
            let row_id = ctx.add_row(kind).expect("add row");
            ctx.set_cost_center(row_id, *code).expect("set cost center");
            ctx.set_allocation_pct(row_id, Some(*pct)).expect("set pct");
        }
        if let Some(id_master) = ctx.master().map(|row| row.row_id) {
            ctx.set_field(id_master, "company_id", SpecRawField::from_value("2"))
                .expect("set company");
        }
        ctx
    }

    #[test]
    fn balanced_batch_has_no_issues() {
        let ctx = build_ctx(&[("CC1", 33.33), ("CC2", 33.33), ("CC3", 33.34)]);
        assert!(validate_batch(&ctx).is_empty());
    }

    #[test]
    fn total_must_be_one_hundred() {
        let ctx = build_ctx(&[("CC1", 60.0), ("CC2", 30.0)]);
        let l_issues = validate_batch(&ctx);
        assert_eq!(l_issues, vec![EnumBatchIssue::AllocationTotal { total: 90.0 }]);
    }

    #[test]
    fn duplicates_and_missing_selections_are_all_reported() {
        let mut ctx = build_ctx(&[("CC1", 50.0), ("CC1", 50.0)]);
        let id_extra = ctx.add_row(EnumRowKind::Child).expect("add row");
        ctx.set_allocation_pct(id_extra, Some(0.0)).expect("set pct");

        let l_issues = validate_batch(&ctx);
        assert!(l_issues.contains(&EnumBatchIssue::MissingCostCenter { row_id: id_extra }));
        assert!(l_issues.contains(&EnumBatchIssue::DuplicateCostCenter {
            code: "CC1".to_string(),
            row_ids: vec![1, 2],
        }));
        assert!(
            !l_issues
                .iter()
                .any(|issue| matches!(issue, EnumBatchIssue::AllocationTotal { .. }))
        );
    }

    #[test]
    fn empty_batch_and_missing_company() {
        assert_eq!(
            validate_batch(&AllocationContext::new()),
            vec![EnumBatchIssue::EmptyBatch]
        );

        let mut ctx = AllocationContext::new();
        let id_master = ctx.add_row(EnumRowKind::Master).expect("master");
        ctx.set_cost_center(id_master, "CC1").expect("set");
        ctx.set_allocation_pct(id_master, Some(100.0)).expect("set");
        assert_eq!(validate_batch(&ctx), vec![EnumBatchIssue::MissingCompany]);
    }
}
