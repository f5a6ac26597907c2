//! Allocation row registry owned by one batch entry session.

use std::collections::BTreeMap;

use budgetkit_collect::SpecRawField;
use budgetkit_summary::RowRecord;
use tracing::debug;

use crate::spec::{BatchError, EnumRowKind, SpecAllocationRow};

/// Active rows of one allocation batch plus the id counter.
///
/// Row ids start at 1, only grow, and are never reused after removal.
#[derive(Debug, Clone)]
pub struct AllocationContext {
    dict_rows: BTreeMap<u32, SpecAllocationRow>,
    n_id_next: u32,
    id_master: Option<u32>,
}

impl Default for AllocationContext {
    fn default() -> Self {
        Self::new()
    }
}

impl AllocationContext {
    pub fn new() -> Self {
        Self {
            dict_rows: BTreeMap::new(),
            n_id_next: 1,
            id_master: None,
        }
    }

    /// Add an empty row and return its id. Only one master row is allowed.
    pub fn add_row(&mut self, kind: EnumRowKind) -> Result<u32, BatchError> {
        if kind == EnumRowKind::Master
            && let Some(id_master) = self.id_master
        {
            return Err(BatchError::MasterAlreadyExists(id_master));
        }

        let row_id = self.n_id_next;
        self.n_id_next += 1;
        self.dict_rows
            .insert(row_id, SpecAllocationRow::new(row_id, kind));
        if kind == EnumRowKind::Master {
            self.id_master = Some(row_id);
        }
        debug!(row_id, ?kind, "allocation row added");
        Ok(row_id)
    }

    /// Add a child row carrying a copy of `source_id`'s raw and benefit fields.
    ///
    /// Cost center and allocation are left empty on the copy.
    pub fn copy_row(&mut self, source_id: u32) -> Result<u32, BatchError> {
        let source = self.row(source_id)?.clone();
        let row_id = self.add_row(EnumRowKind::Child)?;
        let row = self.row_mut(row_id)?;
        row.raw_fields = source.raw_fields;
        row.benefit_fields = source.benefit_fields;
        Ok(row_id)
    }

    /// Remove a row. The master can only go once it is the last row.
    pub fn remove_row(&mut self, row_id: u32) -> Result<SpecAllocationRow, BatchError> {
        if !self.dict_rows.contains_key(&row_id) {
            return Err(BatchError::RowNotFound(row_id));
        }
        if self.id_master == Some(row_id) && self.dict_rows.len() > 1 {
            return Err(BatchError::MasterHasChildren(row_id));
        }

        let row = self
            .dict_rows
            .remove(&row_id)
            .ok_or(BatchError::RowNotFound(row_id))?;
        if self.id_master == Some(row_id) {
            self.id_master = None;
        }
        debug!(row_id, "allocation row removed");
        Ok(row)
    }

    /// Drop every row. The id counter keeps counting.
    pub fn clear(&mut self) {
        self.dict_rows.clear();
        self.id_master = None;
    }

    pub fn row(&self, row_id: u32) -> Result<&SpecAllocationRow, BatchError> {
        self.dict_rows
            .get(&row_id)
            .ok_or(BatchError::RowNotFound(row_id))
    }

    fn row_mut(&mut self, row_id: u32) -> Result<&mut SpecAllocationRow, BatchError> {
        self.dict_rows
            .get_mut(&row_id)
            .ok_or(BatchError::RowNotFound(row_id))
    }

    /// Rows in id order.
    pub fn rows(&self) -> impl Iterator<Item = &SpecAllocationRow> {
        self.dict_rows.values()
    }

    pub fn master(&self) -> Option<&SpecAllocationRow> {
        self.id_master.and_then(|row_id| self.dict_rows.get(&row_id))
    }

    pub fn children(&self) -> impl Iterator<Item = &SpecAllocationRow> {
        self.dict_rows.values().filter(|row| !row.is_master())
    }

    pub fn len(&self) -> usize {
        self.dict_rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dict_rows.is_empty()
    }

    /// Set one raw form field on a row.
    pub fn set_field(
        &mut self,
        row_id: u32,
        key: impl Into<String>,
        raw: SpecRawField,
    ) -> Result<(), BatchError> {
        self.row_mut(row_id)?.raw_fields.insert(key.into(), raw);
        Ok(())
    }

    /// Set the cost-center selection; empty text clears it.
    pub fn set_cost_center(
        &mut self,
        row_id: u32,
        code: impl Into<String>,
    ) -> Result<(), BatchError> {
        let code = code.into();
        let code = code.trim();
        self.row_mut(row_id)?.cost_center_code = if code.is_empty() {
            None
        } else {
            Some(code.to_string())
        };
        Ok(())
    }

    pub fn set_allocation_pct(&mut self, row_id: u32, pct: Option<f64>) -> Result<(), BatchError> {
        self.row_mut(row_id)?.allocation_pct = pct;
        Ok(())
    }

    /// Replace the server-calculated benefit fields of a row.
    pub fn set_benefit_fields(&mut self, row_id: u32, fields: RowRecord) -> Result<(), BatchError> {
        self.row_mut(row_id)?.benefit_fields = fields;
        Ok(())
    }

    /// Mirror the master's `shared_keys` raw fields onto every child row.
    ///
    /// Keys the master lacks are removed from the children. Children never
    /// write back. Returns the number of child rows updated.
    pub fn apply_master_to_children(&mut self, shared_keys: &[String]) -> Result<usize, BatchError> {
        let master = self.master().ok_or(BatchError::NoMaster)?;
        let id_master = master.row_id;
        let dict_shared: Vec<(String, Option<SpecRawField>)> = shared_keys
            .iter()
            .map(|key| (key.clone(), master.raw_fields.get(key).cloned()))
            .collect();

        let mut n_updated = 0;
        for row in self
            .dict_rows
            .values_mut()
            .filter(|row| row.row_id != id_master)
        {
            for (key, raw) in &dict_shared {
                match raw {
                    Some(raw) => {
                        row.raw_fields.insert(key.clone(), raw.clone());
                    }
                    None => {
                        row.raw_fields.remove(key);
                    }
                }
            }
            n_updated += 1;
        }
        Ok(n_updated)
    }
}

#[cfg(test)]
mod tests {
    use budgetkit_collect::SpecRawField;

    use super::AllocationContext;
    use crate::spec::{BatchError, EnumRowKind};

    #[test]
    fn row_ids_increase_and_are_not_reused() {
        let mut ctx = AllocationContext::new();
        let id_master = ctx.add_row(EnumRowKind::Master).expect("master");
        let id_child = ctx.add_row(EnumRowKind::Child).expect("child");
        assert_eq!((id_master, id_child), (1, 2));

        ctx.remove_row(id_child).expect("remove child");
        let id_next = ctx.add_row(EnumRowKind::Child).expect("child");
        assert_eq!(id_next, 3);
        assert_eq!(ctx.len(), 2);
    }

    #[test]
    fn only_one_master_and_master_removed_last() {
        let mut ctx = AllocationContext::new();
        let id_master = ctx.add_row(EnumRowKind::Master).expect("master");
        let id_child = ctx.add_row(EnumRowKind::Child).expect("child");

        assert!(matches!(
            ctx.add_row(EnumRowKind::Master),
            Err(BatchError::MasterAlreadyExists(1))
        ));
        assert!(matches!(
            ctx.remove_row(id_master),
            Err(BatchError::MasterHasChildren(1))
        ));
        assert!(matches!(ctx.remove_row(99), Err(BatchError::RowNotFound(99))));

        ctx.remove_row(id_child).expect("remove child");
        ctx.remove_row(id_master).expect("remove master");
        assert!(ctx.is_empty());
        assert!(ctx.master().is_none());
    }

    #[test]
    fn master_fields_mirror_onto_children() {
        let mut ctx = AllocationContext::new();
        let id_master = ctx.add_row(EnumRowKind::Master).expect("master");
        let id_child = ctx.add_row(EnumRowKind::Child).expect("child");

        ctx.set_field(id_master, "job_band", SpecRawField::from_value("M2"))
            .expect("set");
        ctx.set_field(id_child, "job_band", SpecRawField::from_value("S1"))
            .expect("set");
        ctx.set_field(id_child, "executive", SpecRawField::from_value("Y"))
            .expect("set");
        ctx.set_field(id_child, "remark", SpecRawField::from_value("keep"))
            .expect("set");

        let l_shared = vec!["job_band".to_string(), "executive".to_string()];
        let n_updated = ctx.apply_master_to_children(&l_shared).expect("apply");
        assert_eq!(n_updated, 1);

        let child = ctx.row(id_child).expect("child");
        assert_eq!(
            child.raw_fields.get("job_band"),
            Some(&SpecRawField::from_value("M2"))
        );
        assert!(!child.raw_fields.contains_key("executive"));
        assert!(child.raw_fields.contains_key("remark"));
        assert!(!ctx.row(id_master).expect("master").raw_fields.contains_key("remark"));
    }

    #[test]
    fn copy_row_clears_allocation() {
        let mut ctx = AllocationContext::new();
        let id_master = ctx.add_row(EnumRowKind::Master).expect("master");
        ctx.set_field(id_master, "job_band", SpecRawField::from_value("M2"))
            .expect("set");
        ctx.set_cost_center(id_master, "CC1").expect("set");
        ctx.set_allocation_pct(id_master, Some(60.0)).expect("set");

        let id_copy = ctx.copy_row(id_master).expect("copy");
        let row_copy = ctx.row(id_copy).expect("copy row");
        assert_eq!(row_copy.kind, EnumRowKind::Child);
        assert_eq!(row_copy.cost_center_code, None);
        assert_eq!(row_copy.allocation_pct, None);
        assert!(row_copy.raw_fields.contains_key("job_band"));
    }

    #[test]
    fn apply_without_master_fails() {
        let mut ctx = AllocationContext::new();
        ctx.add_row(EnumRowKind::Child).expect("child");
        assert!(matches!(
            ctx.apply_master_to_children(&[]),
            Err(BatchError::NoMaster)
        ));
    }
}
