use std::collections::BTreeSet;

use crate::catalog::{ColumnId, TableHandle};
use crate::expression::Expr;

/// Sequential scan over a table, filtered by an optional predicate and
/// producing only `column_ids`.
#[derive(Debug, Clone)]
pub struct SeqScanPlan {
    table: TableHandle,
    predicate: Option<Expr>,
    column_ids: BTreeSet<ColumnId>,
}

impl SeqScanPlan {
    pub fn new(table: TableHandle, predicate: Option<Expr>, column_ids: BTreeSet<ColumnId>) -> Self {
        SeqScanPlan { table, predicate, column_ids }
    }

    pub fn table(&self) -> &TableHandle {
        &self.table
    }

    /// `None` scans every row.
    pub fn predicate(&self) -> Option<&Expr> {
        self.predicate.as_ref()
    }

    pub fn column_ids(&self) -> &BTreeSet<ColumnId> {
        &self.column_ids
    }

    pub(crate) fn set_predicate(&mut self, predicate: Option<Expr>) {
        self.predicate = predicate;
    }

    pub fn explain(&self) -> String {
        let cols: Vec<String> = self.column_ids.iter().map(|c| c.to_string()).collect();
        match &self.predicate {
            Some(p) => format!("SeqScan {} cols=[{}] filter={}", self.table.name, cols.join(","), p),
            None => format!("SeqScan {} cols=[{}]", self.table.name, cols.join(",")),
        }
    }
}
