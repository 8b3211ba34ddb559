//! Projection descriptor: which output columns are computed and which are
//! copied straight from an input tuple.

use std::collections::BTreeSet;

use log::debug;

use crate::catalog::{ColumnId, Schema};
use crate::error::{DbError, DbResult};
use crate::expression::Expr;
use crate::sql::ast::UpdateClause;
use crate::storage::row::{ColumnValue, RowData};

/// Output column computed from an expression.
pub type Target = (ColumnId, Expr);
pub type TargetList = Vec<Target>;

/// Output column copied from `(tuple_index, input column)`.
pub type DirectMap = (ColumnId, (usize, ColumnId));
pub type DirectMapList = Vec<DirectMap>;

/// Evaluates a scalar expression against the input tuples of a projection.
/// Implemented by the executor.
pub trait ExpressionEvaluator {
    fn evaluate(&self, expr: &Expr, inputs: &[&RowData]) -> DbResult<ColumnValue>;
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProjectInfo {
    target_list: TargetList,
    direct_map_list: DirectMapList,
}

impl ProjectInfo {
    pub fn new(target_list: TargetList, direct_map_list: DirectMapList) -> Self {
        ProjectInfo { target_list, direct_map_list }
    }

    /// Build the projection of an UPDATE over `schema`.
    ///
    /// Assigned columns become targets holding a resolved copy of their
    /// value; every other column maps straight through from tuple 0. When a
    /// column is assigned twice the last clause wins and its entry sits where
    /// that clause sits.
    pub fn from_updates(updates: &[UpdateClause], schema: &Schema) -> DbResult<Self> {
        let mut target_list: TargetList = Vec::with_capacity(updates.len());
        let mut assigned: BTreeSet<ColumnId> = BTreeSet::new();

        for update in updates {
            let col_id = schema.column_id(&update.column)?;
            let mut value = update.value.clone();
            value.resolve_column_names(schema)?;
            if !assigned.insert(col_id) {
                debug!("column '{}' assigned more than once, keeping the last value", update.column);
                target_list.retain(|(id, _)| *id != col_id);
            }
            target_list.push((col_id, value));
        }

        let direct_map_list: DirectMapList = schema
            .columns()
            .iter()
            .filter(|c| !assigned.contains(&c.id))
            .map(|c| (c.id, (0, c.id)))
            .collect();

        debug!(
            "projection built: {} target(s), {} direct map(s)",
            target_list.len(),
            direct_map_list.len()
        );
        Ok(ProjectInfo { target_list, direct_map_list })
    }

    pub fn target_list(&self) -> &TargetList {
        &self.target_list
    }

    pub fn direct_map_list(&self) -> &DirectMapList {
        &self.direct_map_list
    }

    pub fn is_non_trivial(&self) -> bool {
        !self.target_list.is_empty()
    }

    pub fn parameter_count(&self) -> usize {
        self.target_list.iter().map(|(_, e)| e.parameter_count()).max().unwrap_or(0)
    }

    /// True when every schema column appears exactly once across both lists.
    pub fn covers(&self, schema: &Schema) -> bool {
        let mut seen = BTreeSet::new();
        let outputs = self
            .target_list
            .iter()
            .map(|(id, _)| *id)
            .chain(self.direct_map_list.iter().map(|(id, _)| *id));
        for id in outputs {
            if !seen.insert(id) || schema.column(id).is_none() {
                return false;
            }
        }
        seen.len() == schema.len()
    }

    /// Bind placeholders in every target expression. All targets are checked
    /// before any is rewritten.
    pub fn transform_parameters_to_constants(&mut self, values: &[ColumnValue]) -> DbResult<()> {
        for (_, expr) in &self.target_list {
            expr.check_parameters(values.len())?;
        }
        for (_, expr) in &mut self.target_list {
            expr.replace_parameters(values)?;
        }
        Ok(())
    }

    /// Materialize one output row from `inputs`.
    pub fn evaluate(&self, inputs: &[&RowData], evaluator: &dyn ExpressionEvaluator) -> DbResult<RowData> {
        let width = self.target_list.len() + self.direct_map_list.len();
        let mut out = vec![ColumnValue::Null; width];

        for (dest, (tuple_idx, src)) in &self.direct_map_list {
            let tuple = inputs
                .get(*tuple_idx)
                .ok_or_else(|| DbError::InvalidValue(format!("no input tuple {}", tuple_idx)))?;
            let value = tuple.get(*src as usize).ok_or_else(|| {
                DbError::InvalidValue(format!("input tuple {} has no column {}", tuple_idx, src))
            })?;
            let slot = out
                .get_mut(*dest as usize)
                .ok_or_else(|| DbError::InvalidValue(format!("output column {} out of range", dest)))?;
            *slot = value.clone();
        }

        for (dest, expr) in &self.target_list {
            let value = evaluator.evaluate(expr, inputs)?;
            let slot = out
                .get_mut(*dest as usize)
                .ok_or_else(|| DbError::InvalidValue(format!("output column {} out of range", dest)))?;
            *slot = value;
        }

        Ok(RowData(out))
    }
}
