use std::collections::BTreeSet;
use std::sync::Arc;

use log::{debug, info};

use crate::catalog::{CatalogService, TableHandle};
use crate::error::{DbError, DbResult};
use crate::expression::Expr;
use crate::planner::project_info::ProjectInfo;
use crate::planner::scan::SeqScanPlan;
use crate::sql::ast::{UpdateClause, UpdateStatement};
use crate::storage::row::ColumnValue;

/// Plan for `UPDATE table SET ... [WHERE ...]`.
///
/// The assignments and predicate are kept twice: the resolved templates as
/// planned, still carrying their placeholders, and the live copies the
/// executor reads. Every bind derives fresh live copies from the templates.
#[derive(Debug, Clone)]
pub struct UpdatePlan {
    table: TableHandle,
    update_templates: Vec<UpdateClause>,
    where_template: Option<Expr>,
    updates: Vec<UpdateClause>,
    predicate: Option<Expr>,
    project_info: ProjectInfo,
    child: SeqScanPlan,
}

impl UpdatePlan {
    /// Plan `stmt` against table metadata from `catalog` in database `db_name`.
    pub fn from_statement(
        stmt: &UpdateStatement,
        catalog: &dyn CatalogService,
        db_name: &str,
    ) -> DbResult<Self> {
        let table = catalog.lookup_table(db_name, &stmt.table.name)?;
        info!("planning UPDATE on {}.{} ({} assignment(s))", db_name, table.name, stmt.updates.len());
        let schema = table.schema();

        let mut updates = Vec::with_capacity(stmt.updates.len());
        let mut column_ids = BTreeSet::new();
        for clause in &stmt.updates {
            let mut update = clause.clone();
            update.value.resolve_column_names(schema)?;
            column_ids.insert(schema.column_id(&update.column)?);
            update.value.referenced_columns(&mut column_ids);
            updates.push(update);
        }

        let project_info = ProjectInfo::from_updates(&updates, schema)?;

        let predicate = match &stmt.where_predicate {
            Some(pred) => {
                let mut pred = pred.clone();
                pred.resolve_column_names(schema)?;
                pred.referenced_columns(&mut column_ids);
                Some(pred)
            }
            None => None,
        };

        debug!("scan child reads columns {:?}", column_ids);
        let child = SeqScanPlan::new(Arc::clone(&table), predicate.clone(), column_ids);

        Ok(UpdatePlan {
            table,
            update_templates: updates.clone(),
            where_template: predicate.clone(),
            updates,
            predicate,
            project_info,
            child,
        })
    }

    pub fn table(&self) -> &TableHandle {
        &self.table
    }

    pub fn assignments(&self) -> &[UpdateClause] {
        &self.updates
    }

    /// `None` means every row qualifies.
    pub fn predicate(&self) -> Option<&Expr> {
        self.predicate.as_ref()
    }

    pub fn project_info(&self) -> &ProjectInfo {
        &self.project_info
    }

    pub fn child(&self) -> &SeqScanPlan {
        &self.child
    }

    /// Number of values `bind_parameters` needs.
    pub fn parameter_count(&self) -> usize {
        let from_updates = self
            .update_templates
            .iter()
            .map(|u| u.value.parameter_count())
            .max()
            .unwrap_or(0);
        let from_where = self.where_template.as_ref().map_or(0, Expr::parameter_count);
        from_updates.max(from_where)
    }

    /// Substitute `values` for the placeholders of the planned statement.
    ///
    /// Nothing is modified unless every placeholder has a value. The
    /// projection, assignments and predicate are rebuilt from the templates
    /// and swapped in together, so successive binds never see each other's
    /// values.
    pub fn bind_parameters(&mut self, values: &[ColumnValue]) -> DbResult<()> {
        let needed = self.parameter_count();
        if needed > values.len() {
            return Err(DbError::ParameterIndexOutOfRange { index: needed - 1, supplied: values.len() });
        }

        info!("binding {} parameter value(s) into UPDATE on {}", values.len(), self.table.name);
        let mut project_info = ProjectInfo::from_updates(&self.update_templates, self.table.schema())?;
        project_info.transform_parameters_to_constants(values)?;

        let mut updates = self.update_templates.clone();
        for update in &mut updates {
            if let Expr::Parameter(idx) = update.value {
                if let Some(value) = values.get(idx) {
                    debug!("parameter ${} -> column '{}' = {}", idx + 1, update.column, value);
                }
            }
            update.value.replace_parameters(values)?;
        }

        let mut predicate = self.where_template.clone();
        if let Some(pred) = predicate.as_mut() {
            pred.replace_parameters(values)?;
        }

        self.project_info = project_info;
        self.updates = updates;
        self.child.set_predicate(predicate.clone());
        self.predicate = predicate;
        Ok(())
    }

    /// Indented text rendering of the plan tree.
    pub fn explain(&self) -> String {
        let schema = self.table.schema();
        let name_of = |id| schema.column_name(id).unwrap_or("?");
        let sets: Vec<String> = self
            .project_info
            .target_list()
            .iter()
            .map(|(id, expr)| format!("{} = {}", name_of(*id), expr))
            .collect();
        let mut out = format!("Update {} set [{}]", self.table.name, sets.join(", "));
        out.push_str("\n  ");
        out.push_str(&self.child.explain());
        out
    }
}
