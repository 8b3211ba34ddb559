pub mod project_info;
pub mod scan;
pub mod update;

pub use project_info::{DirectMapList, ExpressionEvaluator, ProjectInfo, TargetList};
pub use scan::SeqScanPlan;
pub use update::UpdatePlan;

use crate::catalog::{CatalogService, DEFAULT_DB_NAME};
use crate::error::DbResult;
use crate::sql::ast::UpdateStatement;

#[derive(Debug, Clone, PartialEq)]
pub struct PlannerConfig {
    /// Database that unqualified table names are looked up in.
    pub database: String,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        PlannerConfig { database: DEFAULT_DB_NAME.to_string() }
    }
}

/// Builds plans against an explicit catalog.
pub struct Planner<'a> {
    catalog: &'a dyn CatalogService,
    config: PlannerConfig,
}

impl<'a> Planner<'a> {
    pub fn new(catalog: &'a dyn CatalogService) -> Self {
        Self::with_config(catalog, PlannerConfig::default())
    }

    pub fn with_config(catalog: &'a dyn CatalogService, config: PlannerConfig) -> Self {
        Planner { catalog, config }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn plan_update(&self, stmt: &UpdateStatement) -> DbResult<UpdatePlan> {
        UpdatePlan::from_statement(stmt, self.catalog, &self.config.database)
    }
}
