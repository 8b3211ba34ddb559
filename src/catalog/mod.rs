use std::collections::HashMap;
use std::sync::Arc;

use log::{debug, info};

use crate::error::{DbError, DbResult};
use crate::storage::row::ColumnType;

/// Name of the database that exists in every catalog from the start.
pub const DEFAULT_DB_NAME: &str = "default";

/// Physical column identifier, stable for the lifetime of a table.
pub type ColumnId = u32;

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnInfo {
    pub name: String,
    pub id: ColumnId,
    pub ty: ColumnType,
}

/// Ordered column list of a table.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Schema {
    columns: Vec<ColumnInfo>,
}

impl Schema {
    /// Build a schema from `(name, type)` pairs; ids follow declaration order.
    pub fn new(columns: Vec<(String, ColumnType)>) -> DbResult<Self> {
        let mut out: Vec<ColumnInfo> = Vec::with_capacity(columns.len());
        for (pos, (name, ty)) in columns.into_iter().enumerate() {
            if out.iter().any(|c| c.name.eq_ignore_ascii_case(&name)) {
                return Err(DbError::DuplicateColumn(name));
            }
            out.push(ColumnInfo { name, id: pos as ColumnId, ty });
        }
        Ok(Schema { columns: out })
    }

    pub fn columns(&self) -> &[ColumnInfo] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Look up a column id by name. Names compare case-insensitively, as
    /// SQL identifiers do.
    pub fn column_id(&self, name: &str) -> DbResult<ColumnId> {
        self.columns
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
            .map(|c| c.id)
            .ok_or_else(|| DbError::UnknownColumn(name.to_string()))
    }

    pub fn column(&self, id: ColumnId) -> Option<&ColumnInfo> {
        self.columns.iter().find(|c| c.id == id)
    }

    pub fn column_name(&self, id: ColumnId) -> Option<&str> {
        self.column(id).map(|c| c.name.as_str())
    }
}

/// In-memory representation of a table's metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct TableInfo {
    pub name: String,
    schema: Schema,
}

impl TableInfo {
    pub fn new(name: impl Into<String>, schema: Schema) -> Self {
        TableInfo { name: name.into(), schema }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }
}

/// Shared, read-only handle to a table. Plans hold handles, never the table.
pub type TableHandle = Arc<TableInfo>;

/// What plan construction needs from a catalog.
pub trait CatalogService {
    fn lookup_table(&self, db_name: &str, table_name: &str) -> DbResult<TableHandle>;
}

/// The Catalog holds every database and its tables in memory.
#[derive(Debug)]
pub struct Catalog {
    databases: HashMap<String, HashMap<String, TableHandle>>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

impl Catalog {
    pub fn new() -> Self {
        let mut databases = HashMap::new();
        databases.insert(DEFAULT_DB_NAME.to_string(), HashMap::new());
        Catalog { databases }
    }

    /// Create an empty database. Creating one that already exists is a no-op.
    pub fn create_database(&mut self, name: &str) {
        self.databases.entry(name.to_string()).or_default();
    }

    /// Create a new table with `name` and `columns` in database `db_name`.
    pub fn create_table(
        &mut self,
        db_name: &str,
        name: &str,
        columns: Vec<(String, ColumnType)>,
    ) -> DbResult<TableHandle> {
        let tables = self
            .databases
            .get_mut(db_name)
            .ok_or_else(|| DbError::DatabaseNotFound(db_name.to_string()))?;
        if tables.contains_key(name) {
            return Err(DbError::TableExists(name.to_string()));
        }
        let schema = Schema::new(columns)?;
        let handle = Arc::new(TableInfo::new(name, schema));
        tables.insert(name.to_string(), Arc::clone(&handle));
        info!("created table {}.{} with {} columns", db_name, name, handle.schema().len());
        Ok(handle)
    }

    /// Remove a table. Plans already holding its handle keep a valid copy of
    /// the metadata.
    pub fn drop_table(&mut self, db_name: &str, name: &str) -> DbResult<()> {
        let tables = self
            .databases
            .get_mut(db_name)
            .ok_or_else(|| DbError::DatabaseNotFound(db_name.to_string()))?;
        tables
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| DbError::TableNotFound(name.to_string()))
    }
}

impl CatalogService for Catalog {
    fn lookup_table(&self, db_name: &str, table_name: &str) -> DbResult<TableHandle> {
        debug!("lookup_table: {}.{}", db_name, table_name);
        let tables = self
            .databases
            .get(db_name)
            .ok_or_else(|| DbError::DatabaseNotFound(db_name.to_string()))?;
        tables
            .get(table_name)
            .cloned()
            .ok_or_else(|| DbError::TableNotFound(table_name.to_string()))
    }
}
