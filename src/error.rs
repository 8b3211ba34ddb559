use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum DbError {
    #[error("table '{0}' not found")]
    TableNotFound(String),
    #[error("column '{0}' not found")]
    UnknownColumn(String),
    #[error("parameter index {index} out of range, {supplied} value(s) supplied")]
    ParameterIndexOutOfRange { index: usize, supplied: usize },
    #[error("database '{0}' not found")]
    DatabaseNotFound(String),
    #[error("table '{0}' already exists")]
    TableExists(String),
    #[error("duplicate column '{0}'")]
    DuplicateColumn(String),
    #[error("invalid value: {0}")]
    InvalidValue(String),
}

pub type DbResult<T> = Result<T, DbError>;
