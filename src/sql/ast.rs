// src/sql/ast.rs
//
// Statement shapes handed over by the parser. Expressions use the shared
// `Expr` tree with name-based column references.

pub use crate::expression::{BinaryOp, Expr};

#[derive(Debug, Clone, PartialEq)]
pub struct TableRef {
    pub name: String,
}

/// One `SET column = value` fragment.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateClause {
    pub column: String,
    pub value: Expr,
}

impl UpdateClause {
    pub fn new(column: impl Into<String>, value: Expr) -> Self {
        UpdateClause { column: column.into(), value }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpdateStatement {
    pub table: TableRef,
    pub updates: Vec<UpdateClause>,
    pub where_predicate: Option<Expr>,
}

impl UpdateStatement {
    pub fn new(table: impl Into<String>, updates: Vec<UpdateClause>, where_predicate: Option<Expr>) -> Self {
        UpdateStatement {
            table: TableRef { name: table.into() },
            updates,
            where_predicate,
        }
    }
}
