//! Scalar expression trees.
//!
//! Every node owns its children outright, so `clone()` is always a deep copy
//! and two plans never observe each other's rewrites.

use std::collections::BTreeSet;
use std::fmt;

use crate::catalog::{ColumnId, Schema};
use crate::error::{DbError, DbResult};
use crate::storage::row::ColumnValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Equals,
    NotEquals,
    LessThan,
    LessOrEquals,
    GreaterThan,
    GreaterOrEquals,
    And,
    Or,
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
}

impl BinaryOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            BinaryOp::Equals => "=",
            BinaryOp::NotEquals => "<>",
            BinaryOp::LessThan => "<",
            BinaryOp::LessOrEquals => "<=",
            BinaryOp::GreaterThan => ">",
            BinaryOp::GreaterOrEquals => ">=",
            BinaryOp::And => "AND",
            BinaryOp::Or => "OR",
            BinaryOp::Add => "+",
            BinaryOp::Subtract => "-",
            BinaryOp::Multiply => "*",
            BinaryOp::Divide => "/",
            BinaryOp::Modulo => "%",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Column referenced by name, as it comes out of the parser.
    Column(String),
    /// Column resolved against a table schema.
    ColumnRef(ColumnId),
    Constant(ColumnValue),
    /// Zero-based parameter slot, filled in at bind time.
    Parameter(usize),
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
}

impl Expr {
    pub fn column(name: impl Into<String>) -> Self {
        Expr::Column(name.into())
    }

    pub fn constant(value: impl Into<ColumnValue>) -> Self {
        Expr::Constant(value.into())
    }

    pub fn param(index: usize) -> Self {
        Expr::Parameter(index)
    }

    pub fn binary(op: BinaryOp, left: Expr, right: Expr) -> Self {
        Expr::Binary { op, left: Box::new(left), right: Box::new(right) }
    }

    pub fn equals(left: Expr, right: Expr) -> Self {
        Expr::binary(BinaryOp::Equals, left, right)
    }

    /// Number of values a bind must supply: highest placeholder index + 1.
    pub fn parameter_count(&self) -> usize {
        match self {
            Expr::Parameter(i) => i + 1,
            Expr::Binary { left, right, .. } => left.parameter_count().max(right.parameter_count()),
            _ => 0,
        }
    }

    pub fn has_parameters(&self) -> bool {
        self.parameter_count() > 0
    }

    /// True when no name-based column reference remains.
    pub fn is_resolved(&self) -> bool {
        match self {
            Expr::Column(_) => false,
            Expr::Binary { left, right, .. } => left.is_resolved() && right.is_resolved(),
            _ => true,
        }
    }

    /// Collect the ids of every resolved column reference in the tree.
    pub fn referenced_columns(&self, out: &mut BTreeSet<ColumnId>) {
        match self {
            Expr::ColumnRef(id) => {
                out.insert(*id);
            }
            Expr::Binary { left, right, .. } => {
                left.referenced_columns(out);
                right.referenced_columns(out);
            }
            _ => {}
        }
    }

    /// Fail unless every placeholder index is below `supplied`.
    pub fn check_parameters(&self, supplied: usize) -> DbResult<()> {
        let needed = self.parameter_count();
        if needed > supplied {
            return Err(DbError::ParameterIndexOutOfRange { index: needed - 1, supplied });
        }
        Ok(())
    }

    /// Rewrite every placeholder into a constant taken from `values`.
    ///
    /// Indices are checked before anything is touched, so an error leaves the
    /// tree as it was. A tree without placeholders is left alone.
    pub fn replace_parameters(&mut self, values: &[ColumnValue]) -> DbResult<()> {
        self.check_parameters(values.len())?;
        self.substitute(values)
    }

    fn substitute(&mut self, values: &[ColumnValue]) -> DbResult<()> {
        match self {
            Expr::Parameter(i) => {
                let value = values.get(*i).cloned().ok_or(DbError::ParameterIndexOutOfRange {
                    index: *i,
                    supplied: values.len(),
                })?;
                *self = Expr::Constant(value);
            }
            Expr::Binary { left, right, .. } => {
                left.substitute(values)?;
                right.substitute(values)?;
            }
            _ => {}
        }
        Ok(())
    }

    /// Rewrite name-based column references into `ColumnRef` ids.
    ///
    /// All names are looked up first; an unknown one fails with
    /// `UnknownColumn` and the tree is not modified. Already-resolved nodes
    /// are kept, so resolving twice is a no-op.
    pub fn resolve_column_names(&mut self, schema: &Schema) -> DbResult<()> {
        let mut names = Vec::new();
        self.unresolved_names(&mut names);
        for name in names {
            schema.column_id(name)?;
        }
        self.resolve(schema)
    }

    fn unresolved_names<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Expr::Column(name) => out.push(name),
            Expr::Binary { left, right, .. } => {
                left.unresolved_names(out);
                right.unresolved_names(out);
            }
            _ => {}
        }
    }

    fn resolve(&mut self, schema: &Schema) -> DbResult<()> {
        match self {
            Expr::Column(name) => {
                let id = schema.column_id(name)?;
                *self = Expr::ColumnRef(id);
            }
            Expr::Binary { left, right, .. } => {
                left.resolve(schema)?;
                right.resolve(schema)?;
            }
            _ => {}
        }
        Ok(())
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Column(name) => write!(f, "{}", name),
            Expr::ColumnRef(id) => write!(f, "#{}", id),
            Expr::Constant(v) => write!(f, "{}", v),
            Expr::Parameter(i) => write!(f, "${}", i + 1),
            Expr::Binary { op, left, right } => write!(f, "({} {} {})", left, op.as_str(), right),
        }
    }
}
