use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColumnType {
    Integer,
    Double,
    Text,
    Boolean,
    Char(usize),
}

/// A single scalar value, either stored in a row or carried by a constant
/// expression node.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnValue {
    Integer(i32),
    Double(f64),
    Text(String),
    Boolean(bool),
    Char(String),
    Null,
}

impl ColumnValue {
    pub fn to_string_value(&self) -> String {
        match self {
            ColumnValue::Integer(i) => i.to_string(),
            ColumnValue::Double(f) => f.to_string(),
            ColumnValue::Text(s) | ColumnValue::Char(s) => s.clone(),
            ColumnValue::Boolean(b) => b.to_string(),
            ColumnValue::Null => "NULL".into(),
        }
    }
}

impl fmt::Display for ColumnValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnValue::Text(s) | ColumnValue::Char(s) => write!(f, "'{}'", s),
            other => write!(f, "{}", other.to_string_value()),
        }
    }
}

impl From<i32> for ColumnValue {
    fn from(v: i32) -> Self {
        ColumnValue::Integer(v)
    }
}

impl From<f64> for ColumnValue {
    fn from(v: f64) -> Self {
        ColumnValue::Double(v)
    }
}

impl From<bool> for ColumnValue {
    fn from(v: bool) -> Self {
        ColumnValue::Boolean(v)
    }
}

impl From<&str> for ColumnValue {
    fn from(v: &str) -> Self {
        ColumnValue::Text(v.to_string())
    }
}

/// One tuple, indexed by column position.
#[derive(Debug, Clone, PartialEq)]
pub struct RowData(pub Vec<ColumnValue>);

impl RowData {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, pos: usize) -> Option<&ColumnValue> {
        self.0.get(pos)
    }
}
