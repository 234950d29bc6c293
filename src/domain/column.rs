//! Column descriptors and cell values.

use std::cmp::Ordering;
use std::fmt;

/// Comparison semantics for a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ValueKind {
    Text,
    Numeric,
    Enumerated,
}

impl ValueKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "text" => Some(ValueKind::Text),
            "numeric" | "number" => Some(ValueKind::Numeric),
            "enumerated" | "enum" | "category" => Some(ValueKind::Enumerated),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ValueKind::Text => "text",
            ValueKind::Numeric => "numeric",
            ValueKind::Enumerated => "enumerated",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

/// A single displayable value in a row.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum CellValue {
    Text(String),
    Number(f64),
    Category(String),
}

impl CellValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            CellValue::Text(_) => ValueKind::Text,
            CellValue::Number(_) => ValueKind::Numeric,
            CellValue::Category(_) => ValueKind::Enumerated,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) | CellValue::Category(s) => Some(s),
            CellValue::Number(_) => None,
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

/// Metadata describing one sortable field of a row.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ColumnDescriptor {
    pub key: String,
    pub label: String,
    pub kind: ValueKind,
    /// Decimal places used when a numeric value is displayed.
    pub precision: usize,
    /// Ordered levels of an enumerated column, lowest first. Empty means the
    /// categories compare as plain strings.
    pub levels: Vec<String>,
}

impl ColumnDescriptor {
    pub fn text(key: &str, label: &str) -> Self {
        Self::new(key, label, ValueKind::Text)
    }

    pub fn numeric(key: &str, label: &str, precision: usize) -> Self {
        Self {
            precision,
            ..Self::new(key, label, ValueKind::Numeric)
        }
    }

    pub fn enumerated(key: &str, label: &str, levels: &[&str]) -> Self {
        Self {
            levels: levels.iter().map(|l| l.to_string()).collect(),
            ..Self::new(key, label, ValueKind::Enumerated)
        }
    }

    fn new(key: &str, label: &str, kind: ValueKind) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            kind,
            precision: 2,
            levels: Vec::new(),
        }
    }

    /// Rank of a category within the declared levels.
    pub fn level_rank(&self, value: &str) -> Option<usize> {
        self.levels.iter().position(|l| l == value)
    }

    /// Compare two values of this column in ascending order.
    ///
    /// Numbers compare numerically under IEEE total order, text compares
    /// ordinally, categories compare by declared level rank (or ordinally
    /// when no levels are declared).
    pub fn compare(&self, a: &CellValue, b: &CellValue) -> Ordering {
        match (a, b) {
            (CellValue::Number(x), CellValue::Number(y)) => x.total_cmp(y),
            (CellValue::Category(x), CellValue::Category(y)) if !self.levels.is_empty() => {
                match (self.level_rank(x), self.level_rank(y)) {
                    (Some(rx), Some(ry)) => rx.cmp(&ry),
                    _ => x.cmp(y),
                }
            }
            (CellValue::Text(x), CellValue::Text(y))
            | (CellValue::Category(x), CellValue::Category(y)) => x.cmp(y),
            // Mixed kinds never survive dataset validation; keep them put.
            _ => Ordering::Equal,
        }
    }

    /// Display text for a value of this column.
    pub fn format(&self, value: &CellValue) -> String {
        match value {
            CellValue::Number(n) => format!("{:.*}", self.precision, n),
            CellValue::Text(s) | CellValue::Category(s) => s.clone(),
        }
    }
}
