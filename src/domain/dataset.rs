//! Row datasets.
//!
//! A [`Dataset`] pairs a fixed set of [`ColumnDescriptor`]s with rows that
//! supply a value for every column. All validation happens in
//! [`Dataset::new`]; once built, a dataset is read-only.

use std::collections::{HashMap, HashSet};

use crate::domain::column::{CellValue, ColumnDescriptor, ValueKind};
use crate::domain::error::ConfigurationError;

/// Identity of a row: its position in the original dataset.
///
/// Identity never changes when the displayed order does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RowId(pub usize);

/// One data item displayed as a table row.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RowRecord {
    values: HashMap<String, CellValue>,
}

impl RowRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: &str, value: impl Into<CellValue>) -> Self {
        self.values.insert(key.to_string(), value.into());
        self
    }

    pub fn insert(&mut self, key: &str, value: CellValue) {
        self.values.insert(key.to_string(), value);
    }

    pub fn get(&self, key: &str) -> Option<&CellValue> {
        self.values.get(key)
    }
}

impl<K: Into<String>, V: Into<CellValue>> FromIterator<(K, V)> for RowRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Dataset {
    columns: Vec<ColumnDescriptor>,
    rows: Vec<RowRecord>,
}

impl Dataset {
    /// Build a dataset, failing fast on any disagreement between the column
    /// declarations and the rows.
    ///
    /// Text columns accept categories and vice versa so that a CSV loader
    /// may hand over plain strings; the stored value is normalised to the
    /// column's kind.
    pub fn new(
        columns: Vec<ColumnDescriptor>,
        rows: Vec<RowRecord>,
    ) -> Result<Self, ConfigurationError> {
        validate_columns(&columns)?;

        let mut normalised = Vec::with_capacity(rows.len());
        for (idx, mut row) in rows.into_iter().enumerate() {
            for col in &columns {
                let value = row.values.remove(&col.key).ok_or_else(|| {
                    ConfigurationError::MissingCell {
                        row: idx,
                        key: col.key.clone(),
                    }
                })?;
                let value = coerce(idx, col, value)?;
                row.values.insert(col.key.clone(), value);
            }
            normalised.push(row);
        }

        Ok(Self {
            columns,
            rows: normalised,
        })
    }

    pub fn empty(columns: Vec<ColumnDescriptor>) -> Result<Self, ConfigurationError> {
        Self::new(columns, Vec::new())
    }

    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    pub fn column(&self, key: &str) -> Option<&ColumnDescriptor> {
        self.columns.iter().find(|c| c.key == key)
    }

    pub fn rows(&self) -> &[RowRecord] {
        &self.rows
    }

    pub fn row(&self, id: RowId) -> Option<&RowRecord> {
        self.rows.get(id.0)
    }

    pub fn row_ids(&self) -> impl Iterator<Item = RowId> + '_ {
        (0..self.rows.len()).map(RowId)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Value at `(row, key)`. Every validated row has every declared column.
    pub fn value(&self, id: RowId, key: &str) -> Option<&CellValue> {
        self.row(id).and_then(|r| r.get(key))
    }

    /// Check that `key` names a declared column.
    pub fn require_column(&self, key: &str) -> Result<&ColumnDescriptor, ConfigurationError> {
        self.column(key)
            .ok_or_else(|| ConfigurationError::UnknownColumn(key.to_string()))
    }
}

fn validate_columns(columns: &[ColumnDescriptor]) -> Result<(), ConfigurationError> {
    let mut seen = HashSet::new();
    for col in columns {
        if col.key.trim().is_empty() {
            return Err(ConfigurationError::EmptyColumnKey);
        }
        if !seen.insert(col.key.as_str()) {
            return Err(ConfigurationError::DuplicateColumn(col.key.clone()));
        }
    }
    Ok(())
}

fn coerce(
    row: usize,
    col: &ColumnDescriptor,
    value: CellValue,
) -> Result<CellValue, ConfigurationError> {
    let mismatch = || ConfigurationError::KindMismatch {
        row,
        key: col.key.clone(),
        expected: col.kind.name(),
    };

    match (col.kind, value) {
        (ValueKind::Numeric, CellValue::Number(n)) => Ok(CellValue::Number(n)),
        (ValueKind::Numeric, _) => Err(mismatch()),
        (ValueKind::Text, CellValue::Text(s) | CellValue::Category(s)) => Ok(CellValue::Text(s)),
        (ValueKind::Enumerated, CellValue::Text(s) | CellValue::Category(s)) => {
            if !col.levels.is_empty() && col.level_rank(&s).is_none() {
                return Err(ConfigurationError::UnknownLevel {
                    row,
                    key: col.key.clone(),
                    value: s,
                });
            }
            Ok(CellValue::Category(s))
        }
        (_, CellValue::Number(_)) => Err(mismatch()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns() -> Vec<ColumnDescriptor> {
        vec![
            ColumnDescriptor::text("company", "Company"),
            ColumnDescriptor::numeric("points", "Points", 0),
        ]
    }

    #[test]
    fn builds_with_every_cell_present() {
        let ds = Dataset::new(
            columns(),
            vec![
                RowRecord::new().with("company", "B").with("points", 5.0),
                RowRecord::new().with("company", "A").with("points", 5.0),
            ],
        )
        .unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(
            ds.value(RowId(1), "company"),
            Some(&CellValue::Text("A".into()))
        );
    }

    #[test]
    fn missing_cell_is_a_configuration_error() {
        let err = Dataset::new(
            columns(),
            vec![RowRecord::new().with("company", "B")],
        )
        .unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::MissingCell {
                row: 0,
                key: "points".into()
            }
        );
    }

    #[test]
    fn duplicate_keys_are_rejected() {
        let cols = vec![
            ColumnDescriptor::text("company", "Company"),
            ColumnDescriptor::text("company", "Again"),
        ];
        assert_eq!(
            Dataset::empty(cols).unwrap_err(),
            ConfigurationError::DuplicateColumn("company".into())
        );
    }

    #[test]
    fn empty_key_is_rejected() {
        let cols = vec![ColumnDescriptor::text(" ", "Blank")];
        assert_eq!(
            Dataset::empty(cols).unwrap_err(),
            ConfigurationError::EmptyColumnKey
        );
    }

    #[test]
    fn text_in_numeric_column_is_a_kind_mismatch() {
        let err = Dataset::new(
            columns(),
            vec![RowRecord::new().with("company", "B").with("points", "five")],
        )
        .unwrap_err();
        assert!(matches!(err, ConfigurationError::KindMismatch { key, .. } if key == "points"));
    }

    #[test]
    fn enumerated_values_must_be_declared_levels() {
        let cols = vec![ColumnDescriptor::enumerated(
            "risk",
            "Risk",
            &["Low", "Medium", "High"],
        )];
        let err = Dataset::new(cols, vec![RowRecord::new().with("risk", "Extreme")]).unwrap_err();
        assert!(matches!(err, ConfigurationError::UnknownLevel { value, .. } if value == "Extreme"));
    }

    #[test]
    fn strings_are_normalised_to_categories() {
        let cols = vec![ColumnDescriptor::enumerated("risk", "Risk", &["Low", "High"])];
        let ds = Dataset::new(cols, vec![RowRecord::new().with("risk", "High")]).unwrap();
        assert_eq!(
            ds.value(RowId(0), "risk"),
            Some(&CellValue::Category("High".into()))
        );
    }

    #[test]
    fn extra_fields_are_kept_out_of_the_way() {
        let ds = Dataset::new(
            columns(),
            vec![
                RowRecord::new()
                    .with("company", "B")
                    .with("points", 5.0)
                    .with("note", "ignored"),
            ],
        )
        .unwrap();
        assert_eq!(ds.columns().len(), 2);
        assert!(ds.require_column("note").is_err());
    }

    #[test]
    fn empty_dataset_is_valid() {
        let ds = Dataset::empty(columns()).unwrap();
        assert!(ds.is_empty());
        assert_eq!(ds.row_ids().count(), 0);
    }
}
