//! Sort controller: active sort column, direction and derived row order.
//!
//! Ordering is computed over row indices, never by reordering the dataset.
//! Descending order flips the comparator, not the finished list, so rows
//! that compare equal keep their original relative order in both
//! directions.

use std::fmt;

use tracing::debug;

use crate::domain::dataset::{Dataset, RowId, RowRecord};
use crate::domain::error::ConfigurationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "asc" | "ascending" => Some(SortDirection::Ascending),
            "desc" | "descending" => Some(SortDirection::Descending),
            _ => None,
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Ascending => f.write_str("asc"),
            SortDirection::Descending => f.write_str("desc"),
        }
    }
}

/// The currently active sort column and direction.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SortState {
    pub key: Option<String>,
    pub direction: SortDirection,
}

impl SortState {
    pub fn unsorted() -> Self {
        Self::default()
    }

    pub fn by(key: &str, direction: SortDirection) -> Self {
        Self {
            key: Some(key.to_string()),
            direction,
        }
    }

    pub fn is_active(&self, key: &str) -> bool {
        self.key.as_deref() == Some(key)
    }
}

#[derive(Debug, Clone, Default)]
pub struct SortController {
    state: SortState,
}

impl SortController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: SortState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &SortState {
        &self.state
    }

    /// Header-click transition: the active key flips direction, any other
    /// key becomes active in ascending order.
    pub fn set_sort_key(&mut self, key: &str) {
        if self.state.is_active(key) {
            self.state.direction = self.state.direction.flipped();
        } else {
            self.state.key = Some(key.to_string());
            self.state.direction = SortDirection::Ascending;
        }
        debug!(key, direction = %self.state.direction, "sort key set");
    }

    /// Back to the original dataset order.
    pub fn clear(&mut self) {
        self.state = SortState::unsorted();
        debug!("sort cleared");
    }

    pub fn ordered_rows(&self, dataset: &Dataset) -> Result<Vec<RowId>, ConfigurationError> {
        ordered_rows(dataset, &self.state)
    }
}

/// Row identities in display order for `state`.
pub fn ordered_rows(dataset: &Dataset, state: &SortState) -> Result<Vec<RowId>, ConfigurationError> {
    let mut ids: Vec<RowId> = dataset.row_ids().collect();

    let Some(key) = state.key.as_deref() else {
        return Ok(ids);
    };
    let column = dataset.require_column(key)?;

    // `sort_by` is stable; equal values keep their dataset order.
    ids.sort_by(|&a, &b| {
        let ord = match (dataset.value(a, key), dataset.value(b, key)) {
            (Some(va), Some(vb)) => column.compare(va, vb),
            _ => std::cmp::Ordering::Equal,
        };
        match state.direction {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    });

    Ok(ids)
}

/// Records in display order for `state`.
pub fn ordered_records<'a>(
    dataset: &'a Dataset,
    state: &SortState,
) -> Result<Vec<&'a RowRecord>, ConfigurationError> {
    Ok(ordered_rows(dataset, state)?
        .into_iter()
        .filter_map(|id| dataset.row(id))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::column::{CellValue, ColumnDescriptor};

    fn companies() -> Dataset {
        Dataset::new(
            vec![
                ColumnDescriptor::text("company", "Company"),
                ColumnDescriptor::numeric("points", "Points", 0),
            ],
            vec![
                RowRecord::new().with("company", "B").with("points", 5.0),
                RowRecord::new().with("company", "A").with("points", 5.0),
                RowRecord::new().with("company", "C").with("points", 9.0),
            ],
        )
        .unwrap()
    }

    fn names(ds: &Dataset, state: &SortState) -> Vec<String> {
        ordered_records(ds, state)
            .unwrap()
            .iter()
            .map(|r| match r.get("company") {
                Some(CellValue::Text(s)) => s.clone(),
                other => panic!("unexpected {other:?}"),
            })
            .collect()
    }

    #[test]
    fn unsorted_keeps_dataset_order() {
        let ds = companies();
        assert_eq!(names(&ds, &SortState::unsorted()), ["B", "A", "C"]);
    }

    #[test]
    fn ascending_keeps_tie_order() {
        let ds = companies();
        let state = SortState::by("points", SortDirection::Ascending);
        assert_eq!(names(&ds, &state), ["B", "A", "C"]);
    }

    #[test]
    fn descending_keeps_tie_order() {
        let ds = companies();
        let state = SortState::by("points", SortDirection::Descending);
        assert_eq!(names(&ds, &state), ["C", "B", "A"]);
    }

    #[test]
    fn text_column_sorts_ordinally() {
        let ds = companies();
        let state = SortState::by("company", SortDirection::Ascending);
        assert_eq!(names(&ds, &state), ["A", "B", "C"]);
    }

    #[test]
    fn header_clicks_toggle_then_switch() {
        let mut sc = SortController::new();
        sc.set_sort_key("points");
        assert_eq!(sc.state(), &SortState::by("points", SortDirection::Ascending));
        sc.set_sort_key("points");
        assert_eq!(sc.state(), &SortState::by("points", SortDirection::Descending));
        sc.set_sort_key("company");
        assert_eq!(sc.state(), &SortState::by("company", SortDirection::Ascending));
    }

    #[test]
    fn clear_returns_to_original_order() {
        let ds = companies();
        let mut sc = SortController::new();
        sc.set_sort_key("company");
        sc.clear();
        assert_eq!(sc.state(), &SortState::unsorted());
        assert_eq!(
            sc.ordered_rows(&ds).unwrap(),
            vec![RowId(0), RowId(1), RowId(2)]
        );
    }

    #[test]
    fn unknown_key_is_a_configuration_error() {
        let ds = companies();
        let state = SortState::by("budget", SortDirection::Ascending);
        assert_eq!(
            ordered_rows(&ds, &state).unwrap_err(),
            ConfigurationError::UnknownColumn("budget".into())
        );
    }

    #[test]
    fn empty_dataset_sorts_to_empty() {
        let ds = Dataset::empty(vec![ColumnDescriptor::text("company", "Company")]).unwrap();
        let state = SortState::by("company", SortDirection::Descending);
        assert!(ordered_rows(&ds, &state).unwrap().is_empty());
    }

    #[test]
    fn sorting_does_not_touch_the_dataset() {
        let ds = companies();
        let before: Vec<_> = ds.rows().to_vec();
        let _ = ordered_rows(&ds, &SortState::by("points", SortDirection::Descending)).unwrap();
        assert_eq!(ds.rows(), before.as_slice());
    }

    #[test]
    fn parses_direction_names() {
        assert_eq!(SortDirection::parse("DESC"), Some(SortDirection::Descending));
        assert_eq!(SortDirection::parse("ascending"), Some(SortDirection::Ascending));
        assert_eq!(SortDirection::parse("up"), None);
    }
}
