//! Table view: owns sort and selection state for one table instance and
//! derives what should be displayed.
//!
//! The dataset is borrowed read-only; every interaction goes through
//! [`TableView::handle`] and mutates only this view's own state.

use crate::domain::column::CellValue;
use crate::domain::dataset::{Dataset, RowId};
use crate::domain::error::ConfigurationError;
use crate::domain::selection::{Selection, SelectionState};
use crate::domain::sort::{SortController, SortDirection, SortState};

/// Which interactions drive emphasis in a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum SelectionMode {
    /// Clicking a row selects it until another row is clicked or the
    /// selection is closed.
    #[default]
    RowClick,
    /// Hovering a row emphasises it until the pointer leaves.
    RowHover,
    /// Clicking a cell selects that (row, column) pair.
    CellClick,
}

impl SelectionMode {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "row_click" | "click" => Some(SelectionMode::RowClick),
            "row_hover" | "hover" => Some(SelectionMode::RowHover),
            "cell_click" | "cell" => Some(SelectionMode::CellClick),
            _ => None,
        }
    }
}

/// A discrete user interaction with the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableEvent {
    HeaderClick(String),
    RowClick(RowId),
    CellClick(RowId, String),
    RowHover(RowId),
    CellHover(RowId, String),
    HoverLeave,
    Close,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum SortIndicator {
    Ascending,
    Descending,
    Neutral,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct HeaderCell {
    pub key: String,
    pub label: String,
    pub indicator: SortIndicator,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DisplayCell {
    pub key: String,
    pub text: String,
    pub value: CellValue,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DisplayRow {
    pub id: RowId,
    pub active: bool,
    pub cells: Vec<DisplayCell>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TableDisplay {
    pub title: String,
    pub headers: Vec<HeaderCell>,
    pub rows: Vec<DisplayRow>,
}

impl TableDisplay {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn active_row(&self) -> Option<&DisplayRow> {
        self.rows.iter().find(|r| r.active)
    }
}

pub struct TableView<'a> {
    title: String,
    dataset: &'a Dataset,
    mode: SelectionMode,
    sort: SortController,
    selection: SelectionState,
}

impl<'a> TableView<'a> {
    pub fn new(title: &str, dataset: &'a Dataset, mode: SelectionMode) -> Self {
        Self {
            title: title.to_string(),
            dataset,
            mode,
            sort: SortController::new(),
            selection: SelectionState::new(),
        }
    }

    /// Start from a preset sort instead of the dataset order.
    pub fn with_initial_sort(mut self, state: SortState) -> Result<Self, ConfigurationError> {
        if let Some(key) = state.key.as_deref() {
            self.dataset.require_column(key)?;
        }
        self.sort = SortController::with_state(state);
        Ok(self)
    }

    pub fn dataset(&self) -> &Dataset {
        self.dataset
    }

    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    pub fn sort_state(&self) -> &SortState {
        self.sort.state()
    }

    pub fn selection(&self) -> &Selection {
        self.selection.active()
    }

    /// Header click on `key`.
    pub fn set_sort_key(&mut self, key: &str) -> Result<(), ConfigurationError> {
        self.dataset.require_column(key)?;
        self.sort.set_sort_key(key);
        Ok(())
    }

    pub fn clear_sort(&mut self) {
        self.sort.clear();
    }

    pub fn ordered_rows(&self) -> Vec<RowId> {
        // Keys are checked on the way in, so the active key always exists.
        self.sort
            .ordered_rows(self.dataset)
            .unwrap_or_else(|_| self.dataset.row_ids().collect())
    }

    /// Apply one interaction. Returns whether the event applied to this
    /// view's selection mode; events that do not apply leave state as is.
    pub fn handle(&mut self, event: TableEvent) -> Result<bool, ConfigurationError> {
        match event {
            TableEvent::HeaderClick(key) => {
                self.set_sort_key(&key)?;
                Ok(true)
            }
            TableEvent::RowClick(row) => {
                self.check_row(row)?;
                match self.mode {
                    SelectionMode::RowClick => {
                        self.selection.select(row);
                        Ok(true)
                    }
                    _ => Ok(false),
                }
            }
            TableEvent::CellClick(row, column) => {
                self.check_cell(row, &column)?;
                match self.mode {
                    SelectionMode::RowClick => self.selection.select(row),
                    SelectionMode::CellClick => self.selection.select_cell(row, &column),
                    SelectionMode::RowHover => return Ok(false),
                }
                Ok(true)
            }
            TableEvent::RowHover(row) => {
                self.check_row(row)?;
                match self.mode {
                    SelectionMode::RowHover => {
                        self.selection.hover(row);
                        Ok(true)
                    }
                    _ => Ok(false),
                }
            }
            TableEvent::CellHover(row, column) => {
                self.check_cell(row, &column)?;
                match self.mode {
                    SelectionMode::RowHover => {
                        self.selection.hover(row);
                        Ok(true)
                    }
                    _ => Ok(false),
                }
            }
            TableEvent::HoverLeave => {
                self.selection.leave();
                Ok(true)
            }
            TableEvent::Close => {
                self.selection.clear();
                Ok(true)
            }
        }
    }

    pub fn is_active(&self, row: RowId) -> bool {
        self.selection.is_active(row)
    }

    pub fn is_cell_active(&self, row: RowId, column: &str) -> bool {
        self.selection.is_cell_active(row, column)
    }

    pub fn display(&self) -> TableDisplay {
        let state = self.sort.state();
        let headers = self
            .dataset
            .columns()
            .iter()
            .map(|col| HeaderCell {
                key: col.key.clone(),
                label: col.label.clone(),
                indicator: match (state.is_active(&col.key), state.direction) {
                    (true, SortDirection::Ascending) => SortIndicator::Ascending,
                    (true, SortDirection::Descending) => SortIndicator::Descending,
                    (false, _) => SortIndicator::Neutral,
                },
            })
            .collect();

        let rows = self
            .ordered_rows()
            .into_iter()
            .filter_map(|id| {
                let record = self.dataset.row(id)?;
                let cells = self
                    .dataset
                    .columns()
                    .iter()
                    .filter_map(|col| {
                        let value = record.get(&col.key)?.clone();
                        Some(DisplayCell {
                            key: col.key.clone(),
                            text: col.format(&value),
                            active: self.selection.is_cell_active(id, &col.key),
                            value,
                        })
                    })
                    .collect();
                Some(DisplayRow {
                    id,
                    active: self.selection.is_active(id),
                    cells,
                })
            })
            .collect();

        TableDisplay {
            title: self.title.clone(),
            headers,
            rows,
        }
    }

    fn check_row(&self, row: RowId) -> Result<(), ConfigurationError> {
        match self.dataset.row(row) {
            Some(_) => Ok(()),
            None => Err(ConfigurationError::UnknownRow(row.0)),
        }
    }

    fn check_cell(&self, row: RowId, column: &str) -> Result<(), ConfigurationError> {
        self.check_row(row)?;
        self.dataset.require_column(column)?;
        Ok(())
    }
}
