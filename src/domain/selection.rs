//! Single-select emphasis state for a table.
//!
//! Holds at most one active row or one active (row, column) cell. Click
//! selections persist until replaced or cleared; hover selections are
//! dropped by [`SelectionState::leave`].

use tracing::debug;

use crate::domain::dataset::RowId;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Selection {
    #[default]
    None,
    Row(RowId),
    Cell { row: RowId, column: String },
}

/// How the active selection was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Origin {
    Click,
    Hover,
}

#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    active: Selection,
    origin: Option<Origin>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> &Selection {
        &self.active
    }

    pub fn is_empty(&self) -> bool {
        self.active == Selection::None
    }

    pub fn select(&mut self, row: RowId) {
        self.set(Selection::Row(row), Origin::Click);
    }

    pub fn select_cell(&mut self, row: RowId, column: &str) {
        self.set(
            Selection::Cell {
                row,
                column: column.to_string(),
            },
            Origin::Click,
        );
    }

    pub fn hover(&mut self, row: RowId) {
        self.set(Selection::Row(row), Origin::Hover);
    }

    pub fn hover_cell(&mut self, row: RowId, column: &str) {
        self.set(
            Selection::Cell {
                row,
                column: column.to_string(),
            },
            Origin::Hover,
        );
    }

    /// Pointer left the table. Only hover-made emphasis is dropped.
    pub fn leave(&mut self) {
        if self.origin == Some(Origin::Hover) {
            self.clear();
        }
    }

    pub fn clear(&mut self) {
        self.active = Selection::None;
        self.origin = None;
        debug!("selection cleared");
    }

    /// True when `row` is the active row, or holds the active cell.
    pub fn is_active(&self, row: RowId) -> bool {
        match &self.active {
            Selection::Row(r) => *r == row,
            Selection::Cell { row: r, .. } => *r == row,
            Selection::None => false,
        }
    }

    pub fn is_cell_active(&self, row: RowId, column: &str) -> bool {
        matches!(&self.active, Selection::Cell { row: r, column: c } if *r == row && c == column)
    }

    fn set(&mut self, selection: Selection, origin: Origin) {
        debug!(?selection, ?origin, "selection set");
        self.active = selection;
        self.origin = Some(origin);
    }
}
