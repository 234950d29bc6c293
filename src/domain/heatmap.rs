//! Risk-metric heatmap.
//!
//! A heatmap is a table whose first column labels each fund and whose
//! remaining columns are numeric metrics. Cells are coloured through a
//! [`ColorScale`]; clicking a cell selects it and exposes a detail panel
//! until it is closed.

use std::fmt;

use crate::domain::choice::Choice;
use crate::domain::column::{CellValue, ValueKind};
use crate::domain::dataset::{Dataset, RowId};
use crate::domain::error::ConfigurationError;
use crate::domain::table_view::{HeaderCell, SelectionMode, TableEvent, TableView};

pub const DARK_TEXT: &str = "#1a2332";
pub const LIGHT_TEXT: &str = "#ffffff";

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ColorStep {
    pub lower_bound: f64,
    pub color: String,
}

/// Ordered `(lower_bound, color)` steps, highest bound first.
///
/// Lookup walks the steps top-down and takes the first whose bound the
/// value reaches; values below every bound get the floor color.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ColorScale {
    steps: Vec<ColorStep>,
    floor: String,
    light: Vec<String>,
}

impl ColorScale {
    pub fn new(steps: Vec<ColorStep>, floor: &str) -> Result<Self, ConfigurationError> {
        for step in &steps {
            if !step.lower_bound.is_finite() {
                return Err(ConfigurationError::ColorScale {
                    reason: format!("bound {} is not finite", step.lower_bound),
                });
            }
            if !is_hex_color(&step.color) {
                return Err(ConfigurationError::ColorScale {
                    reason: format!("{:?} is not a #RRGGBB color", step.color),
                });
            }
        }
        for pair in steps.windows(2) {
            if pair[1].lower_bound >= pair[0].lower_bound {
                return Err(ConfigurationError::ColorScale {
                    reason: format!(
                        "bounds must be strictly descending ({} then {})",
                        pair[0].lower_bound, pair[1].lower_bound
                    ),
                });
            }
        }
        if !is_hex_color(floor) {
            return Err(ConfigurationError::ColorScale {
                reason: format!("{floor:?} is not a #RRGGBB color"),
            });
        }
        Ok(Self {
            steps,
            floor: floor.to_uppercase(),
            light: Vec::new(),
        })
    }

    /// Red (high) through gold to blue (low), tuned for metrics in 4..8.
    pub fn risk_default() -> Self {
        let steps = [
            (7.5, "#FF4444"),
            (7.0, "#FF6B6B"),
            (6.5, "#FFA07A"),
            (6.0, "#FFB84D"),
            (5.5, "#FFD700"),
            (5.0, "#90EE90"),
            (4.5, "#7FD8FF"),
            (4.2, "#4DA6FF"),
        ]
        .into_iter()
        .map(|(lower_bound, color)| ColorStep {
            lower_bound,
            color: color.to_string(),
        })
        .collect();
        Self {
            steps,
            floor: "#0080FF".to_string(),
            light: vec!["#FFD700".into(), "#90EE90".into(), "#7FD8FF".into()],
        }
    }

    /// Parse `"7.5:#FF4444, 7:#FF6B6B"` style step lists.
    pub fn parse(spec: &str, floor: &str) -> Result<Self, ConfigurationError> {
        let mut steps = Vec::new();
        for token in spec.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            let (bound, color) =
                token
                    .split_once(':')
                    .ok_or_else(|| ConfigurationError::ColorScale {
                        reason: format!("expected bound:color, got {token:?}"),
                    })?;
            let lower_bound: f64 =
                bound
                    .trim()
                    .parse()
                    .map_err(|_| ConfigurationError::ColorScale {
                        reason: format!("invalid bound {:?}", bound.trim()),
                    })?;
            steps.push(ColorStep {
                lower_bound,
                color: color.trim().to_uppercase(),
            });
        }
        Self::new(steps, floor)
    }

    /// Backgrounds that take dark text.
    pub fn with_light(mut self, colors: &[&str]) -> Self {
        self.light = colors.iter().map(|c| c.to_uppercase()).collect();
        self
    }

    pub fn steps(&self) -> &[ColorStep] {
        &self.steps
    }

    pub fn floor(&self) -> &str {
        &self.floor
    }

    pub fn color_for(&self, value: f64) -> &str {
        self.steps
            .iter()
            .find(|s| value >= s.lower_bound)
            .map(|s| s.color.as_str())
            .unwrap_or(&self.floor)
    }

    pub fn text_color(&self, background: &str) -> &'static str {
        if self.light.iter().any(|c| c.eq_ignore_ascii_case(background)) {
            DARK_TEXT
        } else {
            LIGHT_TEXT
        }
    }
}

fn is_hex_color(s: &str) -> bool {
    s.len() == 7 && s.starts_with('#') && s[1..].chars().all(|c| c.is_ascii_hexdigit())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum MetricTab {
    Risk,
    Performance,
    Other,
}

impl MetricTab {
    pub const ALL: [MetricTab; 3] = [MetricTab::Risk, MetricTab::Performance, MetricTab::Other];

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "risk" => Some(MetricTab::Risk),
            "performance" => Some(MetricTab::Performance),
            "other" => Some(MetricTab::Other),
            _ => None,
        }
    }
}

impl fmt::Display for MetricTab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricTab::Risk => f.write_str("Risk"),
            MetricTab::Performance => f.write_str("Performance"),
            MetricTab::Other => f.write_str("Other"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct HeatmapCell {
    pub key: String,
    pub text: String,
    pub value: f64,
    pub background: String,
    pub foreground: &'static str,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct HeatmapRow {
    pub id: RowId,
    pub label: String,
    pub cells: Vec<HeatmapCell>,
}

/// Detail panel for the selected cell.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CellDetail {
    pub label: String,
    pub metric: String,
    pub text: String,
    pub background: String,
    pub foreground: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct HeatmapDisplay {
    pub title: String,
    pub tab: MetricTab,
    pub metrics: Vec<HeaderCell>,
    pub rows: Vec<HeatmapRow>,
    pub scale: ColorScale,
    pub detail: Option<CellDetail>,
}

pub struct HeatmapView<'a> {
    table: TableView<'a>,
    label_column: String,
    scale: ColorScale,
    tab: Choice<MetricTab>,
}

impl<'a> HeatmapView<'a> {
    /// `label_column` must be a text or enumerated column; every other
    /// column must be numeric.
    pub fn new(
        title: &str,
        dataset: &'a Dataset,
        label_column: &str,
        scale: ColorScale,
    ) -> Result<Self, ConfigurationError> {
        let label = dataset.require_column(label_column)?;
        if label.kind == ValueKind::Numeric {
            return Err(ConfigurationError::KindMismatch {
                row: 0,
                key: label_column.to_string(),
                expected: "text",
            });
        }
        if let Some(col) = dataset
            .columns()
            .iter()
            .find(|c| c.key != label_column && c.kind != ValueKind::Numeric)
        {
            return Err(ConfigurationError::KindMismatch {
                row: 0,
                key: col.key.clone(),
                expected: ValueKind::Numeric.name(),
            });
        }

        Ok(Self {
            table: TableView::new(title, dataset, SelectionMode::CellClick),
            label_column: label_column.to_string(),
            scale,
            tab: Choice::new(MetricTab::ALL.to_vec(), &MetricTab::Risk)?,
        })
    }

    pub fn select_cell(&mut self, row: RowId, metric: &str) -> Result<(), ConfigurationError> {
        if metric == self.label_column {
            return Err(ConfigurationError::UnknownColumn(metric.to_string()));
        }
        self.table
            .handle(TableEvent::CellClick(row, metric.to_string()))?;
        Ok(())
    }

    /// The detail panel's close action.
    pub fn close(&mut self) {
        // Close never fails.
        let _ = self.table.handle(TableEvent::Close);
    }

    pub fn select_tab(&mut self, tab: MetricTab) {
        // Every tab is in the option list.
        let _ = self.tab.select(&tab);
    }

    pub fn tab(&self) -> MetricTab {
        *self.tab.selected()
    }

    pub fn sort_by(&mut self, key: &str) -> Result<(), ConfigurationError> {
        self.table.set_sort_key(key)
    }

    pub fn display(&self) -> HeatmapDisplay {
        let table = self.table.display();

        let metrics: Vec<HeaderCell> = table
            .headers
            .into_iter()
            .filter(|h| h.key != self.label_column)
            .collect();

        let mut detail = None;
        let rows = table
            .rows
            .into_iter()
            .map(|row| {
                let label = row
                    .cells
                    .iter()
                    .find(|c| c.key == self.label_column)
                    .map(|c| c.text.clone())
                    .unwrap_or_default();
                let cells: Vec<HeatmapCell> = row
                    .cells
                    .into_iter()
                    .filter(|c| c.key != self.label_column)
                    .filter_map(|c| {
                        let CellValue::Number(value) = c.value else {
                            return None;
                        };
                        let background = self.scale.color_for(value).to_string();
                        let foreground = self.scale.text_color(&background);
                        Some(HeatmapCell {
                            key: c.key,
                            text: c.text,
                            value,
                            background,
                            foreground,
                            selected: c.active,
                        })
                    })
                    .collect();

                if let Some(cell) = cells.iter().find(|c| c.selected) {
                    let metric = metrics
                        .iter()
                        .find(|h| h.key == cell.key)
                        .map(|h| h.label.clone())
                        .unwrap_or_else(|| cell.key.clone());
                    detail = Some(CellDetail {
                        label: label.clone(),
                        metric,
                        text: cell.text.clone(),
                        background: cell.background.clone(),
                        foreground: cell.foreground,
                    });
                }

                HeatmapRow {
                    id: row.id,
                    label,
                    cells,
                }
            })
            .collect();

        HeatmapDisplay {
            title: table.title,
            tab: self.tab(),
            metrics,
            rows,
            scale: self.scale.clone(),
            detail,
        }
    }
}
