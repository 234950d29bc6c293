//! Bar-chart and share (donut) data for the performance widgets.

use crate::domain::choice::Choice;
use crate::domain::column::{CellValue, ValueKind};
use crate::domain::dataset::Dataset;
use crate::domain::error::ConfigurationError;

/// Number of gridline intervals on the value axis.
pub const AXIS_INTERVALS: usize = 6;

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Bar {
    pub label: String,
    pub value: f64,
    pub width_pct: f64,
    pub hovered: bool,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ChartDisplay {
    pub title: String,
    pub periods: Vec<String>,
    pub period: String,
    pub bars: Vec<Bar>,
    pub ticks: Vec<f64>,
}

/// Horizontal bars, one per labelled row, for whichever period is
/// selected. Periods are numeric columns of the dataset.
#[derive(Debug, Clone)]
pub struct BarChart {
    title: String,
    labels: Vec<String>,
    /// `values[row][period]`
    values: Vec<Vec<f64>>,
    period: Choice<String>,
    hovered: Option<usize>,
}

impl BarChart {
    pub fn from_dataset(
        title: &str,
        dataset: &Dataset,
        label_column: &str,
        periods: &[String],
        default_period: &str,
    ) -> Result<Self, ConfigurationError> {
        dataset.require_column(label_column)?;
        for p in periods {
            let col = dataset.require_column(p)?;
            if col.kind != ValueKind::Numeric {
                return Err(ConfigurationError::KindMismatch {
                    row: 0,
                    key: p.clone(),
                    expected: ValueKind::Numeric.name(),
                });
            }
        }

        let mut labels = Vec::with_capacity(dataset.len());
        let mut values = Vec::with_capacity(dataset.len());
        for id in dataset.row_ids() {
            let label = dataset
                .value(id, label_column)
                .map(|v| match v {
                    CellValue::Number(n) => n.to_string(),
                    CellValue::Text(s) | CellValue::Category(s) => s.clone(),
                })
                .unwrap_or_default();
            labels.push(label);
            values.push(
                periods
                    .iter()
                    .map(|p| {
                        dataset
                            .value(id, p)
                            .and_then(CellValue::as_number)
                            .unwrap_or(0.0)
                    })
                    .collect(),
            );
        }

        Ok(Self {
            title: title.to_string(),
            labels,
            values,
            period: Choice::new(periods.to_vec(), &default_period.to_string())?,
            hovered: None,
        })
    }

    pub fn select_period(&mut self, period: &str) -> Result<(), ConfigurationError> {
        self.period.select(&period.to_string())?;
        Ok(())
    }

    pub fn period(&self) -> &str {
        self.period.selected()
    }

    pub fn hover(&mut self, index: usize) {
        if index < self.labels.len() {
            self.hovered = Some(index);
        }
    }

    pub fn leave(&mut self) {
        self.hovered = None;
    }

    pub fn current_values(&self) -> Vec<f64> {
        let p = self.period.selected_index();
        self.values.iter().map(|row| row[p]).collect()
    }

    /// Largest value in the selected period, 0 for an empty chart.
    pub fn max_value(&self) -> f64 {
        self.current_values().into_iter().fold(0.0, f64::max)
    }

    /// Bar length as a percentage of the largest value.
    pub fn bar_width_pct(&self, index: usize) -> f64 {
        let max = self.max_value();
        match self.current_values().get(index) {
            Some(&v) if max > 0.0 => v / max * 100.0,
            _ => 0.0,
        }
    }

    /// Gridline values from 0 to the maximum in equal steps.
    pub fn axis_ticks(&self) -> Vec<f64> {
        let max = self.max_value();
        (0..=AXIS_INTERVALS)
            .map(|i| max / AXIS_INTERVALS as f64 * i as f64)
            .collect()
    }

    pub fn display(&self) -> ChartDisplay {
        let bars = self
            .labels
            .iter()
            .zip(self.current_values())
            .enumerate()
            .map(|(i, (label, value))| Bar {
                label: label.clone(),
                value,
                width_pct: self.bar_width_pct(i),
                hovered: self.hovered == Some(i),
            })
            .collect();

        ChartDisplay {
            title: self.title.clone(),
            periods: self.period.options().to_vec(),
            period: self.period().to_string(),
            bars,
            ticks: self.axis_ticks(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Slice {
    pub name: String,
    pub value: f64,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SliceDisplay {
    pub name: String,
    pub value: f64,
    pub percent: f64,
    pub color: String,
    pub opacity: f64,
}

/// Named shares of a whole, with hover emphasis.
#[derive(Debug, Clone, Default)]
pub struct ShareSet {
    slices: Vec<Slice>,
    hovered: Option<usize>,
}

impl ShareSet {
    pub fn new(slices: Vec<Slice>) -> Self {
        Self {
            slices,
            hovered: None,
        }
    }

    /// Parse `"Technology:28:#0EA5E9, Finance:22:#8B5CF6"`.
    pub fn parse(spec: &str) -> Result<Self, ConfigurationError> {
        let mut slices = Vec::new();
        for token in spec.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            let parts: Vec<&str> = token.split(':').map(str::trim).collect();
            let [name, value, color] = parts.as_slice() else {
                return Err(ConfigurationError::UnknownOption(token.to_string()));
            };
            let value: f64 = value
                .parse()
                .map_err(|_| ConfigurationError::UnknownOption(token.to_string()))?;
            if value < 0.0 {
                return Err(ConfigurationError::UnknownOption(token.to_string()));
            }
            slices.push(Slice {
                name: name.to_string(),
                value,
                color: color.to_string(),
            });
        }
        Ok(Self::new(slices))
    }

    pub fn total(&self) -> f64 {
        self.slices.iter().map(|s| s.value).sum()
    }

    /// Fraction of the total, 0 when the total is 0.
    pub fn percent(&self, index: usize) -> f64 {
        let total = self.total();
        match self.slices.get(index) {
            Some(s) if total > 0.0 => s.value / total,
            _ => 0.0,
        }
    }

    pub fn hover(&mut self, index: usize) {
        if index < self.slices.len() {
            self.hovered = Some(index);
        }
    }

    pub fn leave(&mut self) {
        self.hovered = None;
    }

    /// Full opacity for every slice when nothing is hovered, otherwise
    /// only for the hovered one.
    pub fn opacity(&self, index: usize) -> f64 {
        match self.hovered {
            None => 1.0,
            Some(h) if h == index => 1.0,
            Some(_) => 0.5,
        }
    }

    pub fn display(&self) -> Vec<SliceDisplay> {
        self.slices
            .iter()
            .enumerate()
            .map(|(i, s)| SliceDisplay {
                name: s.name.clone(),
                value: s.value,
                percent: self.percent(i),
                color: s.color.clone(),
                opacity: self.opacity(i),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::column::ColumnDescriptor;
    use crate::domain::dataset::RowRecord;
    use approx::assert_relative_eq;

    fn performance() -> Dataset {
        Dataset::new(
            vec![
                ColumnDescriptor::text("company", "Company"),
                ColumnDescriptor::numeric("1m", "1 month", 2),
                ColumnDescriptor::numeric("6m", "6 months", 2),
            ],
            vec![
                RowRecord::new()
                    .with("company", "Atlas")
                    .with("1m", 2.0)
                    .with("6m", 30.0),
                RowRecord::new()
                    .with("company", "Deniz")
                    .with("1m", 4.0)
                    .with("6m", 15.0),
            ],
        )
        .unwrap()
    }

    fn periods() -> Vec<String> {
        vec!["1m".to_string(), "6m".to_string()]
    }

    #[test]
    fn widths_are_relative_to_max() {
        let ds = performance();
        let chart = BarChart::from_dataset("Perf", &ds, "company", &periods(), "6m").unwrap();
        assert_relative_eq!(chart.bar_width_pct(0), 100.0);
        assert_relative_eq!(chart.bar_width_pct(1), 50.0);
    }

    #[test]
    fn switching_period_changes_widths() {
        let ds = performance();
        let mut chart = BarChart::from_dataset("Perf", &ds, "company", &periods(), "6m").unwrap();
        chart.select_period("1m").unwrap();
        assert_eq!(chart.period(), "1m");
        assert_relative_eq!(chart.bar_width_pct(0), 50.0);
        assert_relative_eq!(chart.bar_width_pct(1), 100.0);
    }

    #[test]
    fn unknown_period_is_rejected() {
        let ds = performance();
        let mut chart = BarChart::from_dataset("Perf", &ds, "company", &periods(), "6m").unwrap();
        assert!(chart.select_period("5y").is_err());
        assert_eq!(chart.period(), "6m");
        assert!(BarChart::from_dataset("Perf", &ds, "company", &periods(), "5y").is_err());
    }

    #[test]
    fn ticks_divide_max_in_six() {
        let ds = performance();
        let chart = BarChart::from_dataset("Perf", &ds, "company", &periods(), "6m").unwrap();
        let ticks = chart.axis_ticks();
        assert_eq!(ticks.len(), 7);
        assert_relative_eq!(ticks[0], 0.0);
        assert_relative_eq!(ticks[3], 15.0);
        assert_relative_eq!(ticks[6], 30.0);
    }

    #[test]
    fn empty_chart_has_zero_widths() {
        let ds = Dataset::empty(vec![
            ColumnDescriptor::text("company", "Company"),
            ColumnDescriptor::numeric("1m", "1 month", 2),
        ])
        .unwrap();
        let chart =
            BarChart::from_dataset("Perf", &ds, "company", &["1m".to_string()], "1m").unwrap();
        assert_relative_eq!(chart.max_value(), 0.0);
        assert_relative_eq!(chart.bar_width_pct(0), 0.0);
        assert!(chart.display().bars.is_empty());
    }

    #[test]
    fn hover_marks_one_bar() {
        let ds = performance();
        let mut chart = BarChart::from_dataset("Perf", &ds, "company", &periods(), "6m").unwrap();
        chart.hover(1);
        let bars = chart.display().bars;
        assert!(!bars[0].hovered);
        assert!(bars[1].hovered);
        chart.leave();
        assert!(chart.display().bars.iter().all(|b| !b.hovered));
    }

    #[test]
    fn period_columns_must_be_numeric() {
        let ds = performance();
        let err =
            BarChart::from_dataset("Perf", &ds, "company", &["company".to_string()], "company")
                .unwrap_err();
        assert!(matches!(err, ConfigurationError::KindMismatch { .. }));
    }

    #[test]
    fn shares_percent_of_total() {
        let set = ShareSet::parse("Technology:28:#0EA5E9, Finance:22:#8B5CF6, Other:50:#6B7280")
            .unwrap();
        assert_relative_eq!(set.total(), 100.0);
        assert_relative_eq!(set.percent(0), 0.28);
        assert_relative_eq!(set.percent(9), 0.0);
    }

    #[test]
    fn hovering_a_slice_dims_the_rest() {
        let mut set = ShareSet::parse("A:1:#000000, B:1:#FFFFFF").unwrap();
        assert_relative_eq!(set.opacity(1), 1.0);
        set.hover(0);
        assert_relative_eq!(set.opacity(0), 1.0);
        assert_relative_eq!(set.opacity(1), 0.5);
        set.leave();
        assert_relative_eq!(set.opacity(1), 1.0);
    }

    #[test]
    fn malformed_slices_are_rejected() {
        assert!(ShareSet::parse("Technology:28").is_err());
        assert!(ShareSet::parse("Technology:lots:#000000").is_err());
        assert!(ShareSet::parse("Technology:-1:#000000").is_err());
    }
}
