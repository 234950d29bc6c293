//! Rendering port trait.

use crate::domain::chart::{ChartDisplay, SliceDisplay};
use crate::domain::heatmap::HeatmapDisplay;
use crate::domain::table_view::TableDisplay;

/// Turns display models into an output document.
pub trait RenderPort {
    fn render_table(&self, table: &TableDisplay) -> String;

    fn render_heatmap(&self, heatmap: &HeatmapDisplay) -> String;

    fn render_chart(&self, chart: &ChartDisplay) -> String;

    fn render_shares(&self, title: &str, slices: &[SliceDisplay]) -> String;
}
