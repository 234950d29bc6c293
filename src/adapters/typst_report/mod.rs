//! Typst markup rendering.
//!
//! Fragments come from [`tables`] and [`chart_svg`]; [`resolve`] drops them
//! into a page template (the built-in default or a custom file via
//! `[render] template_path`) by replacing `{{PLACEHOLDER}}` markers.

pub mod chart_svg;
pub mod default_template;
pub mod tables;

use crate::domain::chart::{ChartDisplay, SliceDisplay};
use crate::domain::heatmap::HeatmapDisplay;
use crate::domain::table_view::TableDisplay;
use crate::ports::render_port::RenderPort;

#[derive(Debug, Clone, Copy, Default)]
pub struct TypstRenderer;

impl TypstRenderer {
    pub fn new() -> Self {
        Self
    }
}

/// Wrap an SVG string so Typst can embed it inline.
fn embed_svg(svg: &str, empty: &str) -> String {
    if svg.is_empty() {
        format!("_{}_\n", empty)
    } else {
        format!(
            "#image.decode(\n\"{}\",\n  width: 100%,\n)\n",
            svg.replace('\\', "\\\\").replace('"', "\\\"")
        )
    }
}

impl RenderPort for TypstRenderer {
    fn render_table(&self, table: &TableDisplay) -> String {
        format!(
            "== {}\n\n{}",
            tables::escape(&table.title),
            tables::format_table(table)
        )
    }

    fn render_heatmap(&self, heatmap: &HeatmapDisplay) -> String {
        let mut out = format!(
            "== {} ({})\n\n",
            tables::escape(&heatmap.title),
            heatmap.tab
        );
        out.push_str(&tables::format_heatmap(heatmap));
        if let Some(detail) = &heatmap.detail {
            out.push_str(&tables::format_cell_detail(detail));
        }
        out
    }

    fn render_chart(&self, chart: &ChartDisplay) -> String {
        format!(
            "== {} ({})\n\n{}",
            tables::escape(&chart.title),
            tables::escape(&chart.period),
            embed_svg(&chart_svg::generate_bar_svg(chart), "No chart data.")
        )
    }

    fn render_shares(&self, title: &str, slices: &[SliceDisplay]) -> String {
        format!(
            "== {}\n\n{}",
            tables::escape(title),
            embed_svg(&chart_svg::generate_donut_svg(slices), "No share data.")
        )
    }
}

/// Resolve `{{TITLE}}` and `{{BODY}}` in `template`.
///
/// Placeholders are only read from the template, never from the
/// substituted title or body.
pub fn resolve(template: &str, title: &str, body: &str) -> String {
    let title = tables::escape(title);
    template
        .split("{{BODY}}")
        .map(|part| part.replace("{{TITLE}}", &title))
        .collect::<Vec<_>>()
        .join(body)
}
