//! Plain-text terminal renderer.
//!
//! Tables are laid out as fixed-width grids. Sort indicators are `▲`, `▼`
//! and `↕`; the active row carries a `>` marker and the active cell is
//! wrapped in brackets. With `color` enabled, heatmap cells get 24-bit ANSI
//! backgrounds.

use crate::domain::chart::{ChartDisplay, SliceDisplay};
use crate::domain::column::CellValue;
use crate::domain::heatmap::HeatmapDisplay;
use crate::domain::table_view::{SortIndicator, TableDisplay};
use crate::ports::render_port::RenderPort;

const BAR_WIDTH: usize = 40;
const SEPARATOR: &str = " | ";

#[derive(Debug, Clone, Copy, Default)]
pub struct TextRenderer {
    pub color: bool,
}

impl TextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_color(color: bool) -> Self {
        Self { color }
    }
}

pub fn indicator_glyph(indicator: SortIndicator) -> &'static str {
    match indicator {
        SortIndicator::Ascending => "▲",
        SortIndicator::Descending => "▼",
        SortIndicator::Neutral => "↕",
    }
}

fn width(s: &str) -> usize {
    s.chars().count()
}

fn pad_left(s: &str, w: usize) -> String {
    format!("{}{}", " ".repeat(w.saturating_sub(width(s))), s)
}

fn pad_right(s: &str, w: usize) -> String {
    format!("{}{}", s, " ".repeat(w.saturating_sub(width(s))))
}

fn hex_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some((r, g, b))
}

fn ansi_paint(text: &str, background: &str, foreground: &str) -> String {
    match (hex_rgb(background), hex_rgb(foreground)) {
        (Some((br, bg, bb)), Some((fr, fg, fb))) => format!(
            "\x1b[48;2;{br};{bg};{bb}m\x1b[38;2;{fr};{fg};{fb}m{text}\x1b[0m"
        ),
        _ => text.to_string(),
    }
}

fn bar(width_pct: f64) -> String {
    let filled = ((width_pct / 100.0) * BAR_WIDTH as f64).round().clamp(0.0, BAR_WIDTH as f64);
    "█".repeat(filled as usize)
}

impl RenderPort for TextRenderer {
    fn render_table(&self, table: &TableDisplay) -> String {
        let headers: Vec<String> = table
            .headers
            .iter()
            .map(|h| format!("{} {}", h.label, indicator_glyph(h.indicator)))
            .collect();

        let body: Vec<Vec<(String, bool)>> = table
            .rows
            .iter()
            .map(|row| {
                row.cells
                    .iter()
                    .map(|c| {
                        let text = if c.active {
                            format!("[{}]", c.text)
                        } else {
                            c.text.clone()
                        };
                        (text, matches!(c.value, CellValue::Number(_)))
                    })
                    .collect()
            })
            .collect();

        let widths: Vec<usize> = headers
            .iter()
            .enumerate()
            .map(|(i, h)| {
                body.iter()
                    .filter_map(|r| r.get(i))
                    .map(|(t, _)| width(t))
                    .chain(std::iter::once(width(h)))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let mut out = String::new();
        out.push_str(&table.title);
        out.push('\n');

        let header_line: Vec<String> = headers
            .iter()
            .zip(&widths)
            .map(|(h, &w)| pad_right(h, w))
            .collect();
        out.push_str("  ");
        out.push_str(header_line.join(SEPARATOR).trim_end());
        out.push('\n');

        let total: usize = widths.iter().sum::<usize>() + SEPARATOR.len() * widths.len().saturating_sub(1);
        out.push_str("  ");
        out.push_str(&"-".repeat(total));
        out.push('\n');

        if table.is_empty() {
            out.push_str("  (no rows)\n");
            return out;
        }

        for (row, cells) in table.rows.iter().zip(&body) {
            out.push_str(if row.active { "> " } else { "  " });
            let line: Vec<String> = cells
                .iter()
                .zip(&widths)
                .map(|((text, numeric), &w)| {
                    if *numeric {
                        pad_left(text, w)
                    } else {
                        pad_right(text, w)
                    }
                })
                .collect();
            out.push_str(line.join(SEPARATOR).trim_end());
            out.push('\n');
        }

        out
    }

    fn render_heatmap(&self, heatmap: &HeatmapDisplay) -> String {
        let label_width = heatmap
            .rows
            .iter()
            .map(|r| width(&r.label))
            .max()
            .unwrap_or(0);
        let cell_width = heatmap
            .metrics
            .iter()
            .map(|m| width(&m.label))
            .chain(
                heatmap
                    .rows
                    .iter()
                    .flat_map(|r| r.cells.iter().map(|c| width(&c.text) + 2)),
            )
            .max()
            .unwrap_or(0);

        let mut out = String::new();
        out.push_str(&format!("{} [{}]\n", heatmap.title, heatmap.tab));

        let mut header = pad_right("", label_width);
        for m in &heatmap.metrics {
            header.push_str(SEPARATOR);
            header.push_str(&pad_left(&m.label, cell_width));
        }
        out.push_str(header.trim_end());
        out.push('\n');

        for row in &heatmap.rows {
            let mut line = pad_right(&row.label, label_width);
            for cell in &row.cells {
                line.push_str(SEPARATOR);
                let text = if cell.selected {
                    format!("[{}]", cell.text)
                } else {
                    format!(" {} ", cell.text)
                };
                let padded = pad_left(&text, cell_width);
                if self.color {
                    line.push_str(&ansi_paint(&padded, &cell.background, cell.foreground));
                } else {
                    line.push_str(&padded);
                }
            }
            out.push_str(line.trim_end());
            out.push('\n');
        }

        out.push_str("\nScale:");
        for step in heatmap.scale.steps() {
            out.push_str(&format!(" >={:.2} {}", step.lower_bound, step.color));
        }
        out.push_str(&format!(" else {}\n", heatmap.scale.floor()));

        if let Some(detail) = &heatmap.detail {
            out.push_str(&format!(
                "\nSelected: {} / {} = {} ({})\n",
                detail.label, detail.metric, detail.text, detail.background
            ));
        }

        out
    }

    fn render_chart(&self, chart: &ChartDisplay) -> String {
        let mut out = String::new();
        out.push_str(&chart.title);
        out.push('\n');

        let tabs: Vec<String> = chart
            .periods
            .iter()
            .map(|p| {
                if *p == chart.period {
                    format!("[{}]", p)
                } else {
                    p.clone()
                }
            })
            .collect();
        out.push_str(&tabs.join("  "));
        out.push_str("\n\n");

        let label_width = chart.bars.iter().map(|b| width(&b.label)).max().unwrap_or(0);
        for b in &chart.bars {
            out.push_str(if b.hovered { "> " } else { "  " });
            out.push_str(&pad_right(&b.label, label_width));
            out.push(' ');
            out.push_str(&bar(b.width_pct));
            out.push_str(&format!(" {:.2}\n", b.value));
        }

        let ticks: Vec<String> = chart.ticks.iter().map(|t| format!("{:.1}", t)).collect();
        out.push_str(&format!("\nAxis: {}\n", ticks.join(" ")));
        out
    }

    fn render_shares(&self, title: &str, slices: &[SliceDisplay]) -> String {
        let mut out = String::new();
        out.push_str(title);
        out.push('\n');

        let name_width = slices.iter().map(|s| width(&s.name)).max().unwrap_or(0);
        for s in slices {
            let dim = if s.opacity < 1.0 { " (dim)" } else { "" };
            out.push_str(&format!(
                "  {} {:>5.1}% {}{}\n",
                pad_right(&s.name, name_width),
                s.percent * 100.0,
                bar(s.percent * 100.0),
                dim
            ));
        }
        out
    }
}
