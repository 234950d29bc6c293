//! Typst `#table(` markup for sortable tables and the metric heatmap.

use crate::domain::column::CellValue;
use crate::domain::heatmap::{CellDetail, HeatmapDisplay};
use crate::domain::table_view::{SortIndicator, TableDisplay};

const ACTIVE_FILL: &str = "rgb(\"#DBEAFE\")";

/// Escape characters Typst treats as markup inside content blocks.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(
            c,
            '\\' | '/' | '[' | ']' | '#' | '*' | '_' | '$' | '@' | '<' | '>' | '`' | '~'
        ) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

fn indicator_symbol(indicator: SortIndicator) -> &'static str {
    match indicator {
        SortIndicator::Ascending => " #sym.triangle.t",
        SortIndicator::Descending => " #sym.triangle.b",
        SortIndicator::Neutral => "",
    }
}

pub fn format_table(table: &TableDisplay) -> String {
    let columns = table.headers.len().max(1);
    let mut out = String::from("#table(\n");
    out.push_str(&format!("  columns: {},\n", columns));

    let align: Vec<&str> = match table.rows.first() {
        Some(row) => row
            .cells
            .iter()
            .map(|c| match c.value {
                CellValue::Number(_) => "right",
                _ => "left",
            })
            .collect(),
        None => vec!["left"; columns],
    };
    out.push_str(&format!("  align: ({},),\n", align.join(", ")));

    let headers: Vec<String> = table
        .headers
        .iter()
        .map(|h| format!("[*{}*{}]", escape(&h.label), indicator_symbol(h.indicator)))
        .collect();
    out.push_str(&format!("  {},\n", headers.join(", ")));

    if table.is_empty() {
        out.push_str(&format!("  table.cell(colspan: {})[_No rows._],\n", columns));
    }

    for row in &table.rows {
        let cells: Vec<String> = row
            .cells
            .iter()
            .map(|c| {
                let text = escape(&c.text);
                match (row.active, c.active) {
                    (_, true) => format!(
                        "table.cell(fill: {}, stroke: 1pt)[*{}*]",
                        ACTIVE_FILL, text
                    ),
                    (true, false) => format!("table.cell(fill: {})[{}]", ACTIVE_FILL, text),
                    (false, false) => format!("[{}]", text),
                }
            })
            .collect();
        out.push_str(&format!("  {},\n", cells.join(", ")));
    }

    out.push_str(")\n");
    out
}

fn format_heatmap_cell(text: &str, background: &str, foreground: &str, selected: bool) -> String {
    let stroke = if selected { ", stroke: 2pt + black" } else { "" };
    format!(
        "table.cell(fill: rgb(\"{}\"){})[#text(fill: rgb(\"{}\"))[{}]]",
        background,
        stroke,
        foreground,
        escape(text)
    )
}

pub fn format_heatmap(heatmap: &HeatmapDisplay) -> String {
    let mut out = String::from("#table(\n");
    out.push_str(&format!("  columns: {},\n", heatmap.metrics.len() + 1));
    out.push_str("  align: center,\n");

    let mut headers = vec!["[]".to_string()];
    headers.extend(
        heatmap
            .metrics
            .iter()
            .map(|m| format!("[*{}*{}]", escape(&m.label), indicator_symbol(m.indicator))),
    );
    out.push_str(&format!("  {},\n", headers.join(", ")));

    for row in &heatmap.rows {
        let mut cells = vec![format!("[*{}*]", escape(&row.label))];
        cells.extend(row.cells.iter().map(|c| {
            format_heatmap_cell(&c.text, &c.background, c.foreground, c.selected)
        }));
        out.push_str(&format!("  {},\n", cells.join(", ")));
    }

    out.push_str(")\n\n");
    out.push_str(&format_scale_legend(heatmap));
    out
}

fn format_scale_legend(heatmap: &HeatmapDisplay) -> String {
    let scale = &heatmap.scale;
    let mut items: Vec<String> = scale
        .steps()
        .iter()
        .map(|s| {
            format_heatmap_cell(
                &format!(">= {:.2}", s.lower_bound),
                &s.color,
                scale.text_color(&s.color),
                false,
            )
        })
        .collect();
    items.push(format_heatmap_cell(
        "lower",
        scale.floor(),
        scale.text_color(scale.floor()),
        false,
    ));
    format!(
        "#table(\n  columns: {},\n  stroke: none,\n  {},\n)\n",
        items.len(),
        items.join(", ")
    )
}

pub fn format_cell_detail(detail: &CellDetail) -> String {
    format!(
        "\n#block(fill: rgb(\"{}\"), inset: 8pt, radius: 4pt)[#text(fill: rgb(\"{}\"))[*{}* / {}: {}]]\n",
        detail.background,
        detail.foreground,
        escape(&detail.label),
        escape(&detail.metric),
        escape(&detail.text)
    )
}
