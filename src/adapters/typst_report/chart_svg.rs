//! SVG rendering for the period bar chart and the share donut.

use crate::domain::chart::{ChartDisplay, SliceDisplay};
use std::f64::consts::PI;

const BAR_HEIGHT: f64 = 22.0;
const BAR_GAP: f64 = 8.0;
const LABEL_WIDTH: f64 = 140.0;
const PLOT_WIDTH: f64 = 360.0;
const PADDING: f64 = 20.0;

const DONUT_SIZE: f64 = 320.0;
const OUTER_RADIUS: f64 = 140.0;
const INNER_RADIUS: f64 = 90.0;

const BAR_FILL: &str = "#0EA5E9";
const BAR_HOVER_FILL: &str = "#0369A1";

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Horizontal bars scaled to `width_pct`, gridlines at each axis tick.
/// Empty string when there are no bars.
pub fn generate_bar_svg(chart: &ChartDisplay) -> String {
    if chart.bars.is_empty() {
        return String::new();
    }

    let plot_height = chart.bars.len() as f64 * (BAR_HEIGHT + BAR_GAP);
    let width = LABEL_WIDTH + PLOT_WIDTH + 2.0 * PADDING;
    let height = plot_height + 2.0 * PADDING + 16.0;
    let x0 = PADDING + LABEL_WIDTH;

    let mut svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{:.0}" height="{:.0}" viewBox="0 0 {:.0} {:.0}">"#,
        width, height, width, height
    );

    let intervals = chart.ticks.len().saturating_sub(1).max(1);
    for (i, tick) in chart.ticks.iter().enumerate() {
        let x = x0 + PLOT_WIDTH * i as f64 / intervals as f64;
        svg.push_str(&format!(
            r##"<line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="#E5E7EB" stroke-width="1"/>"##,
            x,
            PADDING,
            x,
            PADDING + plot_height
        ));
        svg.push_str(&format!(
            r##"<text x="{:.1}" y="{:.1}" font-size="10" text-anchor="middle" fill="#6B7280">{:.1}</text>"##,
            x,
            PADDING + plot_height + 14.0,
            tick
        ));
    }

    for (i, bar) in chart.bars.iter().enumerate() {
        let y = PADDING + i as f64 * (BAR_HEIGHT + BAR_GAP);
        let w = PLOT_WIDTH * bar.width_pct.clamp(0.0, 100.0) / 100.0;
        let fill = if bar.hovered { BAR_HOVER_FILL } else { BAR_FILL };
        svg.push_str(&format!(
            r##"<text x="{:.1}" y="{:.1}" font-size="11" text-anchor="end" fill="#111827">{}</text>"##,
            x0 - 6.0,
            y + BAR_HEIGHT * 0.7,
            escape_xml(&bar.label)
        ));
        svg.push_str(&format!(
            r#"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" rx="3" fill="{}"/>"#,
            x0, y, w, BAR_HEIGHT, fill
        ));
        svg.push_str(&format!(
            r##"<text x="{:.1}" y="{:.1}" font-size="10" fill="#111827">{:.2}</text>"##,
            x0 + w + 4.0,
            y + BAR_HEIGHT * 0.7,
            bar.value
        ));
    }

    svg.push_str("</svg>");
    svg
}

fn point_at(radius: f64, angle: f64) -> (f64, f64) {
    let c = DONUT_SIZE / 2.0;
    (c + radius * angle.sin(), c - radius * angle.cos())
}

fn ring_segment(start: f64, end: f64) -> String {
    let large = if end - start > PI { 1 } else { 0 };
    let (ox0, oy0) = point_at(OUTER_RADIUS, start);
    let (ox1, oy1) = point_at(OUTER_RADIUS, end);
    let (ix1, iy1) = point_at(INNER_RADIUS, end);
    let (ix0, iy0) = point_at(INNER_RADIUS, start);
    format!(
        "M {:.2} {:.2} A {r} {r} 0 {large} 1 {:.2} {:.2} L {:.2} {:.2} A {ir} {ir} 0 {large} 0 {:.2} {:.2} Z",
        ox0,
        oy0,
        ox1,
        oy1,
        ix1,
        iy1,
        ix0,
        iy0,
        r = OUTER_RADIUS,
        ir = INNER_RADIUS,
        large = large
    )
}

/// Donut with one ring segment per slice, clockwise from 12 o'clock.
/// Slices with a zero share are skipped; empty string when nothing remains.
pub fn generate_donut_svg(slices: &[SliceDisplay]) -> String {
    let visible: Vec<&SliceDisplay> = slices.iter().filter(|s| s.percent > 0.0).collect();
    if visible.is_empty() {
        return String::new();
    }

    let mut svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{s:.0}" height="{s:.0}" viewBox="0 0 {s:.0} {s:.0}">"#,
        s = DONUT_SIZE
    );

    let mut angle = 0.0;
    for slice in visible {
        let sweep = slice.percent * 2.0 * PI;
        if slice.percent >= 0.9999 {
            let c = DONUT_SIZE / 2.0;
            svg.push_str(&format!(
                r#"<circle cx="{:.1}" cy="{:.1}" r="{:.1}" fill="none" stroke="{}" stroke-width="{:.1}" opacity="{:.1}"/>"#,
                c,
                c,
                (OUTER_RADIUS + INNER_RADIUS) / 2.0,
                slice.color,
                OUTER_RADIUS - INNER_RADIUS,
                slice.opacity
            ));
        } else {
            svg.push_str(&format!(
                r#"<path d="{}" fill="{}" opacity="{:.1}"><title>{} {:.1}%</title></path>"#,
                ring_segment(angle, angle + sweep),
                slice.color,
                slice.opacity,
                escape_xml(&slice.name),
                slice.percent * 100.0
            ));
        }
        angle += sweep;
    }

    svg.push_str("</svg>");
    svg
}
