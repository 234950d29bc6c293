//! Configuration schemas.
//!
//! Reads the `[table]`, `[column.<key>]`, `[heatmap]`, `[chart]`, `[shares]`
//! and `[render]` sections into typed schemas. Everything here runs before a
//! dataset is loaded; failures name the section and key.

use std::fmt;

use crate::domain::chart::ShareSet;
use crate::domain::column::{ColumnDescriptor, ValueKind};
use crate::domain::error::FundviewError;
use crate::domain::heatmap::ColorScale;
use crate::domain::sort::{SortDirection, SortState};
use crate::domain::table_view::SelectionMode;
use crate::ports::config_port::ConfigPort;
use tracing::warn;

const DEFAULT_PRECISION: i64 = 2;
const MAX_PRECISION: i64 = 10;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RenderFormat {
    #[default]
    Text,
    Typst,
}

impl RenderFormat {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "text" => Some(RenderFormat::Text),
            "typst" => Some(RenderFormat::Typst),
            _ => None,
        }
    }
}

impl fmt::Display for RenderFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderFormat::Text => write!(f, "text"),
            RenderFormat::Typst => write!(f, "typst"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableSchema {
    pub title: String,
    pub data: String,
    pub columns: Vec<ColumnDescriptor>,
    pub selection: SelectionMode,
    pub initial_sort: SortState,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeatmapSchema {
    pub title: String,
    pub data: String,
    pub label_column: String,
    /// Label column first, then the metrics in declared order.
    pub columns: Vec<ColumnDescriptor>,
    pub scale: ColorScale,
}

#[derive(Debug, Clone)]
pub struct ChartSchema {
    pub title: String,
    pub data: String,
    pub label_column: String,
    pub periods: Vec<String>,
    pub default_period: String,
    /// Label column first, then one numeric column per period.
    pub columns: Vec<ColumnDescriptor>,
    pub shares: Option<ShareSet>,
    pub shares_title: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderSchema {
    pub format: RenderFormat,
    pub color: bool,
    pub template_path: Option<String>,
}

fn missing(section: &str, key: &str) -> FundviewError {
    FundviewError::ConfigMissing {
        section: section.to_string(),
        key: key.to_string(),
    }
}

fn invalid(section: &str, key: &str, reason: impl Into<String>) -> FundviewError {
    FundviewError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.into(),
    }
}

fn required(config: &dyn ConfigPort, section: &str, key: &str) -> Result<String, FundviewError> {
    config
        .get_string(section, key)
        .ok_or_else(|| missing(section, key))
}

fn required_list(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<Vec<String>, FundviewError> {
    match config.get_list(section, key) {
        Some(list) if !list.is_empty() => Ok(list),
        _ => Err(missing(section, key)),
    }
}

/// Column descriptor for `key`, from its `[column.<key>]` section if any.
///
/// Without a section the column is text, labelled with its key.
pub fn column_descriptor(
    config: &dyn ConfigPort,
    key: &str,
) -> Result<ColumnDescriptor, FundviewError> {
    describe(config, key, ValueKind::Text)
}

/// Like [`column_descriptor`], but the column defaults to numeric and any
/// other configured kind is rejected.
fn numeric_descriptor(
    config: &dyn ConfigPort,
    key: &str,
) -> Result<ColumnDescriptor, FundviewError> {
    let descriptor = describe(config, key, ValueKind::Numeric)?;
    if descriptor.kind != ValueKind::Numeric {
        return Err(invalid(&format!("column.{key}"), "kind", "column must be numeric"));
    }
    Ok(descriptor)
}

fn describe(
    config: &dyn ConfigPort,
    key: &str,
    default_kind: ValueKind,
) -> Result<ColumnDescriptor, FundviewError> {
    let section = format!("column.{key}");
    let label = config.get_string(&section, "label").unwrap_or_else(|| key.to_string());

    let kind = match config.get_string(&section, "kind") {
        None => default_kind,
        Some(k) => ValueKind::parse(&k).ok_or_else(|| {
            invalid(
                &section,
                "kind",
                format!("unknown kind {k:?}, expected text, numeric or enumerated"),
            )
        })?,
    };

    let precision = config.get_int(&section, "precision", DEFAULT_PRECISION);
    if !(0..=MAX_PRECISION).contains(&precision) {
        return Err(invalid(
            &section,
            "precision",
            format!("precision must be between 0 and {MAX_PRECISION}"),
        ));
    }

    let levels = config.get_list(&section, "levels").unwrap_or_default();
    if !levels.is_empty() && kind != ValueKind::Enumerated {
        warn!(column = key, "levels ignored for non-enumerated column");
    }

    let descriptor = match kind {
        ValueKind::Text => ColumnDescriptor::text(key, &label),
        ValueKind::Numeric => ColumnDescriptor::numeric(key, &label, precision as usize),
        ValueKind::Enumerated => {
            let levels: Vec<&str> = levels.iter().map(String::as_str).collect();
            ColumnDescriptor::enumerated(key, &label, &levels)
        }
    };
    Ok(descriptor)
}

fn parse_initial_sort(value: Option<String>) -> Result<SortState, FundviewError> {
    let Some(value) = value else {
        return Ok(SortState::unsorted());
    };
    let mut parts = value.split_whitespace();
    let key = parts.next().unwrap_or_default();
    if key.eq_ignore_ascii_case("none") {
        return Ok(SortState::unsorted());
    }
    let direction = match parts.next() {
        None => SortDirection::Ascending,
        Some(d) => SortDirection::parse(d).ok_or_else(|| {
            invalid("table", "initial_sort", format!("unknown direction {d:?}"))
        })?,
    };
    if parts.next().is_some() {
        return Err(invalid("table", "initial_sort", "expected \"<column> [asc|desc]\""));
    }
    Ok(SortState::by(key, direction))
}

pub fn table_schema(config: &dyn ConfigPort) -> Result<TableSchema, FundviewError> {
    let data = required(config, "table", "data")?;
    let keys = required_list(config, "table", "columns")?;
    let columns = keys
        .iter()
        .map(|k| column_descriptor(config, k))
        .collect::<Result<Vec<_>, _>>()?;

    let selection = match config.get_string("table", "selection") {
        None => SelectionMode::default(),
        Some(s) => SelectionMode::parse(&s).ok_or_else(|| {
            invalid(
                "table",
                "selection",
                format!("unknown mode {s:?}, expected row_click, row_hover or cell_click"),
            )
        })?,
    };

    let initial_sort = parse_initial_sort(config.get_string("table", "initial_sort"))?;
    if let Some(key) = &initial_sort.key {
        if !keys.contains(key) {
            return Err(invalid(
                "table",
                "initial_sort",
                format!("{key} is not one of the table columns"),
            ));
        }
    }

    Ok(TableSchema {
        title: config.get_string("table", "title").unwrap_or_default(),
        data,
        columns,
        selection,
        initial_sort,
    })
}

pub fn heatmap_schema(config: &dyn ConfigPort) -> Result<HeatmapSchema, FundviewError> {
    let data = required(config, "heatmap", "data")?;
    let label_column = required(config, "heatmap", "label_column")?;
    let metrics = required_list(config, "heatmap", "metrics")?;
    if metrics.contains(&label_column) {
        return Err(invalid(
            "heatmap",
            "metrics",
            "label column cannot also be a metric",
        ));
    }

    let label = column_descriptor(config, &label_column)?;
    if label.kind == ValueKind::Numeric {
        return Err(invalid(
            &format!("column.{label_column}"),
            "kind",
            "label column must not be numeric",
        ));
    }
    let mut columns = vec![label];
    for m in &metrics {
        columns.push(numeric_descriptor(config, m)?);
    }

    let scale = match config.get_string("heatmap", "scale") {
        None => ColorScale::risk_default(),
        Some(spec) => {
            let floor = config
                .get_string("heatmap", "floor_color")
                .unwrap_or_else(|| ColorScale::risk_default().floor().to_string());
            let light = config.get_list("heatmap", "light_colors").unwrap_or_default();
            let light: Vec<&str> = light.iter().map(String::as_str).collect();
            ColorScale::parse(&spec, &floor)
                .map_err(|e| invalid("heatmap", "scale", e.to_string()))?
                .with_light(&light)
        }
    };

    Ok(HeatmapSchema {
        title: config.get_string("heatmap", "title").unwrap_or_default(),
        data,
        label_column,
        columns,
        scale,
    })
}

pub fn chart_schema(config: &dyn ConfigPort) -> Result<ChartSchema, FundviewError> {
    let data = required(config, "chart", "data")?;
    let label_column = required(config, "chart", "label_column")?;
    let periods = required_list(config, "chart", "periods")?;

    let default_period = match config.get_string("chart", "default_period") {
        Some(p) if periods.contains(&p) => p,
        Some(p) => {
            return Err(invalid(
                "chart",
                "default_period",
                format!("{p} is not one of the periods"),
            ));
        }
        None => periods[0].clone(),
    };

    let mut columns = vec![column_descriptor(config, &label_column)?];
    for p in &periods {
        columns.push(numeric_descriptor(config, p)?);
    }

    let shares = match config.get_string("shares", "slices") {
        None => None,
        Some(spec) => Some(
            ShareSet::parse(&spec).map_err(|e| invalid("shares", "slices", e.to_string()))?,
        ),
    };

    Ok(ChartSchema {
        title: config.get_string("chart", "title").unwrap_or_default(),
        data,
        label_column,
        periods,
        default_period,
        columns,
        shares,
        shares_title: config
            .get_string("shares", "title")
            .unwrap_or_else(|| "Shares".to_string()),
    })
}

pub fn render_schema(config: &dyn ConfigPort) -> Result<RenderSchema, FundviewError> {
    let format = match config.get_string("render", "format") {
        None => RenderFormat::default(),
        Some(f) => RenderFormat::parse(&f).ok_or_else(|| {
            invalid("render", "format", format!("unknown format {f:?}, expected text or typst"))
        })?,
    };
    Ok(RenderSchema {
        format,
        color: config.get_bool("render", "color", false),
        template_path: config.get_string("render", "template_path"),
    })
}

/// Validate every section present in the file. At least one of `[table]`,
/// `[heatmap]` or `[chart]` must exist.
pub fn validate_config(config: &dyn ConfigPort) -> Result<(), FundviewError> {
    let views = ["table", "heatmap", "chart"];
    if !views.iter().any(|s| config.has_section(s)) {
        return Err(missing("table", "data"));
    }
    if config.has_section("table") {
        table_schema(config)?;
    }
    if config.has_section("heatmap") {
        heatmap_schema(config)?;
    }
    if config.has_section("chart") {
        chart_schema(config)?;
    }
    render_schema(config)?;
    Ok(())
}
