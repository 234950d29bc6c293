//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvDatasetAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::text_render::TextRenderer;
use crate::adapters::typst_report::{self, default_template, TypstRenderer};
use crate::domain::chart::BarChart;
use crate::domain::column::ValueKind;
use crate::domain::dataset::RowId;
use crate::domain::error::FundviewError;
use crate::domain::heatmap::{HeatmapView, MetricTab};
use crate::domain::table_config::{
    chart_schema, heatmap_schema, render_schema, table_schema, validate_config, ChartSchema,
    HeatmapSchema, RenderFormat, RenderSchema, TableSchema,
};
use crate::domain::table_view::{TableEvent, TableView};
use crate::ports::config_port::ConfigPort;
use crate::ports::dataset_port::DatasetPort;
use crate::ports::render_port::RenderPort;

#[derive(Parser, Debug)]
#[command(name = "fundview", about = "Sortable tables, heatmaps and charts for fund data")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// `ROW:KEY`, where ROW is the 0-based record index in the data file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellRef {
    pub row: usize,
    pub key: String,
}

pub fn parse_cell_ref(s: &str) -> Result<CellRef, String> {
    let (row, key) = s
        .split_once(':')
        .ok_or_else(|| format!("expected ROW:KEY, got {s:?}"))?;
    let row = row
        .trim()
        .parse()
        .map_err(|_| format!("invalid row index {:?}", row.trim()))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing column key in {s:?}"));
    }
    Ok(CellRef {
        row,
        key: key.to_string(),
    })
}

fn parse_format(s: &str) -> Result<RenderFormat, String> {
    RenderFormat::parse(s).ok_or_else(|| format!("unknown format {s:?}, expected text or typst"))
}

fn parse_tab(s: &str) -> Result<MetricTab, String> {
    MetricTab::parse(s).ok_or_else(|| format!("unknown tab {s:?}"))
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render the sortable table
    Show {
        #[arg(short, long)]
        config: PathBuf,
        /// Header click, applied in order; repeat to flip direction
        #[arg(long = "click", value_name = "KEY")]
        clicks: Vec<String>,
        /// Click the row with this record index
        #[arg(long, value_name = "ROW", conflicts_with_all = ["hover", "cell"])]
        select: Option<usize>,
        /// Hover the row with this record index
        #[arg(long, value_name = "ROW", conflicts_with = "cell")]
        hover: Option<usize>,
        /// Click a single cell
        #[arg(long, value_name = "ROW:KEY", value_parser = parse_cell_ref)]
        cell: Option<CellRef>,
        #[arg(short, long, value_parser = parse_format)]
        format: Option<RenderFormat>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Render the metric heatmap
    Heatmap {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long, value_name = "ROW:KEY", value_parser = parse_cell_ref)]
        select: Option<CellRef>,
        /// Sort rows by this column (repeat to flip direction)
        #[arg(long = "sort", value_name = "KEY")]
        sorts: Vec<String>,
        #[arg(long, value_parser = parse_tab)]
        tab: Option<MetricTab>,
        #[arg(short, long, value_parser = parse_format)]
        format: Option<RenderFormat>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Render the period bar chart and share breakdown
    Chart {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        period: Option<String>,
        /// Hover the bar at this position
        #[arg(long, value_name = "INDEX")]
        hover: Option<usize>,
        #[arg(short, long, value_parser = parse_format)]
        format: Option<RenderFormat>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List the configured table columns
    Columns {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Validate configuration and load every configured dataset
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// List CSV files next to the configuration
    Sources {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Show {
            config,
            clicks,
            select,
            hover,
            cell,
            format,
            output,
        } => {
            let events = show_events(&clicks, select, hover, cell);
            run_show(&config, &events, format, output.as_ref())
        }
        Command::Heatmap {
            config,
            select,
            sorts,
            tab,
            format,
            output,
        } => run_heatmap(
            &config,
            &HeatmapActions { select, sorts, tab },
            format,
            output.as_ref(),
        ),
        Command::Chart {
            config,
            period,
            hover,
            format,
            output,
        } => run_chart(&config, period.as_deref(), hover, format, output.as_ref()),
        Command::Columns { config } => run_columns(&config),
        Command::Validate { config } => run_validate(&config),
        Command::Sources { config } => run_sources(&config),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = FundviewError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

/// Data files and templates resolve relative to the configuration file.
pub fn base_dir(config_path: &Path) -> PathBuf {
    config_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Header clicks first, in order, then at most one selection event.
pub fn show_events(
    clicks: &[String],
    select: Option<usize>,
    hover: Option<usize>,
    cell: Option<CellRef>,
) -> Vec<TableEvent> {
    let mut events: Vec<TableEvent> = clicks
        .iter()
        .map(|k| TableEvent::HeaderClick(k.clone()))
        .collect();
    if let Some(row) = select {
        events.push(TableEvent::RowClick(RowId(row)));
    }
    if let Some(row) = hover {
        events.push(TableEvent::RowHover(RowId(row)));
    }
    if let Some(c) = cell {
        events.push(TableEvent::CellClick(RowId(c.row), c.key));
    }
    events
}

#[derive(Debug, Clone, Default)]
pub struct HeatmapActions {
    pub select: Option<CellRef>,
    pub sorts: Vec<String>,
    pub tab: Option<MetricTab>,
}

fn renderer(render: &RenderSchema) -> Box<dyn RenderPort> {
    match render.format {
        RenderFormat::Text => Box::new(TextRenderer::with_color(render.color)),
        RenderFormat::Typst => Box::new(TypstRenderer::new()),
    }
}

/// Wrap a rendered body into the final document. Typst output goes through
/// the page template; text output is returned as is.
pub fn finish_document(
    render: &RenderSchema,
    base: &Path,
    title: &str,
    body: String,
) -> Result<String, FundviewError> {
    match render.format {
        RenderFormat::Text => Ok(body),
        RenderFormat::Typst => {
            let template = match &render.template_path {
                Some(path) => fs::read_to_string(base.join(path))?,
                None => default_template::template().to_string(),
            };
            Ok(typst_report::resolve(&template, title, &body))
        }
    }
}

pub fn run_show_pipeline(
    dataset_port: &dyn DatasetPort,
    schema: &TableSchema,
    events: &[TableEvent],
    renderer: &dyn RenderPort,
) -> Result<String, FundviewError> {
    let dataset = dataset_port.load(&schema.data, &schema.columns)?;
    let mut view = TableView::new(&schema.title, &dataset, schema.selection)
        .with_initial_sort(schema.initial_sort.clone())?;

    for event in events {
        if !view.handle(event.clone())? {
            eprintln!(
                "warning: {:?} has no effect in {:?} selection mode",
                event, schema.selection
            );
        }
    }

    Ok(renderer.render_table(&view.display()))
}

pub fn run_heatmap_pipeline(
    dataset_port: &dyn DatasetPort,
    schema: &HeatmapSchema,
    actions: &HeatmapActions,
    renderer: &dyn RenderPort,
) -> Result<String, FundviewError> {
    let dataset = dataset_port.load(&schema.data, &schema.columns)?;
    let mut view = HeatmapView::new(
        &schema.title,
        &dataset,
        &schema.label_column,
        schema.scale.clone(),
    )?;

    if let Some(tab) = actions.tab {
        view.select_tab(tab);
    }
    for key in &actions.sorts {
        view.sort_by(key)?;
    }
    if let Some(cell) = &actions.select {
        view.select_cell(RowId(cell.row), &cell.key)?;
    }

    Ok(renderer.render_heatmap(&view.display()))
}

pub fn run_chart_pipeline(
    dataset_port: &dyn DatasetPort,
    schema: &ChartSchema,
    period: Option<&str>,
    hover: Option<usize>,
    renderer: &dyn RenderPort,
) -> Result<String, FundviewError> {
    let dataset = dataset_port.load(&schema.data, &schema.columns)?;
    let mut chart = BarChart::from_dataset(
        &schema.title,
        &dataset,
        &schema.label_column,
        &schema.periods,
        &schema.default_period,
    )?;

    if let Some(p) = period {
        chart.select_period(p)?;
    }
    if let Some(i) = hover {
        chart.hover(i);
    }

    let mut out = renderer.render_chart(&chart.display());
    if let Some(shares) = &schema.shares {
        out.push('\n');
        out.push_str(&renderer.render_shares(&schema.shares_title, &shares.display()));
    }
    Ok(out)
}

fn emit(content: &str, output: Option<&PathBuf>) -> ExitCode {
    match output {
        Some(path) => match fs::write(path, content) {
            Ok(()) => {
                eprintln!("Output written to: {}", path.display());
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("error: failed to write output: {e}");
                ExitCode::from(1)
            }
        },
        None => {
            print!("{content}");
            ExitCode::SUCCESS
        }
    }
}

/// Config, data directory and render settings shared by the render commands.
fn prepare(
    config_path: &PathBuf,
    format: Option<RenderFormat>,
) -> Result<(FileConfigAdapter, PathBuf, RenderSchema), ExitCode> {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = load_config(config_path)?;
    let mut render = render_schema(&adapter).map_err(|e| {
        eprintln!("error: {e}");
        ExitCode::from(&e)
    })?;
    if let Some(f) = format {
        render.format = f;
    }
    Ok((adapter, base_dir(config_path), render))
}

fn finish(
    result: Result<(String, String), FundviewError>,
    render: &RenderSchema,
    base: &Path,
    output: Option<&PathBuf>,
) -> ExitCode {
    let document = result.and_then(|(title, body)| finish_document(render, base, &title, body));
    match document {
        Ok(doc) => emit(&doc, output),
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn run_show(
    config_path: &PathBuf,
    events: &[TableEvent],
    format: Option<RenderFormat>,
    output: Option<&PathBuf>,
) -> ExitCode {
    let (adapter, base, render) = match prepare(config_path, format) {
        Ok(p) => p,
        Err(code) => return code,
    };
    let data_port = CsvDatasetAdapter::new(base.clone());

    let result = table_schema(&adapter).and_then(|schema| {
        eprintln!("Loading table data from {}", schema.data);
        let body = run_show_pipeline(&data_port, &schema, events, renderer(&render).as_ref())?;
        Ok((schema.title, body))
    });
    finish(result, &render, &base, output)
}

fn run_heatmap(
    config_path: &PathBuf,
    actions: &HeatmapActions,
    format: Option<RenderFormat>,
    output: Option<&PathBuf>,
) -> ExitCode {
    let (adapter, base, render) = match prepare(config_path, format) {
        Ok(p) => p,
        Err(code) => return code,
    };
    let data_port = CsvDatasetAdapter::new(base.clone());

    let result = heatmap_schema(&adapter).and_then(|schema| {
        eprintln!("Loading heatmap data from {}", schema.data);
        let body =
            run_heatmap_pipeline(&data_port, &schema, actions, renderer(&render).as_ref())?;
        Ok((schema.title, body))
    });
    finish(result, &render, &base, output)
}

fn run_chart(
    config_path: &PathBuf,
    period: Option<&str>,
    hover: Option<usize>,
    format: Option<RenderFormat>,
    output: Option<&PathBuf>,
) -> ExitCode {
    let (adapter, base, render) = match prepare(config_path, format) {
        Ok(p) => p,
        Err(code) => return code,
    };
    let data_port = CsvDatasetAdapter::new(base.clone());

    let result = chart_schema(&adapter).and_then(|schema| {
        eprintln!("Loading chart data from {}", schema.data);
        let body = run_chart_pipeline(
            &data_port,
            &schema,
            period,
            hover,
            renderer(&render).as_ref(),
        )?;
        Ok((schema.title, body))
    });
    finish(result, &render, &base, output)
}

fn run_columns(config_path: &PathBuf) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    let schema = match table_schema(&adapter) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    println!("{:<20} {:<24} {:<12} DETAIL", "KEY", "LABEL", "KIND");
    for col in &schema.columns {
        let detail = match col.kind {
            ValueKind::Numeric => format!("precision {}", col.precision),
            ValueKind::Enumerated if !col.levels.is_empty() => {
                col.levels.join(" < ")
            }
            _ => String::new(),
        };
        println!(
            "{:<20} {:<24} {:<12} {}",
            col.key,
            col.label,
            col.kind,
            detail
        );
    }
    ExitCode::SUCCESS
}

/// Validate every configured view and load its dataset.
pub fn validate_all(
    config: &dyn ConfigPort,
    dataset_port: &dyn DatasetPort,
) -> Result<Vec<(String, usize)>, FundviewError> {
    validate_config(config)?;
    let mut loaded = Vec::new();
    if config.has_section("table") {
        let schema = table_schema(config)?;
        let ds = dataset_port.load(&schema.data, &schema.columns)?;
        TableView::new(&schema.title, &ds, schema.selection)
            .with_initial_sort(schema.initial_sort.clone())?;
        loaded.push(("table".to_string(), ds.len()));
    }
    if config.has_section("heatmap") {
        let schema = heatmap_schema(config)?;
        let ds = dataset_port.load(&schema.data, &schema.columns)?;
        HeatmapView::new(&schema.title, &ds, &schema.label_column, schema.scale.clone())?;
        loaded.push(("heatmap".to_string(), ds.len()));
    }
    if config.has_section("chart") {
        let schema = chart_schema(config)?;
        let ds = dataset_port.load(&schema.data, &schema.columns)?;
        BarChart::from_dataset(
            &schema.title,
            &ds,
            &schema.label_column,
            &schema.periods,
            &schema.default_period,
        )?;
        loaded.push(("chart".to_string(), ds.len()));
    }
    Ok(loaded)
}

fn run_validate(config_path: &PathBuf) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    let data_port = CsvDatasetAdapter::new(base_dir(config_path));

    match validate_all(&adapter, &data_port) {
        Ok(loaded) => {
            for (view, rows) in loaded {
                eprintln!("  [{view}] {rows} rows");
            }
            eprintln!("\nConfiguration is valid.");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn run_sources(config_path: &PathBuf) -> ExitCode {
    let data_port = CsvDatasetAdapter::new(base_dir(config_path));
    match data_port.list_sources() {
        Ok(sources) => {
            if sources.is_empty() {
                eprintln!("No CSV files found.");
            }
            for s in sources {
                println!("{s}");
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_ref_parses_row_and_key() {
        assert_eq!(
            parse_cell_ref("2:rm1").unwrap(),
            CellRef {
                row: 2,
                key: "rm1".into()
            }
        );
        assert_eq!(parse_cell_ref(" 0 : fundName ").unwrap().key, "fundName");
    }

    #[test]
    fn cell_ref_rejects_malformed_input() {
        assert!(parse_cell_ref("rm1").is_err());
        assert!(parse_cell_ref("x:rm1").is_err());
        assert!(parse_cell_ref("1:").is_err());
    }

    #[test]
    fn show_events_put_clicks_before_selection() {
        let events = show_events(
            &["points".to_string(), "points".to_string()],
            Some(1),
            None,
            None,
        );
        assert_eq!(
            events,
            vec![
                TableEvent::HeaderClick("points".into()),
                TableEvent::HeaderClick("points".into()),
                TableEvent::RowClick(RowId(1)),
            ]
        );
    }

    #[test]
    fn base_dir_of_bare_file_is_current_dir() {
        assert_eq!(base_dir(Path::new("view.ini")), PathBuf::from("."));
        assert_eq!(
            base_dir(Path::new("/srv/dash/view.ini")),
            PathBuf::from("/srv/dash")
        );
    }

    #[test]
    fn cli_parses_show_flags() {
        let cli = Cli::try_parse_from([
            "fundview", "show", "-c", "view.ini", "--click", "aum", "--click", "aum",
            "--cell", "3:aum", "--format", "typst",
        ])
        .unwrap();
        match cli.command {
            Command::Show {
                clicks,
                cell,
                format,
                ..
            } => {
                assert_eq!(clicks, vec!["aum", "aum"]);
                assert_eq!(cell.unwrap().row, 3);
                assert_eq!(format, Some(RenderFormat::Typst));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn cli_rejects_two_selections() {
        assert!(
            Cli::try_parse_from(["fundview", "show", "-c", "v.ini", "--select", "1", "--hover", "2"])
                .is_err()
        );
    }

    #[test]
    fn text_document_is_unwrapped() {
        let render = RenderSchema::default();
        let doc = finish_document(&render, Path::new("."), "T", "body\n".into()).unwrap();
        assert_eq!(doc, "body\n");
    }

    #[test]
    fn typst_document_uses_default_template() {
        let render = RenderSchema {
            format: RenderFormat::Typst,
            ..RenderSchema::default()
        };
        let doc = finish_document(&render, Path::new("."), "Funds", "#table()".into()).unwrap();
        assert!(doc.contains("= Funds"));
        assert!(doc.contains("#table()"));
    }

    #[test]
    fn missing_template_is_io_error() {
        let render = RenderSchema {
            format: RenderFormat::Typst,
            color: false,
            template_path: Some("does-not-exist.typ".into()),
        };
        let dir = tempfile::TempDir::new().unwrap();
        let err = finish_document(&render, dir.path(), "T", String::new()).unwrap_err();
        assert!(matches!(err, FundviewError::Io(_)));
    }
}
