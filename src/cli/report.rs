//! CLI commands for reports
//!
//! Loads a fetched row file, runs it through a report preset and writes or
//! prints the result.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::{Args, Subcommand, ValueEnum};
use tracing::info;

use crate::config::{ReportPaths, Settings};
use crate::display::format_terminal;
use crate::error::{ReportError, ReportResult};
use crate::export::{to_csv, to_json, to_print_html_with, HtmlOptions};
use crate::models::ReportMetadata;
use crate::reports::{Layout, ReportKind, ReportSpec, ReportTable};
use crate::services::import_file;

/// Output format for `render`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ExportFormat {
    #[default]
    Csv,
    Html,
    Json,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Html => "html",
            ExportFormat::Json => "json",
        }
    }
}

/// Arguments shared by every command that builds a report
#[derive(Args, Debug, Clone)]
pub struct ReportArgs {
    /// Report name (see `portal list`)
    pub kind: String,

    /// Fetched rows: a JSON document or a headed CSV file
    #[arg(short, long)]
    pub input: PathBuf,

    /// Scope identifier (cost center, department, province)
    #[arg(long)]
    pub scope_id: String,

    /// Scope display name
    #[arg(long)]
    pub scope_name: Option<String>,

    /// Reporting period (e.g., "2025-01")
    #[arg(short, long)]
    pub period: String,
}

/// Report subcommands
#[derive(Subcommand, Debug)]
pub enum ReportCommands {
    /// Render a report to CSV, print HTML or JSON
    #[command(alias = "export")]
    Render {
        #[command(flatten)]
        args: ReportArgs,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = ExportFormat::Csv)]
        format: ExportFormat,

        /// Output file ("-" for stdout); defaults to the export directory
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print a report to the terminal
    #[command(alias = "show")]
    Preview {
        #[command(flatten)]
        args: ReportArgs,
    },

    /// List the available reports
    List,
}

/// Handle report commands
pub fn handle_report_command(
    paths: &ReportPaths,
    settings: &Settings,
    cmd: ReportCommands,
) -> ReportResult<()> {
    match cmd {
        ReportCommands::Render {
            args,
            format,
            output,
        } => handle_render(paths, settings, &args, format, output),
        ReportCommands::Preview { args } => handle_preview(settings, &args),
        ReportCommands::List => {
            print!("{}", format_report_list());
            Ok(())
        }
    }
}

/// Resolve the preset, load rows and build the table
fn build(settings: &Settings, args: &ReportArgs) -> ReportResult<(ReportTable, ReportMetadata)> {
    let kind: ReportKind = args.kind.parse()?;
    if args.scope_id.trim().is_empty() {
        return Err(ReportError::Validation("scope id cannot be empty".into()));
    }
    if args.period.trim().is_empty() {
        return Err(ReportError::Validation("period cannot be empty".into()));
    }
    let spec = settings.apply(ReportSpec::for_kind(kind));

    let rows = import_file(&args.input, &spec.fields)?;
    let table = spec.build_table(&rows);

    let mut meta = ReportMetadata::new(spec.title, spec.report_name, &args.scope_id, &args.period)
        .with_organization(settings.organization.as_str());
    if let Some(name) = &args.scope_name {
        meta = meta.with_scope_name(name.as_str());
    }
    meta.timestamp_format = settings.timestamp_format.clone();

    Ok((table, meta))
}

fn handle_render(
    paths: &ReportPaths,
    settings: &Settings,
    args: &ReportArgs,
    format: ExportFormat,
    output: Option<PathBuf>,
) -> ReportResult<()> {
    let (table, meta) = build(settings, args)?;

    let body = match format {
        ExportFormat::Csv => to_csv(&table, &meta),
        ExportFormat::Html => to_print_html_with(
            &table,
            &meta,
            &HtmlOptions {
                page_size: settings.page_size.clone(),
            },
        ),
        ExportFormat::Json => to_json(&table, &meta)?,
    };

    if output.as_deref() == Some(Path::new("-")) {
        print!("{}", body);
        return Ok(());
    }

    let path = output.unwrap_or_else(|| {
        settings
            .output_dir(paths)
            .join(meta.file_name(format.extension()))
    });
    write_file(&path, &body)?;
    info!(path = %path.display(), rows = table.row_count(), "report written");
    println!("Report exported to: {}", path.display());

    Ok(())
}

fn handle_preview(settings: &Settings, args: &ReportArgs) -> ReportResult<()> {
    let (table, meta) = build(settings, args)?;
    println!("{}", format_terminal(&table, &meta));
    Ok(())
}

fn write_file(path: &Path, body: &str) -> ReportResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| {
            ReportError::Export(format!(
                "Failed to create directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }
    let file = File::create(path).map_err(|e| {
        ReportError::Export(format!("Failed to create file {}: {}", path.display(), e))
    })?;
    let mut writer = BufWriter::new(file);
    writer
        .write_all(body.as_bytes())
        .and_then(|_| writer.flush())
        .map_err(|e| ReportError::Export(e.to_string()))
}

/// One line per report: name, title and layout
pub fn format_report_list() -> String {
    let mut output = String::new();
    output.push_str("Available reports:\n");
    for kind in ReportKind::all() {
        let spec = ReportSpec::for_kind(*kind);
        let layout = match &spec.layout {
            Layout::Flat { columns } => format!("{} columns", columns.len()),
            Layout::CrossTab { dimension, .. } => format!("cross tab by {}", dimension.label()),
        };
        output.push_str(&format!(
            "  {:<24} {:<38} {}\n",
            kind.name(),
            spec.title,
            layout
        ));
    }
    output
}
