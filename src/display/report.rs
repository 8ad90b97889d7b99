//! Report formatting for terminal output
//!
//! Renders a `ReportTable` as a boxed text table for the `preview` command.

use tabled::builder::Builder;
use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Style};

use crate::models::ReportMetadata;
use crate::reports::ReportTable;

/// Format a header line with padding
pub fn format_header(title: &str, width: usize) -> String {
    let len = title.chars().count();
    let padding = if len >= width { 0 } else { (width - len) / 2 };
    format!("{}{}", " ".repeat(padding), title)
}

/// Format a separator line
pub fn separator(width: usize) -> String {
    "─".repeat(width)
}

/// Format a report table for the terminal
pub fn format_terminal(table: &ReportTable, meta: &ReportMetadata) -> String {
    let width = table.width();
    let policy = &table.zero_policy;

    let mut builder = Builder::default();
    builder.push_record(table.headers.iter().cloned());
    for section in &table.sections {
        builder.push_record(padded(vec![section.label.to_uppercase()], width));
        for row in &section.rows {
            builder.push_record(padded(row.render(policy), width));
        }
        builder.push_record(padded(section.subtotal.render(policy), width));
    }
    builder.push_record(padded(table.grand_total.render(policy), width));

    let mut rendered = builder.build();
    rendered.with(Style::modern());
    for idx in (0..width).filter(|i| table.is_numeric_column(*i)) {
        rendered.modify(Columns::single(idx), Alignment::right());
    }
    let body = rendered.to_string();
    let line_width = body.lines().next().map(|l| l.chars().count()).unwrap_or(40);

    let mut output = String::new();
    if !meta.organization.trim().is_empty() {
        output.push_str(&format_header(&meta.organization, line_width));
        output.push('\n');
    }
    output.push_str(&format_header(&meta.title, line_width));
    output.push('\n');
    output.push_str(&format_header(
        &format!("{} | {}", meta.scope_label(), meta.period),
        line_width,
    ));
    output.push('\n');
    output.push_str(&separator(line_width));
    output.push('\n');
    output.push_str(&body);
    output.push('\n');
    output.push_str(&format!(
        "{} rows | Generated {}\n",
        table.row_count(),
        meta.timestamp()
    ));
    output
}

fn padded(mut cells: Vec<String>, width: usize) -> Vec<String> {
    cells.resize(width, String::new());
    cells
}
