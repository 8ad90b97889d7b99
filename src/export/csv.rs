//! CSV export
//!
//! Layout: quoted single-cell metadata lines, a blank line, the header row,
//! then per section a category marker line, its data rows and its subtotal,
//! then the grand-total row and a short footer block.

use std::io::Write;

use crate::display::ZeroPolicy;
use crate::error::{ReportError, ReportResult};
use crate::models::ReportMetadata;
use crate::reports::{ReportTable, TableRow};

/// Render a report table as a CSV document
pub fn to_csv(table: &ReportTable, meta: &ReportMetadata) -> String {
    let policy = &table.zero_policy;
    let mut out = String::new();

    // Metadata
    line(&mut out, &quote(&meta.title));
    if !meta.organization.trim().is_empty() {
        line(&mut out, &quote(&meta.organization));
    }
    line(&mut out, &quote(&format!("Scope: {}", meta.scope_label())));
    line(&mut out, &quote(&format!("Period: {}", meta.period)));
    line(&mut out, &quote(&format!("Generated: {}", meta.timestamp())));
    line(&mut out, "");

    line(&mut out, &join(&table.headers));

    for section in &table.sections {
        line(&mut out, &escape_csv(&section.label));
        for row in &section.rows {
            push_row(&mut out, row, policy);
        }
        push_row(&mut out, &section.subtotal, policy);
    }
    push_row(&mut out, &table.grand_total, policy);

    // Footer
    line(&mut out, "");
    line(&mut out, &quote(&format!("Total rows: {}", table.row_count())));
    line(&mut out, &quote("End of Report"));

    out
}

/// Write a report table as CSV
pub fn write_csv<W: Write>(
    table: &ReportTable,
    meta: &ReportMetadata,
    writer: &mut W,
) -> ReportResult<()> {
    writer
        .write_all(to_csv(table, meta).as_bytes())
        .map_err(|e| ReportError::Export(e.to_string()))
}

fn push_row(out: &mut String, row: &TableRow, policy: &ZeroPolicy) {
    line(out, &join(&row.render(policy)));
}

fn line(out: &mut String, text: &str) {
    out.push_str(text);
    out.push('\n');
}

fn join(fields: &[String]) -> String {
    fields
        .iter()
        .map(|f| escape_csv(f))
        .collect::<Vec<_>>()
        .join(",")
}

/// Always-quoted field, used for metadata lines
fn quote(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

/// Escape a string for CSV output
pub fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r') {
        quote(s)
    } else {
        s.to_string()
    }
}
