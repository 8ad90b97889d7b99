//! Print-ready HTML export
//!
//! Produces a standalone HTML document whose inline print stylesheet fixes the
//! page size, repeats the table header on every page, keeps rows from
//! splitting across pages and stamps page numbers and the generation time in
//! the page margins. Opening and printing the document is the caller's job.

use std::fmt::Write as _;

use crate::models::ReportMetadata;
use crate::reports::{ReportTable, RowKind, TableRow};

/// Default CSS `@page` size
pub const DEFAULT_PAGE_SIZE: &str = "A4 landscape";

/// Print options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlOptions {
    /// CSS `@page` size, e.g. `A4 landscape`
    pub page_size: String,
}

impl Default for HtmlOptions {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE.to_string(),
        }
    }
}

/// Render a report table as a print-ready HTML document
pub fn to_print_html(table: &ReportTable, meta: &ReportMetadata) -> String {
    to_print_html_with(table, meta, &HtmlOptions::default())
}

/// Render with explicit print options
pub fn to_print_html_with(table: &ReportTable, meta: &ReportMetadata, options: &HtmlOptions) -> String {
    let policy = &table.zero_policy;
    let width = table.width().max(1);
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    let _ = writeln!(html, "<title>{}</title>", escape_html(&meta.title));
    html.push_str(&stylesheet(options, &meta.timestamp()));
    html.push_str("</head>\n<body>\n");

    html.push_str("<header class=\"report-header\">\n");
    if !meta.organization.trim().is_empty() {
        let _ = writeln!(html, "<div class=\"organization\">{}</div>", escape_html(&meta.organization));
    }
    let _ = writeln!(html, "<h1>{}</h1>", escape_html(&meta.title));
    let _ = writeln!(
        html,
        "<div class=\"scope\">{} &middot; {}</div>",
        escape_html(&meta.scope_label()),
        escape_html(&meta.period)
    );
    html.push_str("</header>\n");

    html.push_str("<table class=\"report\">\n<thead>\n<tr>");
    for (idx, header) in table.headers.iter().enumerate() {
        let _ = write!(html, "<th{}>{}</th>", align(table, idx), escape_html(header));
    }
    html.push_str("</tr>\n</thead>\n<tbody>\n");

    for section in &table.sections {
        let _ = writeln!(
            html,
            "<tr class=\"category\"><td colspan=\"{}\">{}</td></tr>",
            width,
            escape_html(&section.label)
        );
        for row in &section.rows {
            push_row(&mut html, table, row, policy);
        }
        push_row(&mut html, table, &section.subtotal, policy);
    }
    push_row(&mut html, table, &table.grand_total, policy);

    html.push_str("</tbody>\n</table>\n");
    let _ = writeln!(
        html,
        "<footer class=\"report-footer\">{} rows &middot; Generated {}</footer>",
        table.row_count(),
        escape_html(&meta.timestamp())
    );
    html.push_str("</body>\n</html>\n");
    html
}

fn push_row(html: &mut String, table: &ReportTable, row: &TableRow, policy: &crate::display::ZeroPolicy) {
    let class = match row.kind {
        RowKind::Data => "data",
        RowKind::Subtotal => "subtotal",
        RowKind::GrandTotal => "grand-total",
    };
    let _ = write!(html, "<tr class=\"{}\">", class);
    for (idx, cell) in row.render(policy).iter().enumerate() {
        let _ = write!(html, "<td{}>{}</td>", align(table, idx), escape_html(cell));
    }
    html.push_str("</tr>\n");
}

fn align(table: &ReportTable, idx: usize) -> &'static str {
    if table.is_numeric_column(idx) {
        " class=\"num\""
    } else {
        ""
    }
}

fn stylesheet(options: &HtmlOptions, timestamp: &str) -> String {
    format!(
        r#"<style>
@page {{
  size: {size};
  margin: 12mm 10mm 16mm 10mm;
  @bottom-right {{ content: "Page " counter(page) " of " counter(pages); font-size: 8pt; }}
  @bottom-left {{ content: "Generated {stamp}"; font-size: 8pt; }}
}}
body {{ font-family: Arial, Helvetica, sans-serif; font-size: 9pt; color: #000; }}
.report-header {{ text-align: center; margin-bottom: 8px; }}
.report-header h1 {{ font-size: 14pt; margin: 4px 0; }}
table.report {{ width: 100%; border-collapse: collapse; }}
table.report th, table.report td {{ border: 1px solid #999; padding: 2px 4px; }}
table.report th {{ background: #e6e6e6; }}
thead {{ display: table-header-group; }}
tr {{ page-break-inside: avoid; break-inside: avoid; }}
td.num, th.num {{ text-align: right; white-space: nowrap; }}
tr.category td {{ font-weight: bold; background: #f2f2f2; }}
tr.subtotal td {{ font-weight: bold; border-top: 1px solid #000; }}
tr.grand-total td {{ font-weight: bold; border-top: 2px solid #000; border-bottom: 3px double #000; }}
.report-footer {{ margin-top: 6px; font-size: 8pt; }}
</style>
"#,
        size = escape_css(&options.page_size),
        stamp = escape_css(timestamp),
    )
}

/// Escape text for HTML element content and attribute values
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// Keep CSS string content from breaking out of its declaration
fn escape_css(s: &str) -> String {
    s.chars()
        .filter(|c| !matches!(c, '"' | '\\' | '{' | '}' | ';' | '<' | '>'))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Measure, TransactionRow};
    use crate::reports::{ReportKind, ReportSpec};

    fn meta() -> ReportMetadata {
        ReportMetadata::new("Income & Expenditure", "IncomeExpenditure", "510", "2024-06")
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("a < b & \"c\""), "a &lt; b &amp; &quot;c&quot;");
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn test_document_structure() {
        let rows = vec![
            TransactionRow::new("4100", "Rates <arrears>")
                .with_flag("I")
                .with(Measure::Actual, -1234),
        ];
        let table = ReportSpec::for_kind(ReportKind::IncomeExpenditure).build_table(&rows);
        let html = to_print_html(&table, &meta());

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Income &amp; Expenditure</title>"));
        assert!(html.contains("size: A4 landscape;"));
        assert!(html.contains("counter(page)"));
        assert!(html.contains("thead { display: table-header-group; }"));
        assert!(html.contains("page-break-inside: avoid"));
        assert!(html.contains("<tr class=\"category\"><td colspan=\"5\">Income</td></tr>"));
        assert!(html.contains("Rates &lt;arrears&gt;"));
        assert!(html.contains("<td class=\"num\">(1,234.00)</td>"));
        assert!(html.contains("<tr class=\"subtotal\"><td>Total Income</td>"));
        assert!(html.contains("<tr class=\"grand-total\"><td>Grand Total</td>"));
        assert!(html.trim_end().ends_with("</html>"));
    }

    #[test]
    fn test_section_order_matches_table() {
        let rows = vec![
            TransactionRow::new("5100", "Fuel").with_flag("X").with(Measure::Actual, 5),
            TransactionRow::new("4100", "Rates").with_flag("I").with(Measure::Actual, 9),
        ];
        let table = ReportSpec::for_kind(ReportKind::IncomeExpenditure).build_table(&rows);
        let html = to_print_html(&table, &meta());
        let income = html.find(">Income</td>").unwrap();
        let expenditure = html.find(">Expenditure</td>").unwrap();
        let grand = html.find("Grand Total").unwrap();
        assert!(income < expenditure && expenditure < grand);
    }

    #[test]
    fn test_empty_table_still_renders() {
        let table = ReportSpec::for_kind(ReportKind::TrialBalance).build_table(&[]);
        let html = to_print_html(&table, &meta());
        assert!(html.contains("<th>Code</th>"));
        assert!(html.contains("<th class=\"num\">Closing Balance</th>"));
        assert!(html.contains("grand-total"));
        assert!(!html.contains("class=\"category\""));
    }

    #[test]
    fn test_custom_page_size() {
        let table = ReportSpec::for_kind(ReportKind::JobCard).build_table(&[]);
        let options = HtmlOptions {
            page_size: "Letter portrait".to_string(),
        };
        let html = to_print_html_with(&table, &meta(), &options);
        assert!(html.contains("size: Letter portrait;"));
    }
}
