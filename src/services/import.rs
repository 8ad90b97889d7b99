//! Row import service
//!
//! The ingestion boundary: turns a fetched payload (JSON or CSV) into
//! normalized `TransactionRow`s. Field names are matched case-insensitively
//! against per-report alias lists, and numeric fields are coerced leniently
//! so that a single dirty record never aborts a report.

use std::io::Read;
use std::path::Path;

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::{ReportError, ReportResult};
use crate::models::{Measure, Money, TransactionRow};

/// Keys a REST endpoint may wrap its row array under
const WRAPPER_KEYS: &[&str] = &["data", "result", "rows", "items"];

/// Which payload fields feed which row fields
///
/// Each list is tried in order; the first alias present with a non-null value
/// wins.
#[derive(Debug, Clone, Default)]
pub struct FieldMap {
    pub key: &'static [&'static str],
    pub name: &'static [&'static str],
    pub flag: &'static [&'static str],
    pub secondary: &'static [&'static str],
    pub measures: Vec<(Measure, &'static [&'static str])>,
}

impl FieldMap {
    /// Field map with key and name aliases and no measures
    pub fn new(key: &'static [&'static str], name: &'static [&'static str]) -> Self {
        Self {
            key,
            name,
            ..Self::default()
        }
    }

    /// Builder-style: set the category flag aliases
    pub fn with_flag(mut self, aliases: &'static [&'static str]) -> Self {
        self.flag = aliases;
        self
    }

    /// Builder-style: add a measure and its aliases
    pub fn measure(mut self, measure: Measure, aliases: &'static [&'static str]) -> Self {
        self.measures.push((measure, aliases));
        self
    }

    /// Builder-style: replace the secondary key aliases
    pub fn with_secondary(mut self, aliases: &'static [&'static str]) -> Self {
        self.secondary = aliases;
        self
    }
}

/// Import rows from a JSON document
///
/// Accepts a bare array, or an object wrapping the array under `data`,
/// `result`, `rows`, `items`, or failing those its first array-valued key.
pub fn import_json(text: &str, fields: &FieldMap) -> ReportResult<Vec<TransactionRow>> {
    let doc: Value = serde_json::from_str(text)?;
    let items = unwrap_rows(&doc)?;

    let mut rows = Vec::with_capacity(items.len());
    for (idx, item) in items.iter().enumerate() {
        match item.as_object() {
            Some(object) => rows.push(normalize(idx, object, fields)),
            None => warn!(row = idx, "skipping array element that is not an object"),
        }
    }

    debug!(rows = rows.len(), "imported rows from JSON");
    Ok(rows)
}

/// Import rows from a headed CSV file
pub fn import_csv<R: Read>(reader: R, fields: &FieldMap) -> ReportResult<Vec<TransactionRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);
    let headers = reader.headers()?.clone();

    let mut rows = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let record = result?;
        let object: Map<String, Value> = headers
            .iter()
            .zip(record.iter())
            .map(|(h, v)| (h.to_string(), Value::String(v.to_string())))
            .collect();
        rows.push(normalize(idx, &object, fields));
    }

    debug!(rows = rows.len(), "imported rows from CSV");
    Ok(rows)
}

/// Import rows from a file, choosing the format by extension
pub fn import_file(path: &Path, fields: &FieldMap) -> ReportResult<Vec<TransactionRow>> {
    let is_csv = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("csv"))
        .unwrap_or(false);

    if is_csv {
        let file = std::fs::File::open(path).map_err(|e| {
            ReportError::Io(format!("Failed to open {}: {}", path.display(), e))
        })?;
        import_csv(file, fields)
    } else {
        let text = std::fs::read_to_string(path).map_err(|e| {
            ReportError::Io(format!("Failed to read {}: {}", path.display(), e))
        })?;
        import_json(&text, fields)
    }
}

fn unwrap_rows(doc: &Value) -> ReportResult<&Vec<Value>> {
    match doc {
        Value::Array(items) => Ok(items),
        Value::Object(object) => {
            let wrapped = WRAPPER_KEYS
                .iter()
                .find_map(|key| lookup(object, &[*key]).and_then(Value::as_array))
                .or_else(|| object.values().find_map(Value::as_array));
            wrapped.ok_or_else(|| {
                ReportError::Import("JSON object does not contain a row array".into())
            })
        }
        _ => Err(ReportError::Import(
            "expected a JSON array of rows or an object wrapping one".into(),
        )),
    }
}

fn normalize(idx: usize, object: &Map<String, Value>, fields: &FieldMap) -> TransactionRow {
    let text = |aliases: &[&str]| lookup(object, aliases).and_then(text_of);

    let mut row = TransactionRow::new(
        text(fields.key).unwrap_or_default(),
        text(fields.name).unwrap_or_default(),
    );
    row.flag = text(fields.flag);
    row.secondary = text(fields.secondary);

    for (measure, aliases) in &fields.measures {
        let Some(value) = lookup(object, aliases) else {
            continue;
        };
        match money_of(value) {
            Some(amount) => row.set(*measure, amount),
            None if is_blank(value) => {}
            None => warn!(
                row = idx,
                measure = %measure,
                value = %value,
                "non-numeric measure treated as zero"
            ),
        }
    }

    if row.key.is_empty() {
        warn!(row = idx, "row has no classification key");
    }
    row
}

/// First alias present with a non-null value, matched case-insensitively
fn lookup<'v>(object: &'v Map<String, Value>, aliases: &[&str]) -> Option<&'v Value> {
    aliases.iter().find_map(|alias| {
        object
            .iter()
            .find(|(k, v)| k.eq_ignore_ascii_case(alias) && !v.is_null())
            .map(|(_, v)| v)
    })
}

/// Text form of a scalar; numbers keep their source lexeme
fn text_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn money_of(value: &Value) -> Option<Money> {
    match value {
        Value::Number(n) => Money::parse(&n.to_string())
            .ok()
            .or_else(|| n.as_f64().and_then(Money::from_f64)),
        Value::String(s) => Money::parse(s).ok(),
        _ => None,
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}
