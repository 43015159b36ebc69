use crate::error::{HealthError, Result};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use tracing::info;

pub type Row = Map<String, Value>;

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

/// Pretty-printed JSON, creating parent directories as needed.
pub fn export_json<T: Serialize + ?Sized>(data: &T, path: &Path) -> Result<()> {
    ensure_parent(path)?;
    let mut text = serde_json::to_string_pretty(data)?;
    text.push('\n');
    fs::write(path, text)?;
    info!("JSON written to {}", path.display());
    Ok(())
}

/// Serialize each item into a JSON object row.
pub fn to_rows<T: Serialize>(items: &[T]) -> Result<Vec<Row>> {
    items
        .iter()
        .map(|item| match serde_json::to_value(item)? {
            Value::Object(map) => Ok(map),
            other => Err(HealthError::Export(format!(
                "CSV rows must be objects, got {other}"
            ))),
        })
        .collect()
}

/// CSV whose columns are the sorted union of all row keys.
///
/// No rows produces an empty file rather than a lone header.
pub fn export_csv(rows: &[Row], path: &Path) -> Result<()> {
    ensure_parent(path)?;
    if rows.is_empty() {
        fs::write(path, "")?;
        info!("Empty CSV written to {}", path.display());
        return Ok(());
    }

    let headers: BTreeSet<&str> = rows
        .iter()
        .flat_map(|row| row.keys().map(String::as_str))
        .collect();

    let mut out = String::new();
    push_record(&mut out, headers.iter().map(|h| h.to_string()));
    for row in rows {
        push_record(
            &mut out,
            headers.iter().map(|h| row.get(*h).map(render_cell).unwrap_or_default()),
        );
    }

    fs::write(path, out)?;
    info!("CSV with {} rows written to {}", rows.len(), path.display());
    Ok(())
}

fn render_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn push_record(out: &mut String, fields: impl Iterator<Item = String>) {
    let line: Vec<String> = fields.map(|f| quote(&f)).collect();
    out.push_str(&line.join(","));
    out.push_str("\r\n");
}

fn quote(field: &str) -> String {
    if field.contains(|c: char| matches!(c, ',' | '"' | '\n' | '\r')) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
