//! JSON Export

use std::fs::File;
use std::io::Write;
use std::path::Path;

use anyhow::Result;
use serde::Serialize;
use serde_json::{Map, Value};

use super::EventRow;

#[derive(Serialize)]
struct ExportableEvent<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    block_number: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    log_index: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    transaction_hash: Option<&'a str>,
    address: &'a str,
    event: &'a str,
    args: Map<String, Value>,
}

impl<'a> From<&'a EventRow> for ExportableEvent<'a> {
    fn from(row: &'a EventRow) -> Self {
        Self {
            block_number: row.block_number,
            log_index: row.log_index,
            transaction_hash: row.transaction_hash.as_deref(),
            address: &row.address,
            event: &row.event,
            args: row
                .args
                .iter()
                .map(|(name, value)| (name.clone(), Value::String(value.clone())))
                .collect(),
        }
    }
}

/// Write event rows to JSON file
pub fn write_events(path: &Path, rows: &[EventRow]) -> Result<usize> {
    let exportable: Vec<ExportableEvent<'_>> = rows.iter().map(ExportableEvent::from).collect();

    let json = serde_json::to_string_pretty(&exportable)?;

    let mut file = File::create(path)?;
    file.write_all(json.as_bytes())?;

    Ok(rows.len())
}
