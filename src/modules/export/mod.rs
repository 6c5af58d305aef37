//! Export Module
//!
//! Writes decoded checker events as a terminal table, CSV, or JSON.
//! Files default to `<data dir>/exports/events-<timestamp>.<ext>`.

mod csv_export;
mod json_export;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;

use crate::bindings::EntitlementCheckerEvents;
use crate::domain::checker::{event_name, EventRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportFormat {
    Table,
    Csv,
    Json,
}

impl ExportFormat {
    fn extension(self) -> &'static str {
        match self {
            ExportFormat::Table => "txt",
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

/// One event flattened for output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRow {
    pub block_number: Option<u64>,
    pub log_index: Option<u64>,
    pub transaction_hash: Option<String>,
    pub address: String,
    pub event: String,
    pub args: Vec<(String, String)>,
}

impl EventRow {
    pub fn from_record(record: &EventRecord<EntitlementCheckerEvents>) -> Self {
        Self {
            block_number: record.block_number,
            log_index: record.log_index,
            transaction_hash: record.transaction_hash.map(|hash| hash.to_string()),
            address: record.address.to_string(),
            event: event_name(&record.event).to_string(),
            args: event_args(&record.event),
        }
    }

    /// `name=value` pairs joined with `;`
    pub fn args_summary(&self) -> String {
        self.args
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join(";")
    }
}

fn address_list(addresses: &[alloy::primitives::Address]) -> String {
    let items: Vec<String> = addresses.iter().map(ToString::to_string).collect();
    format!("[{}]", items.join(","))
}

/// Named event arguments as display strings, in ABI order
pub fn event_args(event: &EntitlementCheckerEvents) -> Vec<(String, String)> {
    let args: Vec<(&str, String)> = match event {
        EntitlementCheckerEvents::EntitlementCheckRequested(ev) => vec![
            ("callerAddress", ev.callerAddress.to_string()),
            ("contractAddress", ev.contractAddress.to_string()),
            ("transactionId", ev.transactionId.to_string()),
            ("roleId", ev.roleId.to_string()),
            ("selectedNodes", address_list(&ev.selectedNodes)),
        ],
        EntitlementCheckerEvents::EntitlementCheckRequestedV2(ev) => vec![
            ("walletAddress", ev.walletAddress.to_string()),
            ("spaceAddress", ev.spaceAddress.to_string()),
            ("resolverAddress", ev.resolverAddress.to_string()),
            ("transactionId", ev.transactionId.to_string()),
            ("roleId", ev.roleId.to_string()),
            ("selectedNodes", address_list(&ev.selectedNodes)),
        ],
        EntitlementCheckerEvents::Initialized(ev) => vec![("version", ev.version.to_string())],
        EntitlementCheckerEvents::InterfaceAdded(ev) => {
            vec![("interfaceId", ev.interfaceId.to_string())]
        }
        EntitlementCheckerEvents::InterfaceRemoved(ev) => {
            vec![("interfaceId", ev.interfaceId.to_string())]
        }
        EntitlementCheckerEvents::NodeRegistered(ev) => {
            vec![("nodeAddress", ev.nodeAddress.to_string())]
        }
        EntitlementCheckerEvents::NodeUnregistered(ev) => {
            vec![("nodeAddress", ev.nodeAddress.to_string())]
        }
    };
    args.into_iter()
        .map(|(name, value)| (name.to_string(), value))
        .collect()
}

const TABLE_HEADER: (&str, &str, &str, &str) = ("block", "log", "event", "args");

/// One fixed-width table line
pub fn render_row(row: &EventRow) -> String {
    format!(
        "{:>10} {:>5}  {:<28} {}",
        row.block_number.map(|n| n.to_string()).unwrap_or_else(|| "-".into()),
        row.log_index.map(|n| n.to_string()).unwrap_or_else(|| "-".into()),
        row.event,
        row.args_summary()
    )
}

/// Fixed-width table for terminal output
pub fn render_table(rows: &[EventRow]) -> String {
    let (block, log, event, args) = TABLE_HEADER;
    let mut out = format!("{block:>10} {log:>5}  {event:<28} {args}");
    for row in rows {
        out.push('\n');
        out.push_str(&render_row(row));
    }
    out
}

/// Resolve (and create) the directory exports are written to
pub fn export_dir(configured: Option<PathBuf>) -> Result<PathBuf> {
    let dir = configured.unwrap_or_else(|| PathBuf::from(".entitlement-checker").join("exports"));
    fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create export directory {}", dir.display()))?;
    Ok(dir)
}

/// Generate a timestamped filename
pub fn generate_filename(prefix: &str, extension: &str) -> String {
    let timestamp = Local::now().format("%Y-%m-%d-%H%M%S");
    format!("{}-{}.{}", prefix, timestamp, extension)
}

/// Write `rows` to `path` in `format`, returning the number of rows written
pub fn write_rows(path: &Path, rows: &[EventRow], format: ExportFormat) -> Result<usize> {
    let count = match format {
        ExportFormat::Csv => csv_export::write_events(path, rows)?,
        ExportFormat::Json => json_export::write_events(path, rows)?,
        ExportFormat::Table => {
            fs::write(path, render_table(rows) + "\n")
                .with_context(|| format!("Failed to write {}", path.display()))?;
            rows.len()
        }
    };
    tracing::info!(path = %path.display(), rows = count, "exported events");
    Ok(count)
}

/// Write events to `out`, or to a timestamped file under `dir`
pub fn export_events(
    records: &[EventRecord<EntitlementCheckerEvents>],
    format: ExportFormat,
    out: Option<PathBuf>,
    dir: Option<PathBuf>,
) -> Result<PathBuf> {
    let rows: Vec<EventRow> = records.iter().map(EventRow::from_record).collect();
    let path = match out {
        Some(path) => path,
        None => export_dir(dir)?.join(generate_filename("events", format.extension())),
    };
    write_rows(&path, &rows, format)?;
    Ok(path)
}
