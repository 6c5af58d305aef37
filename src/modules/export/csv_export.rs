//! CSV Export

use std::path::Path;

use anyhow::Result;

use super::EventRow;

/// Write event rows to CSV file
pub fn write_events(path: &Path, rows: &[EventRow]) -> Result<usize> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "block_number",
        "log_index",
        "transaction_hash",
        "address",
        "event",
        "args",
    ])?;

    for row in rows {
        wtr.write_record([
            row.block_number.map(|n| n.to_string()).unwrap_or_default(),
            row.log_index.map(|n| n.to_string()).unwrap_or_default(),
            row.transaction_hash.clone().unwrap_or_default(),
            row.address.clone(),
            row.event.clone(),
            row.args_summary(),
        ])?;
    }

    wtr.flush()?;
    Ok(rows.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_events_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.csv");
        let rows = vec![EventRow {
            block_number: Some(3),
            log_index: Some(1),
            transaction_hash: None,
            address: "0xcc".into(),
            event: "Initialized".into(),
            args: vec![("version".into(), "1".into())],
        }];

        assert_eq!(write_events(&path, &rows).unwrap(), 1);

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(headers.get(4), Some("event"));
        let record = reader.records().next().unwrap().unwrap();
        assert_eq!(record.get(0), Some("3"));
        assert_eq!(record.get(2), Some(""));
        assert_eq!(record.get(5), Some("version=1"));
    }
}
