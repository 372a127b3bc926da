use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use csv::ReaderBuilder;

use crate::records::RawTable;

pub fn read_raw_table(path: &Path) -> Result<RawTable> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("open match csv {}", path.display()))?;
    read_raw_table_from(file).with_context(|| format!("read match csv {}", path.display()))
}

/// Ragged rows are kept as-is; the normalizer treats missing cells as empty.
pub fn read_raw_table_from<R: Read>(reader: R) -> Result<RawTable> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr
        .headers()
        .context("read csv header row")?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').to_string())
        .collect();

    let mut rows = Vec::new();
    for (idx, record) in rdr.records().enumerate() {
        let record = record.with_context(|| format!("parse csv row {}", idx + 1))?;
        rows.push(record.iter().map(|cell| cell.to_string()).collect());
    }

    Ok(RawTable::new(headers, rows))
}
