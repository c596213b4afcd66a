use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::application::LedgerSnapshot;

/// Load a ledger snapshot from JSON.
pub fn read_snapshot<R: Read>(reader: R) -> Result<LedgerSnapshot> {
    let snapshot: LedgerSnapshot =
        serde_json::from_reader(reader).context("Invalid ledger snapshot")?;
    Ok(snapshot)
}

/// Load a ledger snapshot from a JSON file on disk.
pub fn read_snapshot_file(path: &Path) -> Result<LedgerSnapshot> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open snapshot file: {}", path.display()))?;
    read_snapshot(BufReader::new(file))
        .with_context(|| format!("Failed to read snapshot file: {}", path.display()))
}
