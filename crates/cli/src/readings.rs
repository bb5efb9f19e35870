//! Readings log loading.
//!
//! The stream and replay commands read rows from a JSON-lines log, one
//! serialized [`Reading`] per line, and load them into an in-memory row
//! store. Blank lines are skipped; a malformed line fails the load with its
//! line number.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{Context, Result};
use contracts::Reading;
use driver::MemoryRowStore;
use tracing::info;

/// Load a readings log into a fresh in-memory row store.
pub fn load_store(path: &Path) -> Result<MemoryRowStore> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open readings log {}", path.display()))?;

    let store = MemoryRowStore::new();
    let mut count = 0usize;
    for (idx, line) in BufReader::new(file).lines().enumerate() {
        let line = line.with_context(|| format!("Failed to read line {}", idx + 1))?;
        if line.trim().is_empty() {
            continue;
        }
        let reading: Reading = serde_json::from_str(&line)
            .with_context(|| format!("Malformed reading on line {}", idx + 1))?;
        store.insert(reading);
        count += 1;
    }

    info!(path = %path.display(), rows = count, "Readings log loaded");
    Ok(store)
}
