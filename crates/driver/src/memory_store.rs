//! MemoryRowStore - in-memory RowStore for tests and file-backed replay

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use contracts::{ContractError, Cursor, Reading, RowStore};

/// In-memory row store ordered by `(timestamp, id)`.
///
/// Rows can be inserted while a traversal is running, which is how tests
/// exercise the catch-up/live boundary. The query counter exists so tests
/// can assert the single-query contract of archive replay.
#[derive(Debug, Default)]
pub struct MemoryRowStore {
    rows: RwLock<Vec<Reading>>,
    queries: AtomicU64,
}

impl MemoryRowStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert one row, keeping `(timestamp, id)` order.
    pub fn insert(&self, reading: Reading) {
        let mut rows = self.rows.write().expect("row store lock poisoned");
        let at = rows.partition_point(|r| (r.timestamp, r.id) <= (reading.timestamp, reading.id));
        rows.insert(at, reading);
    }

    /// Insert many rows.
    pub fn insert_all(&self, readings: impl IntoIterator<Item = Reading>) {
        for reading in readings {
            self.insert(reading);
        }
    }

    /// Number of stored rows.
    pub fn len(&self) -> usize {
        self.rows.read().expect("row store lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total queries served (both query modes).
    pub fn query_count(&self) -> u64 {
        self.queries.load(Ordering::Relaxed)
    }
}

impl RowStore for MemoryRowStore {
    async fn rows_after(&self, cursor: Option<&Cursor>) -> Result<Vec<Reading>, ContractError> {
        self.queries.fetch_add(1, Ordering::Relaxed);
        let rows = self.rows.read().expect("row store lock poisoned");
        Ok(match cursor {
            None => rows.clone(),
            Some(c) => rows
                .iter()
                .filter(|r| r.id > c.id && r.timestamp >= c.timestamp)
                .cloned()
                .collect(),
        })
    }

    async fn rows_since(&self, instant: DateTime<Utc>) -> Result<Vec<Reading>, ContractError> {
        self.queries.fetch_add(1, Ordering::Relaxed);
        let rows = self.rows.read().expect("row store lock poisoned");
        Ok(rows
            .iter()
            .filter(|r| r.timestamp > instant)
            .cloned()
            .collect())
    }
}
