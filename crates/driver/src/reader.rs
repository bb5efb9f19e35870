//! IncrementalReader - cursor-based row fetch shared by all traversals

use std::sync::Arc;

use chrono::{DateTime, Utc};
use contracts::{ContractError, Cursor, Reading, RowStore};
use tracing::{debug, instrument};

/// Thin query layer over the external row store.
///
/// Adds tracing and metrics; ordering and the compound cursor predicate are
/// the store's contract (`RowStore`). Never mutates rows.
#[derive(Debug, Clone)]
pub struct IncrementalReader<S> {
    store: Arc<S>,
}

impl<S: RowStore + Sync> IncrementalReader<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Rows after the cursor position (everything when absent).
    #[instrument(name = "reader_after", level = "debug", skip(self, cursor), fields(cursor_id = cursor.map(|c| c.id)))]
    pub async fn after(&self, cursor: Option<&Cursor>) -> Result<Vec<Reading>, ContractError> {
        let rows = self.store.rows_after(cursor).await?;
        metrics::counter!("station_rows_fetched_total", "query" => "after")
            .increment(rows.len() as u64);
        debug!(rows = rows.len(), "fetched rows after cursor");
        Ok(rows)
    }

    /// Rows strictly after an instant, for time-anchored backfill.
    #[instrument(name = "reader_since", level = "debug", skip(self))]
    pub async fn since(&self, instant: DateTime<Utc>) -> Result<Vec<Reading>, ContractError> {
        let rows = self.store.rows_since(instant).await?;
        metrics::counter!("station_rows_fetched_total", "query" => "since")
            .increment(rows.len() as u64);
        debug!(rows = rows.len(), "fetched rows since instant");
        Ok(rows)
    }
}
