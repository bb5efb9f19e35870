//! RowStore trait - storage collaborator interface
//!
//! The storage engine itself is external; the core only needs ordered range
//! queries over `(timestamp, id)`. No row is ever mutated or deleted through
//! this interface.

use chrono::{DateTime, Utc};

use crate::{ContractError, Cursor, Reading};

/// Ordered read access to the sensor row store.
///
/// Both queries return rows ascending by `(timestamp, id)`. Implementations
/// must preserve the exact `rows_after` compound predicate: the timestamp
/// bound is inclusive (same-timestamp rows from other sensors may be
/// inserted with a lower id after the cursor row was read) while the id
/// bound is exclusive (never re-return the cursor row itself).
#[trait_variant::make(RowStore: Send)]
pub trait LocalRowStore {
    /// Rows after a cursor: everything when `cursor` is absent, otherwise
    /// `id > cursor.id AND timestamp >= cursor.timestamp`.
    async fn rows_after(&self, cursor: Option<&Cursor>) -> Result<Vec<Reading>, ContractError>;

    /// Rows with `timestamp > instant`, for time-anchored backfill where no
    /// prior cursor exists.
    async fn rows_since(&self, instant: DateTime<Utc>) -> Result<Vec<Reading>, ContractError>;
}
