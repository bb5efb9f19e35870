//! # Contracts
//!
//! Frozen interface contracts (ICD), defining inter-module data structures and traits.
//! All business crates can only depend on this crate, reverse dependencies are prohibited.
//!
//! ## Time Model
//! - Row instants are UTC (`chrono::DateTime<Utc>`)
//! - Emitted packets carry `dateTime` as epoch seconds (`i64`), strictly
//!   increasing within one traversal

mod config;
mod error;
mod packet;
mod reading;
mod role;
mod row_store;

pub use config::*;
pub use error::*;
pub use packet::*;
pub use reading::*;
pub use role::*;
pub use row_store::{LocalRowStore, RowStore};
