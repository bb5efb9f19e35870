//! # Driver
//!
//! Incremental record streaming core: folds sparse per-sensor rows into
//! merged station packets and drives the three traversal modes (live
//! tailing, startup catch-up, bounded archive replay) over one cursor-based
//! reader.
//!
//! The storage engine stays external behind [`contracts::RowStore`];
//! [`MemoryRowStore`] is the bundled in-memory implementation for tests and
//! file-backed replay.

mod engine;
mod memory_store;
mod merge;
mod reader;
mod role_map;

pub use engine::RecordStreamEngine;
pub use memory_store::MemoryRowStore;
pub use merge::merge;
pub use reader::IncrementalReader;
pub use role_map::SensorRoleMap;
