//! # Report Codec
//!
//! Decoding of raw station bridge reports into [`contracts::Reading`] fields.
//!
//! The bridge POSTs observation reports as `key=value&key=value` lines.
//! Sensor reports carry fixed-point ASCII measurement fields; pressure
//! reports (`mt=pressure`) carry the bridge's own calibration words, from
//! which absolute pressure is computed.
//!
//! The streaming core never writes storage; this codec backs the offline
//! `parse` tool and test fixtures.

mod decode;
mod pressure;
mod report;

pub use report::Report;
