//! `parse` command implementation.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use observability::{record_decode_failure, record_report_decoded};
use report_codec::Report;
use tracing::{info, warn};

use crate::cli::ParseArgs;

/// Execute the `parse` command.
///
/// Decodes raw bridge report lines (query-string format) into readings and
/// prints them as JSON lines, ready for the stream and replay commands.
/// Undecodable lines are skipped with a warning unless `--strict` is set.
pub fn run_parse(args: &ParseArgs) -> Result<()> {
    let reader: Box<dyn Read> = match &args.input {
        Some(path) => Box::new(
            File::open(path)
                .with_context(|| format!("Failed to open report file {}", path.display()))?,
        ),
        None => Box::new(io::stdin()),
    };

    let mut next_id = args.start_id;
    let mut decoded = 0usize;
    let mut skipped = 0usize;
    for (idx, line) in BufReader::new(reader).lines().enumerate() {
        let line = line.with_context(|| format!("Failed to read line {}", idx + 1))?;
        if line.trim().is_empty() {
            continue;
        }

        match Report::parse(line.trim()) {
            Ok(report) => {
                record_report_decoded(&report.report_type);
                let timestamp = stamp(args.at);
                let reading = report.into_reading(next_id, timestamp);
                println!("{}", serde_json::to_string(&reading)?);
                next_id += 1;
                decoded += 1;
            }
            Err(e) if args.strict => {
                return Err(e).with_context(|| format!("Undecodable report on line {}", idx + 1));
            }
            Err(e) => {
                record_decode_failure("parse");
                warn!(line = idx + 1, error = %e, "Skipping undecodable report");
                skipped += 1;
            }
        }
    }

    info!(decoded, skipped, "Report decoding finished");
    Ok(())
}

fn stamp(fixed: Option<i64>) -> DateTime<Utc> {
    match fixed {
        Some(at) => DateTime::from_timestamp(at, 0).unwrap_or(DateTime::UNIX_EPOCH),
        None => Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stamp_fixed() {
        assert_eq!(stamp(Some(1000)).timestamp(), 1000);
    }

    #[test]
    fn test_stamp_rejects_unrepresentable() {
        assert_eq!(stamp(Some(i64::MAX)), DateTime::UNIX_EPOCH);
    }
}
