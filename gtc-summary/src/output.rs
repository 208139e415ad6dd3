//! Output formatting for aggregated test counts.
//!
//! Provides the summary-table line and a JSON document for a
//! `TestCountRecord`.

use std::io::Write;

use chrono::SecondsFormat;
use serde::Serialize;

use crate::config::SummaryLayout;
use crate::record::{TestCountRecord, TestResult};

/// Printed in place of a timestamp when no input carried one.
pub const MISSING_TIMESTAMP: &str = "null";

#[derive(Serialize)]
struct SummaryDocument<'a> {
    result: TestResult,
    #[serde(flatten)]
    record: &'a TestCountRecord,
}

/// Format a record as one line of space-separated fields, without newline.
///
/// `result [timestamp] passed failures errors skipped`
#[must_use]
pub fn format_summary_line(record: &TestCountRecord, layout: SummaryLayout) -> String {
    let mut fields: Vec<String> = vec![record.result().to_string()];
    if layout == SummaryLayout::Timestamped {
        fields.push(record.timestamp().map_or_else(
            || MISSING_TIMESTAMP.to_owned(),
            |ts| ts.to_rfc3339_opts(SecondsFormat::AutoSi, false),
        ));
    }
    fields.extend(
        [
            record.passed(),
            record.failures(),
            record.errors(),
            record.skipped(),
        ]
        .iter()
        .map(u64::to_string),
    );
    fields.join(" ")
}

/// Write the summary line followed by a newline.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_line(
    record: &TestCountRecord,
    layout: SummaryLayout,
    writer: &mut dyn Write,
) -> std::io::Result<()> {
    writeln!(writer, "{}", format_summary_line(record, layout))
}

/// Write the record and its result as pretty JSON.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_json(record: &TestCountRecord, writer: &mut dyn Write) -> std::io::Result<()> {
    let doc = SummaryDocument {
        result: record.result(),
        record,
    };
    let json = serde_json::to_string_pretty(&doc)?;
    writeln!(writer, "{json}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn record() -> TestCountRecord {
        let ts = Utc.with_ymd_and_hms(2024, 3, 1, 10, 15, 30).unwrap();
        TestCountRecord::new(Some(ts), 6, 1, 0, 2).unwrap()
    }

    #[test]
    fn test_timestamped_line() {
        assert_eq!(
            format_summary_line(&record(), SummaryLayout::Timestamped),
            "failed 2024-03-01T10:15:30+00:00 3 1 0 2"
        );
    }

    #[test]
    fn test_plain_line() {
        assert_eq!(
            format_summary_line(&record(), SummaryLayout::Plain),
            "failed 3 1 0 2"
        );
    }

    #[test]
    fn test_zero_record_line() {
        let zero = TestCountRecord::zero();
        assert_eq!(
            format_summary_line(&zero, SummaryLayout::Timestamped),
            "NO-TESTS null 0 0 0 0"
        );
    }

    #[test]
    fn test_write_json() {
        let mut out = Vec::new();
        write_json(&record(), &mut out).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["result"], "failed");
        assert_eq!(value["tests"], 6);
        assert_eq!(value["passed"], 3);
        assert_eq!(value["skipped"], 2);
        assert_eq!(value["timestamp"], "2024-03-01T10:15:30Z");
    }
}
