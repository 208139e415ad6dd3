//! Summary extraction from Gradle JUnit XML result files.
//!
//! Gradle writes one `TEST-<class>.xml` per test class with a `<testsuite>`
//! root element whose attributes carry the counts. Reports produced by other
//! tools wrap suites in a `<testsuites>` root; its own counts are used when
//! present, otherwise its single `<testsuite>` child. Deeper nesting is
//! rejected.

use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDateTime, Utc};
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use tracing::debug;
use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::record::TestCountRecord;

/// Name of the element carrying the summary attributes.
pub const SUMMARY_ELEMENT: &[u8] = b"testsuite";

/// Attributes the summary element must carry.
const COUNT_ATTRIBUTES: [&str; 4] = ["tests", "failures", "errors", "skipped"];

/// Timestamp layouts without an offset, tried after RFC 3339.
const NAIVE_TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
];

/// Parse a JUnit XML document into a count record.
///
/// The root element is used when it is a `<testsuite>` or carries all four
/// count attributes itself. Otherwise exactly one direct `<testsuite>` child must
/// exist. `source` is only used to name the document in errors.
///
/// # Errors
///
/// Returns [`Error::MalformedInput`] if the document is not well-formed XML,
/// has no summary element at the root or directly below it, has several
/// `<testsuite>` children under a root without counts, or the element lacks
/// a valid `tests`, `failures`, `errors` or `skipped` attribute.
pub fn parse_summary_xml(content: &str, source: &Path) -> Result<TestCountRecord> {
    let mut reader = Reader::from_str(content);
    let mut depth: usize = 0;
    let mut child: Option<TestCountRecord> = None;

    loop {
        let event = reader.read_event().map_err(|e| {
            Error::malformed_input(
                source,
                format!("invalid XML at byte {}: {e}", reader.error_position()),
            )
        })?;

        match event {
            Event::Start(ref element) | Event::Empty(ref element) => {
                if depth == 0 && (is_summary_element(element) || carries_counts(element)) {
                    return record_from_element(element, source);
                }
                if depth == 1 && is_summary_element(element) {
                    if child.is_some() {
                        return Err(Error::malformed_input(
                            source,
                            "several <testsuite> elements below a root without counts",
                        ));
                    }
                    child = Some(record_from_element(element, source)?);
                }
                if matches!(event, Event::Start(_)) {
                    depth += 1;
                } else if depth == 0 {
                    break;
                }
            }
            Event::End(_) => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    break;
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    child.ok_or_else(|| {
        Error::malformed_input(
            source,
            "no <testsuite> element at the root or directly below it",
        )
    })
}

/// Read and parse one XML result file.
///
/// # Errors
///
/// Returns [`Error::FileAccess`] if the file cannot be read, otherwise the
/// errors of [`parse_summary_xml`].
pub fn load_summary(path: &Path) -> Result<TestCountRecord> {
    let content = std::fs::read_to_string(path).map_err(|e| Error::file_access(path, e))?;
    let record = parse_summary_xml(&content, path)?;
    debug!(
        file = %path.display(),
        tests = record.tests(),
        failures = record.failures(),
        errors = record.errors(),
        skipped = record.skipped(),
        "loaded test result"
    );
    Ok(record)
}

/// Aggregate the given XML files into one record.
///
/// Files are loaded in order; an empty list yields [`TestCountRecord::zero`].
///
/// # Errors
///
/// Returns the first error from [`load_summary`]; no file is skipped.
/// [`Error::MalformedInput`] names the file whose counts overflow the total.
pub fn summarize<P: AsRef<Path>>(paths: &[P]) -> Result<TestCountRecord> {
    let mut total = TestCountRecord::zero();
    for path in paths {
        let path = path.as_ref();
        total = total
            .checked_merge(&load_summary(path)?)
            .ok_or_else(|| Error::malformed_input(path, "counts overflow the aggregated total"))?;
    }
    Ok(total)
}

/// Expand command-line inputs into the list of XML files to load.
///
/// Files are kept as given. Directories contribute every `*.xml` file below
/// them, sorted by path.
///
/// # Errors
///
/// Returns [`Error::FileAccess`] if an input does not exist or a directory
/// cannot be traversed.
pub fn collect_xml_files(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for input in inputs {
        let metadata = std::fs::metadata(input).map_err(|e| Error::file_access(input, e))?;
        if !metadata.is_dir() {
            files.push(input.clone());
            continue;
        }

        let mut found = Vec::new();
        for entry in WalkDir::new(input).follow_links(false) {
            let entry = entry.map_err(|e| {
                let path = e.path().map_or_else(|| input.clone(), Path::to_path_buf);
                Error::file_access(&path, e.into())
            })?;
            let path = entry.path();
            if entry.file_type().is_file() && has_xml_extension(path) {
                found.push(path.to_path_buf());
            }
        }
        found.sort();
        debug!(dir = %input.display(), files = found.len(), "expanded result directory");
        files.extend(found);
    }

    Ok(files)
}

fn has_xml_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("xml"))
}

fn is_summary_element(element: &BytesStart<'_>) -> bool {
    element.local_name().as_ref() == SUMMARY_ELEMENT
}

fn carries_counts(element: &BytesStart<'_>) -> bool {
    COUNT_ATTRIBUTES
        .iter()
        .all(|name| matches!(element.try_get_attribute(*name), Ok(Some(_))))
}

fn record_from_element(element: &BytesStart<'_>, source: &Path) -> Result<TestCountRecord> {
    let tests = required_count(element, "tests", source)?;
    let failures = required_count(element, "failures", source)?;
    let errors = required_count(element, "errors", source)?;
    let skipped = required_count(element, "skipped", source)?;

    let timestamp = match attribute(element, "timestamp", source)? {
        Some(raw) => Some(parse_timestamp(&raw).ok_or_else(|| {
            Error::malformed_input(source, format!("invalid timestamp '{raw}'"))
        })?),
        None => None,
    };

    TestCountRecord::new(timestamp, tests, failures, errors, skipped).ok_or_else(|| {
        Error::malformed_input(
            source,
            format!(
                "failures ({failures}) + errors ({errors}) + skipped ({skipped}) exceed tests ({tests})"
            ),
        )
    })
}

fn attribute(element: &BytesStart<'_>, name: &str, source: &Path) -> Result<Option<String>> {
    let Some(attr) = element
        .try_get_attribute(name)
        .map_err(|e| Error::malformed_input(source, format!("attribute '{name}': {e}")))?
    else {
        return Ok(None);
    };
    let value = attr
        .unescape_value()
        .map_err(|e| Error::malformed_input(source, format!("attribute '{name}': {e}")))?;
    Ok(Some(value.into_owned()))
}

fn required_count(element: &BytesStart<'_>, name: &str, source: &Path) -> Result<u64> {
    let raw = attribute(element, name, source)?.ok_or_else(|| {
        Error::malformed_input(source, format!("<testsuite> has no '{name}' attribute"))
    })?;
    raw.trim().parse::<u64>().map_err(|_| {
        Error::malformed_input(
            source,
            format!("attribute '{name}' is not a non-negative integer: '{raw}'"),
        )
    })
}

/// Parse an ISO-8601 timestamp. Values without an offset are taken as UTC.
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NAIVE_TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}
