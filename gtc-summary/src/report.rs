//! Template data for the report index.

use std::collections::BTreeMap;

use chrono::{DateTime, TimeZone};
use mustache::{Data, MapBuilder};

use crate::config::ToolInfo;
use crate::table::ProjectSummaryRow;

/// `strftime` layout of `datetime_str`, e.g. `Mar 01, 2024,  3:04:05 PM`.
pub const DATETIME_FORMAT: &str = "%b %d, %Y, %l:%M:%S %p";

/// Sums over all rows; absent counts contribute zero. Sums saturate at
/// `u64::MAX`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Totals {
    pub passed: u64,
    pub failures: u64,
    pub errors: u64,
    pub skipped: u64,
    pub tests: u64,
}

impl Totals {
    #[must_use]
    pub fn from_rows(rows: &[ProjectSummaryRow]) -> Self {
        let sum_by = |field: fn(&ProjectSummaryRow) -> Option<u64>| -> u64 {
            rows.iter().filter_map(field).fold(0, u64::saturating_add)
        };
        Self {
            passed: sum_by(|r| r.passed),
            failures: sum_by(|r| r.failures),
            errors: sum_by(|r| r.errors),
            skipped: sum_by(|r| r.skipped),
            tests: sum_by(|r| r.tests),
        }
    }
}

/// One bar of the status histogram.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusCount {
    pub status: String,
    pub count: usize,
}

/// Everything a report template can refer to.
///
/// Built once per invocation and handed to every template unchanged.
#[derive(Debug, Clone)]
pub struct ReportContext {
    pub tool_name: Option<String>,
    pub tool_url: Option<String>,
    pub tool_version: Option<String>,
    pub datetime_str: String,
    /// Rows in table order.
    pub project_table: Vec<ProjectSummaryRow>,
    pub project_table_row_count: usize,
    /// Occurrences of each `status_str`.
    pub status_frequency: BTreeMap<String, usize>,
    /// `status_frequency` as a list, sorted by status.
    pub status_frequency_list: Vec<StatusCount>,
    pub total: Totals,
}

impl ReportContext {
    #[must_use]
    pub fn new<Tz>(rows: Vec<ProjectSummaryRow>, tool: &ToolInfo, generated_at: &DateTime<Tz>) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        let mut status_frequency: BTreeMap<String, usize> = BTreeMap::new();
        for row in &rows {
            *status_frequency.entry(row.status_str.clone()).or_default() += 1;
        }
        let status_frequency_list = status_frequency
            .iter()
            .map(|(status, count)| StatusCount {
                status: status.clone(),
                count: *count,
            })
            .collect();

        Self {
            tool_name: tool.name.clone(),
            tool_url: tool.url.clone(),
            tool_version: tool.version.clone(),
            datetime_str: generated_at.format(DATETIME_FORMAT).to_string(),
            total: Totals::from_rows(&rows),
            project_table_row_count: rows.len(),
            project_table: rows,
            status_frequency,
            status_frequency_list,
        }
    }

    /// Template data. Absent values are left out so they render as empty
    /// and count as false in sections.
    #[must_use]
    pub fn to_data(&self) -> Data {
        let builder = MapBuilder::new()
            .insert_str("datetime_str", self.datetime_str.as_str())
            .insert_str(
                "project_table_row_count",
                self.project_table_row_count.to_string(),
            )
            .insert_vec("project_table", |vec| {
                self.project_table
                    .iter()
                    .fold(vec, |vec, row| vec.push_map(|map| row_data(map, row)))
            })
            .insert_map("status_frequency", |map| {
                self.status_frequency
                    .iter()
                    .fold(map, |map, (status, count)| {
                        map.insert_str(status.as_str(), count.to_string())
                    })
            })
            .insert_vec("status_frequency_list", |vec| {
                self.status_frequency_list.iter().fold(vec, |vec, entry| {
                    vec.push_map(|map| {
                        map.insert_str("status", entry.status.as_str())
                            .insert_str("count", entry.count.to_string())
                    })
                })
            })
            .insert_map("total", |map| {
                map.insert_str("passed", self.total.passed.to_string())
                    .insert_str("failures", self.total.failures.to_string())
                    .insert_str("errors", self.total.errors.to_string())
                    .insert_str("skipped", self.total.skipped.to_string())
                    .insert_str("tests", self.total.tests.to_string())
            });

        let builder = insert_opt(builder, "tool_name", self.tool_name.as_ref());
        let builder = insert_opt(builder, "tool_url", self.tool_url.as_ref());
        let builder = insert_opt(builder, "tool_version", self.tool_version.as_ref());
        builder.build()
    }
}

fn row_data(map: MapBuilder, row: &ProjectSummaryRow) -> MapBuilder {
    let map = map
        .insert_str("project_name", row.project_name.as_str())
        .insert_str("project_name_esc", row.project_name_esc.as_str())
        .insert_str("status_str", row.status_str.as_str())
        .insert_str("build_status_str", row.build_status_str.as_str())
        .insert_str("result_str", row.result_str.as_str())
        .insert_bool("is_effective", row.is_effective);
    let map = insert_opt(map, "task_status_str", row.task_status_str.as_ref());
    let map = insert_opt(map, "passed", row.passed.as_ref());
    let map = insert_opt(map, "failures", row.failures.as_ref());
    let map = insert_opt(map, "errors", row.errors.as_ref());
    let map = insert_opt(map, "skipped", row.skipped.as_ref());
    insert_opt(map, "tests", row.tests.as_ref())
}

fn insert_opt<T: ToString>(map: MapBuilder, key: &str, value: Option<&T>) -> MapBuilder {
    match value {
        Some(value) => map.insert_str(key, value.to_string()),
        None => map,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TableSchema;
    use crate::table::parse_table;
    use chrono::{TimeZone, Utc};

    fn rows(content: &str) -> Vec<ProjectSummaryRow> {
        parse_table(content, TableSchema::WithTaskStatus).unwrap()
    }

    fn generated_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 15, 4, 5).unwrap()
    }

    #[test]
    fn test_totals_skip_absent_counts() {
        let rows = rows(
            "a SUCCESSFUL null passed 3 0 0 1\n\
             b FAILED null failed 1 2\n\
             c SUCCESSFUL SKIPPED no-result\n",
        );
        let totals = Totals::from_rows(&rows);
        assert_eq!(
            totals,
            Totals {
                passed: 4,
                failures: 2,
                errors: 0,
                skipped: 1,
                tests: 7,
            }
        );
    }

    #[test]
    fn test_totals_saturate_instead_of_overflowing() {
        let totals = Totals::from_rows(&rows(
            "a SUCCESSFUL null passed 18446744073709551615\nb SUCCESSFUL null passed 1\n",
        ));
        assert_eq!(totals.passed, u64::MAX);
        assert_eq!(totals.tests, u64::MAX);
    }

    #[test]
    fn test_context_counts_statuses() {
        let rows = rows(
            "a SUCCESSFUL null passed 1 0 0 0\n\
             b SUCCESSFUL null passed 2 0 0 0\n\
             c FAILED null no-result\n",
        );
        let ctx = ReportContext::new(rows, &ToolInfo::default(), &generated_at());
        assert_eq!(ctx.project_table_row_count, 3);
        assert_eq!(ctx.status_frequency.get("passed"), Some(&2));
        assert_eq!(ctx.status_frequency.get("ERROR"), Some(&1));
        assert_eq!(
            ctx.status_frequency_list,
            vec![
                StatusCount {
                    status: "ERROR".to_owned(),
                    count: 1
                },
                StatusCount {
                    status: "passed".to_owned(),
                    count: 2
                },
            ]
        );
    }

    #[test]
    fn test_context_keeps_row_order() {
        let rows = rows("z SUCCESSFUL null passed\na SUCCESSFUL null passed\n");
        let ctx = ReportContext::new(rows, &ToolInfo::default(), &generated_at());
        let names: Vec<&str> = ctx
            .project_table
            .iter()
            .map(|r| r.project_name.as_str())
            .collect();
        assert_eq!(names, vec!["z", "a"]);
    }

    #[test]
    fn test_datetime_str_format() {
        let ctx = ReportContext::new(Vec::new(), &ToolInfo::default(), &generated_at());
        assert_eq!(ctx.datetime_str, "Mar 01, 2024,  3:04:05 PM");
    }

    #[test]
    fn test_empty_context() {
        let ctx = ReportContext::new(Vec::new(), &ToolInfo::default(), &generated_at());
        assert_eq!(ctx.project_table_row_count, 0);
        assert_eq!(ctx.total, Totals::default());
        assert!(ctx.status_frequency.is_empty());
    }
}
