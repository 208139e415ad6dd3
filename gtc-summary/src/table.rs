//! Summary-table rows.
//!
//! Each line of the table describes one sub-project, tokens separated by
//! whitespace:
//!
//! ```text
//! <name> <buildStatus> [<taskStatus>] <result> [<passed> [<failures> [<errors> [<skipped>]]]]
//! ```
//!
//! The task-status column only exists in the [`TableSchema::WithTaskStatus`]
//! layout. Trailing counts may be missing; a missing count is absent, not
//! zero.

use std::path::Path;

use tracing::debug;

use crate::config::TableSchema;
use crate::error::{Error, Result};

/// Token standing for a missing task status.
pub const NULL_TOKEN: &str = "null";

/// Status shown for a sub-project whose build failed without failing tests.
pub const BUILD_ERROR_STATUS: &str = "ERROR";

/// One parsed line of the summary table.
///
/// Field names are the names templates refer to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectSummaryRow {
    pub project_name: String,
    /// `project_name` with `:` replaced by `__`, usable as an HTML id.
    pub project_name_esc: String,
    pub status_str: String,
    pub build_status_str: String,
    pub task_status_str: Option<String>,
    pub result_str: String,
    pub passed: Option<u64>,
    pub failures: Option<u64>,
    pub errors: Option<u64>,
    pub skipped: Option<u64>,
    /// Sum of the counts present; `None` when no count is present.
    pub tests: Option<u64>,
    pub is_effective: bool,
}

/// The four optional counts of a row, in table order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RowCounts {
    pub passed: Option<u64>,
    pub failures: Option<u64>,
    pub errors: Option<u64>,
    pub skipped: Option<u64>,
}

impl RowCounts {
    /// Sum of the counts present, `None` when no count is present.
    /// Saturates at `u64::MAX`.
    #[must_use]
    pub fn total(&self) -> Option<u64> {
        self.present().reduce(u64::saturating_add)
    }

    /// Whether the counts present add up to more than `u64::MAX`.
    #[must_use]
    pub fn overflows(&self) -> bool {
        self.present().try_fold(0_u64, u64::checked_add).is_none()
    }

    fn present(&self) -> impl Iterator<Item = u64> {
        [self.passed, self.failures, self.errors, self.skipped]
            .into_iter()
            .flatten()
    }
}

impl ProjectSummaryRow {
    /// Build a row and compute its derived fields.
    #[must_use]
    pub fn new(
        project_name: &str,
        build_status: &str,
        task_status: Option<&str>,
        result: &str,
        counts: RowCounts,
    ) -> Self {
        let tests = counts.total();
        Self {
            project_name: project_name.to_owned(),
            project_name_esc: escape_project_name(project_name),
            status_str: decide_status(build_status, task_status, result).to_owned(),
            build_status_str: build_status.to_owned(),
            task_status_str: task_status.map(str::to_owned),
            result_str: result.to_owned(),
            passed: counts.passed,
            failures: counts.failures,
            errors: counts.errors,
            skipped: counts.skipped,
            tests,
            is_effective: tests.is_some(),
        }
    }

    /// Parse one table line. `line_no` is 1-based and only used in errors.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedRow`] if the line has fewer than two tokens
    /// or a count token is not a non-negative integer.
    pub fn parse(line: &str, line_no: usize, schema: TableSchema) -> Result<Self> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() < 2 {
            return Err(Error::malformed_row(
                line_no,
                0,
                line,
                format!(
                    "expected at least a project name and a build status, found {} token(s)",
                    tokens.len()
                ),
            ));
        }

        let task_status = match schema {
            TableSchema::Basic => None,
            TableSchema::WithTaskStatus => tokens
                .get(2)
                .copied()
                .filter(|t| !t.eq_ignore_ascii_case(NULL_TOKEN)),
        };

        let result_column = schema.result_column();
        let result = tokens.get(result_column).copied().unwrap_or_default();

        let count_at = |offset: usize| -> Result<Option<u64>> {
            let column = result_column + 1 + offset;
            tokens
                .get(column)
                .map(|token| {
                    token.parse::<u64>().map_err(|_| {
                        Error::malformed_row(
                            line_no,
                            column + 1,
                            line,
                            format!("count '{token}' is not a non-negative integer"),
                        )
                    })
                })
                .transpose()
        };

        let counts = RowCounts {
            passed: count_at(0)?,
            failures: count_at(1)?,
            errors: count_at(2)?,
            skipped: count_at(3)?,
        };
        if counts.overflows() {
            return Err(Error::malformed_row(
                line_no,
                0,
                line,
                "sum of the counts does not fit in 64 bits",
            ));
        }

        Ok(Self::new(tokens[0], tokens[1], task_status, result, counts))
    }
}

/// Replace `:` (Gradle's project path separator) with `__`.
#[must_use]
pub fn escape_project_name(name: &str) -> String {
    name.replace(':', "__")
}

/// Display status of a row, in priority order: failed tests, failed build,
/// task status for rows without a result, raw result.
#[must_use]
pub fn decide_status<'a>(
    build_status: &'a str,
    task_status: Option<&'a str>,
    result: &'a str,
) -> &'a str {
    if result.eq_ignore_ascii_case("failed") {
        result
    } else if build_status.eq_ignore_ascii_case("failed") {
        BUILD_ERROR_STATUS
    } else if let Some(task) = task_status
        && result.eq_ignore_ascii_case("no-result")
    {
        task
    } else {
        result
    }
}

/// Parse a whole table. Blank lines are skipped; line numbers count them.
///
/// # Errors
///
/// Returns the first [`Error::MalformedRow`] encountered.
pub fn parse_table(content: &str, schema: TableSchema) -> Result<Vec<ProjectSummaryRow>> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| ProjectSummaryRow::parse(line, idx + 1, schema))
        .collect()
}

/// Read and parse a summary-table file.
///
/// # Errors
///
/// Returns [`Error::FileAccess`] if the file cannot be read, otherwise the
/// errors of [`parse_table`].
pub fn load_table(path: &Path, schema: TableSchema) -> Result<Vec<ProjectSummaryRow>> {
    let content = std::fs::read_to_string(path).map_err(|e| Error::file_access(path, e))?;
    let rows = parse_table(&content, schema)?;
    debug!(file = %path.display(), rows = rows.len(), "loaded summary table");
    Ok(rows)
}
