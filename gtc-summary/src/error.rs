//! Error types for summary extraction and report rendering.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Every failure aborts the pipeline that raised it; nothing is retried or
/// skipped.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// A test-result XML file lacks the summary element or one of its
    /// required attributes, or is not well-formed.
    #[error("{}: malformed test result: {reason}", .path.display())]
    MalformedInput {
        /// The offending XML file.
        path: PathBuf,
        /// Human-readable description of the problem.
        reason: String,
    },

    /// A summary-table line has too few tokens or a non-numeric count.
    #[error("line {line_no}, column {column}: {reason} [{line}]")]
    MalformedRow {
        /// 1-based line number within the table file.
        line_no: usize,
        /// 1-based token column; 0 when the whole line is at fault.
        column: usize,
        /// The raw line content.
        line: String,
        /// Human-readable description of the problem.
        reason: String,
    },

    /// A path could not be read, listed, or written.
    #[error("{}: {source}", .path.display())]
    FileAccess {
        /// The path being accessed.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A template failed to compile or render.
    #[error("template {name}: {reason}")]
    Template {
        /// Template name (file path or built-in name).
        name: String,
        /// Description reported by the template engine.
        reason: String,
    },
}

impl Error {
    pub(crate) fn malformed_input(path: &Path, reason: impl Into<String>) -> Self {
        Self::MalformedInput {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }

    pub(crate) fn malformed_row(
        line_no: usize,
        column: usize,
        line: &str,
        reason: impl Into<String>,
    ) -> Self {
        Self::MalformedRow {
            line_no,
            column,
            line: line.trim_end().to_owned(),
            reason: reason.into(),
        }
    }

    pub(crate) fn file_access(path: &Path, source: std::io::Error) -> Self {
        Self::FileAccess {
            path: path.to_path_buf(),
            source,
        }
    }
}
