//! Configuration types for extraction and rendering.
//!
//! Everything here is plain data resolved by the caller. The library never
//! reads environment variables or picks default paths on its own.

use std::path::{Path, PathBuf};

/// Column layout of the summary table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[non_exhaustive]
pub enum TableSchema {
    /// `name buildStatus result counts...`
    Basic,
    /// `name buildStatus taskStatus result counts...` (current layout).
    #[default]
    WithTaskStatus,
}

impl TableSchema {
    /// 0-based column of the result token.
    pub(crate) fn result_column(self) -> usize {
        match self {
            Self::Basic => 2,
            Self::WithTaskStatus => 3,
        }
    }
}

/// Field layout of the extractor's output line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[non_exhaustive]
pub enum SummaryLayout {
    /// `result timestamp passed failures errors skipped`
    #[default]
    Timestamped,
    /// `result passed failures errors skipped`
    Plain,
}

/// Branding shown in rendered reports.
///
/// Empty strings are treated as absent so an exported-but-empty variable
/// renders the same as an unset one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[non_exhaustive]
pub struct ToolInfo {
    pub name: Option<String>,
    pub url: Option<String>,
    pub version: Option<String>,
}

impl ToolInfo {
    #[must_use]
    pub fn new(name: Option<String>, url: Option<String>, version: Option<String>) -> Self {
        Self {
            name: non_empty(name),
            url: non_empty(url),
            version: non_empty(version),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// File name of the full report page in directory mode.
pub const INDEX_FILE_NAME: &str = "index.html";

/// File name of the condensed fragment in directory mode.
pub const TOP_FILE_NAME: &str = "top.html";

/// Where rendered documents are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    /// Write `index.html` and `top.html` into this directory.
    Directory(PathBuf),
    /// Write only the index document to this file.
    File(PathBuf),
}

impl OutputTarget {
    /// Directory mode when `path` is an existing directory, file mode
    /// otherwise.
    #[must_use]
    pub fn for_path(path: &Path) -> Self {
        if path.is_dir() {
            Self::Directory(path.to_path_buf())
        } else {
            Self::File(path.to_path_buf())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_info_drops_empty_values() {
        let info = ToolInfo::new(
            Some("gradle-test-collector".to_owned()),
            Some("  ".to_owned()),
            None,
        );
        assert_eq!(info.name.as_deref(), Some("gradle-test-collector"));
        assert_eq!(info.url, None);
        assert_eq!(info.version, None);
    }

    #[test]
    fn test_output_target_for_existing_dir() {
        let tmp = tempfile::TempDir::new().unwrap();
        assert_eq!(
            OutputTarget::for_path(tmp.path()),
            OutputTarget::Directory(tmp.path().to_path_buf())
        );
        let file = tmp.path().join("report.html");
        assert_eq!(OutputTarget::for_path(&file), OutputTarget::File(file.clone()));
    }
}
