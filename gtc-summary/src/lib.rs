//! # gtc-summary
//!
//! Test-result aggregation for multi-project Gradle builds.
//!
//! Two pipelines share this crate:
//!
//! - **Summary extraction**: JUnit XML files written by Gradle are parsed into
//!   [`TestCountRecord`]s and merged into one line of the summary table.
//! - **Index rendering**: the summary table is parsed into
//!   [`ProjectSummaryRow`]s, collected into a [`ReportContext`] and rendered
//!   through Mustache templates.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::path::{Path, PathBuf};
//! use gtc_summary::{
//!     OutputTarget, ReportContext, ReportTemplates, SummaryLayout, TableSchema, ToolInfo,
//! };
//!
//! let files = gtc_summary::collect_xml_files(&[PathBuf::from("build/test-results/test")]).unwrap();
//! let record = gtc_summary::summarize(&files).unwrap();
//! println!("{}", gtc_summary::output::format_summary_line(&record, SummaryLayout::Plain));
//!
//! let rows = gtc_summary::load_table(Path::new("summary.txt"), TableSchema::default()).unwrap();
//! let ctx = ReportContext::new(rows, &ToolInfo::default(), &chrono::Local::now());
//! let templates = ReportTemplates::builtin().unwrap();
//! gtc_summary::write_report(&templates, &ctx, &OutputTarget::Directory("report".into())).unwrap();
//! ```

mod config;
mod error;
mod extract;
pub mod output;
mod record;
mod render;
mod report;
mod table;

pub use config::{
    INDEX_FILE_NAME, OutputTarget, SummaryLayout, TOP_FILE_NAME, TableSchema, ToolInfo,
};
pub use error::{Error, Result};
pub use extract::{collect_xml_files, load_summary, parse_summary_xml, parse_timestamp, summarize};
pub use record::{TestCountRecord, TestResult};
pub use render::{ReportTemplates, Template, write_report};
pub use report::{DATETIME_FORMAT, ReportContext, StatusCount, Totals};
pub use table::{
    BUILD_ERROR_STATUS, ProjectSummaryRow, RowCounts, decide_status, escape_project_name,
    load_table, parse_table,
};
