use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use gtc_summary::{
    OutputTarget, ReportContext, ReportTemplates, TableSchema, ToolInfo, load_table, write_report,
};
use tracing::info;

/// Summary-table layout accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Schema {
    /// `name buildStatus result counts...`
    Basic,
    /// `name buildStatus taskStatus result counts...`
    WithTaskStatus,
}

impl From<Schema> for TableSchema {
    fn from(schema: Schema) -> Self {
        match schema {
            Schema::Basic => Self::Basic,
            Schema::WithTaskStatus => Self::WithTaskStatus,
        }
    }
}

/// Render the test report index from a summary table.
#[derive(Debug, Parser)]
#[command(name = "gtc-report-index", version)]
pub struct Args {
    /// Summary table, one line per sub-project
    pub summary_path: PathBuf,

    /// Existing directory (writes index.html and top.html) or output file (index only)
    pub output: PathBuf,

    /// Template of the index page (default: built-in)
    #[arg(long = "template-index", visible_alias = "template", value_name = "PATH")]
    pub template_index: Option<PathBuf>,

    /// Template of the top fragment (default: built-in)
    #[arg(long, value_name = "PATH")]
    pub template_top: Option<PathBuf>,

    /// Column layout of the summary table
    #[arg(long, value_enum, default_value_t = Schema::WithTaskStatus)]
    pub schema: Schema,

    /// Tool name shown in the report
    #[arg(long, env = "GRADLE_TEST_COLLECTOR_APP_NAME")]
    pub tool_name: Option<String>,

    /// Tool URL shown in the report
    #[arg(long, env = "GRADLE_TEST_COLLECTOR_URL")]
    pub tool_url: Option<String>,

    /// Tool version shown in the report
    #[arg(long, env = "GRADLE_TEST_COLLECTOR_VERSION")]
    pub tool_version: Option<String>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    #[must_use]
    pub fn tool_info(&self) -> ToolInfo {
        ToolInfo::new(
            self.tool_name.clone(),
            self.tool_url.clone(),
            self.tool_version.clone(),
        )
    }
}

/// Render the report and return the files written.
///
/// # Errors
///
/// Returns an error if the table or a template cannot be read or parsed, or
/// an output file cannot be written.
pub fn run(args: &Args) -> Result<Vec<PathBuf>> {
    let rows = load_table(&args.summary_path, args.schema.into()).with_context(|| {
        format!(
            "Failed to load summary table {}",
            args.summary_path.display()
        )
    })?;
    info!(rows = rows.len(), "loaded summary table");

    let templates =
        ReportTemplates::load(args.template_index.as_deref(), args.template_top.as_deref())
            .context("Failed to load report templates")?;

    let ctx = ReportContext::new(rows, &args.tool_info(), &chrono::Local::now());
    let target = OutputTarget::for_path(&args.output);
    let written = write_report(&templates, &ctx, &target).context("Failed to write report")?;
    Ok(written)
}
