use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use gtc_summary::{SummaryLayout, collect_xml_files, output, summarize};
use tracing::info;

/// Output format of the aggregated summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// One line of the summary table
    Text,
    /// Pretty-printed JSON object
    Json,
}

/// Print one summary-table line aggregated from Gradle JUnit XML results.
#[derive(Debug, Parser)]
#[command(name = "gtc-get-summary", version)]
pub struct Args {
    /// JUnit XML result files, or directories searched for `*.xml`
    #[arg(required = true, value_name = "XML")]
    pub inputs: Vec<PathBuf>,

    /// Leave the timestamp column out of the text line
    #[arg(long)]
    pub no_timestamp: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Text)]
    pub format: Format,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    #[must_use]
    pub fn layout(&self) -> SummaryLayout {
        if self.no_timestamp {
            SummaryLayout::Plain
        } else {
            SummaryLayout::Timestamped
        }
    }
}

/// Aggregate the inputs and write the summary to `out`.
///
/// # Errors
///
/// Returns an error if an input is missing or unreadable, an XML file is
/// malformed, or writing to `out` fails.
pub fn run(args: &Args, out: &mut dyn Write) -> Result<()> {
    let files = collect_xml_files(&args.inputs).context("Failed to collect test result files")?;
    info!(files = files.len(), "summarizing test results");

    let record = summarize(&files)?;
    info!(result = %record.result(), tests = record.tests(), "aggregated test results");

    match args.format {
        Format::Text => output::write_line(&record, args.layout(), out)?,
        Format::Json => output::write_json(&record, out)?,
    }
    Ok(())
}
