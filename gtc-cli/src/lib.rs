//! Command-line front ends of the Gradle Test Collector.
//!
//! Each binary in `src/bin` parses its [`clap`] arguments, installs logging
//! and delegates to the `run` function of its module here.

pub mod get_summary;
pub mod logging;
pub mod report_index;
