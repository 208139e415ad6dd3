use std::io::IsTerminal;

use tracing::debug;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::ChronoLocal;

/// Timestamp layout of log lines, e.g. `2024-03-01 10:15:30,123`.
const LOG_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S,%3f";

/// Map the `-v` count to a default filter directive.
#[must_use]
pub fn level_for(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install the global subscriber. Logs go to stderr so stdout only carries
/// program output.
///
/// `RUST_LOG` takes precedence over `verbose` when set.
pub fn init(verbose: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_for(verbose)));

    // Colors only when stderr is a terminal
    let use_colors = std::io::stderr().is_terminal();

    // A subscriber may already be installed when running under a test harness
    if let Err(e) = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(use_colors)
        .with_target(false)
        .with_timer(ChronoLocal::new(LOG_TIME_FORMAT.to_owned()))
        .try_init()
    {
        debug!(error = %e, "keeping the global subscriber already installed");
    }
}
