// These Clippy lints are disabled because this is a CLI binary, not a library:
// - print_stderr: CLI tools are expected to report errors on stderr.
// - exit: Calling `std::process::exit()` is standard for CLI apps to signal failure to the shell.
#![allow(clippy::print_stderr, clippy::exit)]

use clap::Parser;
use gtc_cli::{logging, report_index};

fn main() {
    let args = report_index::Args::parse();
    logging::init(args.verbose);

    if let Err(e) = report_index::run(&args) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
