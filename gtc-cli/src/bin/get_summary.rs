// These Clippy lints are disabled because this is a CLI binary, not a library:
// - print_stderr: CLI tools are expected to report errors on stderr.
// - exit: Calling `std::process::exit()` is standard for CLI apps to signal failure to the shell.
#![allow(clippy::print_stderr, clippy::exit)]

use clap::Parser;
use gtc_cli::{get_summary, logging};

fn main() {
    let args = get_summary::Args::parse();
    logging::init(args.verbose);

    let mut stdout = std::io::stdout().lock();
    if let Err(e) = get_summary::run(&args, &mut stdout) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
