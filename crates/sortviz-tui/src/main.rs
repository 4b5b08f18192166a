#![forbid(unsafe_code)]

//! `sortviz` binary entry point.

use sortviz_tui::{app, cli, logging};

fn main() {
    let opts = cli::Opts::parse();

    if let Err(e) = logging::init(opts.log_file.as_deref(), opts.log_json) {
        eprintln!("Failed to initialize logging: {e}");
        std::process::exit(1);
    }

    if let Err(e) = app::run(&opts) {
        tracing::error!(error = %e, "sortviz exited with an error");
        eprintln!("Runtime error: {e}");
        std::process::exit(1);
    }
}
