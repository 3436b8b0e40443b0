//! refmail binary entry point.

use refmail::cli::{self, Cli};
use refmail::ui::output;
use tracing_subscriber::EnvFilter;

/// Environment variable overriding the log filter.
const LOG_ENV: &str = "REFMAIL_LOG";

fn main() {
    let cli = Cli::parse_args();
    init_tracing(cli.debug);

    if let Err(e) = cli::run(cli) {
        output::error(format!("{e:#}"));
        std::process::exit(1);
    }
}

fn init_tracing(debug: bool) {
    let default = if debug { "refmail=debug" } else { "refmail=warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
