//! logtally: analyze log files and write JSON, CSV and HTML reports.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use lt_cli::app::{self, EXIT_ERROR};
use lt_cli::cli::Cli;
use lt_cli::console;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.default_log_level()));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if cli.log_json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "logtally starting");

    match app::execute(&cli).await {
        Ok(outcome) => {
            print!("{}", console::render(&outcome, cli.verbosity()));
            ExitCode::from(outcome.exit_code())
        }
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(EXIT_ERROR)
        }
    }
}
