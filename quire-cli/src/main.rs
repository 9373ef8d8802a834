use std::process;

use clap::Parser;

mod cli;
mod session;

use cli::Cli;

const EXIT_SUCCESS: i32 = 0;
const EXIT_ERROR: i32 = 1;
/// The document couldn't be loaded and the view redirected to not-found.
const EXIT_NOT_FOUND: i32 = 2;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    configure_logging(cli.verbose, cli.debug, cli.quiet);

    let code = match session::run(cli).await {
        Ok(report) => {
            match serde_json::to_string_pretty(&report) {
                Ok(json) => println!("{json}"),
                Err(e) => {
                    eprintln!("Error: {e}");
                    process::exit(EXIT_ERROR);
                }
            }
            if report.is_errored() {
                EXIT_NOT_FOUND
            } else {
                EXIT_SUCCESS
            }
        }
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("Error: {e:#}");
            EXIT_ERROR
        }
    };
    process::exit(code);
}

fn configure_logging(verbose: bool, debug: bool, quiet: bool) {
    use tracing::Level;
    use tracing_subscriber::{fmt, prelude::*, registry, EnvFilter};

    let log_level = if quiet {
        Level::ERROR
    } else if debug {
        Level::DEBUG
    } else if verbose {
        Level::TRACE
    } else {
        Level::WARN
    };

    registry()
        .with(EnvFilter::new(format!("hyper=warn,reqwest=warn,{log_level}")))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}
