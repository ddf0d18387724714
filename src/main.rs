//! Greenway storefront CLI

use std::{error::Error, process::ExitCode};

use clap::Parser;

mod cli;

#[expect(
    clippy::print_stderr,
    reason = "failures are reported to the terminal before exiting"
)]
fn main() -> ExitCode {
    _ = dotenvy::dotenv();

    let cli = cli::Cli::parse();

    match cli.run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error}");

            let mut source = error.source();

            while let Some(cause) = source {
                eprintln!("  caused by: {cause}");
                source = cause.source();
            }

            ExitCode::FAILURE
        }
    }
}
