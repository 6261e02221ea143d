// SPDX-License-Identifier: Apache-2.0

//! thaterror CLI
//!
//! Entry point for the `thaterror` binary: parses arguments, loads the
//! optional `thaterror.toml`, installs logging and runs the subcommand.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

use std::process::ExitCode;

use clap::Parser;
use thaterror_cli::{run, Cli};
use tracing::error;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match cli.load_config() {
        Ok(config) => config,
        Err(e) => {
            logging::init(cli.verbose, "info");
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };
    logging::init(cli.verbose, &config.logging.level);

    match run(&cli, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
