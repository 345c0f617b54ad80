// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! `hensel` command-line tool.
//!
//! Results go to stdout; diagnostics go through `tracing` to stderr so
//! command output stays pipeable.
#![allow(clippy::print_stdout)]

pub mod cli;
mod commands;
mod files;
mod logging;

use anyhow::Result;
use clap::Parser;

pub use cli::{Cli, Commands};

/// Parses `std::env::args`, sets up logging, and runs the chosen command.
pub fn entrypoint() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    commands::run(cli)
}
