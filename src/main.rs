//! # Structure Builder CLI
//!
//! This is the binary entry point for the `structure-builder` command-line tool.
//!
//! Its primary responsibilities are:
//! - Parsing command-line arguments using `clap`.
//! - Setting up logging from `--log-level` and `RUST_LOG`.
//! - Executing the selected command and reporting its error.
//!
//! Graph construction lives in the library crate; the binary only loads
//! inputs, runs a build against the in-memory plan dispatcher and prints it.

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli.execute()
}
