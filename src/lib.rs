//! Core library entry for the `tickit` CLI.
//!
//! A client for a remote to-do service. The [`controller`] keeps a local task
//! list in step with the server and flips completion flags optimistically.

pub mod adapters;
pub mod cassette;
pub mod cli;
pub mod collection;
pub mod commands;
pub mod config;
pub mod context;
pub mod controller;
pub mod poll;
pub mod ports;
pub mod render;
pub mod task;
pub mod transfer;

#[cfg(test)]
pub(crate) mod testing;

use clap::error::ErrorKind;
use clap::Parser;

/// Run the CLI with the provided arguments.
///
/// `--help` and `--version` print their text and succeed.
///
/// # Errors
///
/// Returns an error string when argument parsing fails or command execution fails.
pub async fn run<I, T>(args: I) -> Result<(), String>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = match cli::Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            print!("{err}");
            return Ok(());
        }
        Err(err) => return Err(err.to_string()),
    };
    commands::dispatch(&cli).await
}
