use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod streams;
pub mod validate;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate record messages against a configured catalog.
    Validate(ValidateArgs),
    /// List the streams a configured catalog declares.
    Streams(StreamsArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Validate(args) => validate::run(args, format),
        Command::Streams(args) => streams::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Configured catalog (JSON).
    #[arg(env = "STREAMCHECK_CATALOG")]
    pub catalog: PathBuf,
    /// Newline-delimited record messages. Reads stdin when omitted or `-`.
    pub records: Option<PathBuf>,
    /// Reject properties the stream schema does not declare.
    #[arg(long)]
    pub strict: bool,
    /// Stop at the first nonconforming record.
    #[arg(long)]
    pub fail_fast: bool,
}

#[derive(Args, Debug)]
pub struct StreamsArgs {
    /// Configured catalog (JSON).
    #[arg(env = "STREAMCHECK_CATALOG")]
    pub catalog: PathBuf,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}
