use clap::{Parser, Subcommand};

use self::{ingest::IngestArg, prepare::PrepareArg};

mod ingest;
mod prepare;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Normalize a raw survey export into a consented, coded record table
    Ingest(#[clap(flatten)] IngestArg),
    /// Assemble baseline/full feature matrices and a target vector
    Prepare(#[clap(flatten)] PrepareArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::Ingest(arg) => ingest::run(&arg)?,
        Mode::Prepare(arg) => prepare::run(&arg)?,
    }
    Ok(())
}
