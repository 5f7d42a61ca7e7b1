use clap::{Parser, Subcommand};

use self::{run::RunArg, stages::StagesArg};

mod run;
mod stages;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Play a headless game with a random agent and print a JSON summary
    Run(#[clap(flatten)] RunArg),
    /// Print the stage table as JSON
    Stages(#[clap(flatten)] StagesArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::Run(arg) => run::run(&arg)?,
        Mode::Stages(arg) => stages::run(&arg)?,
    }
    Ok(())
}
