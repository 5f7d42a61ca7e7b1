use std::path::PathBuf;

use crate::util;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct StagesArg {
    /// Stage table JSON file to validate and print instead of the built-in one
    #[arg(long)]
    stages: Option<PathBuf>,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &StagesArg) -> anyhow::Result<()> {
    let StagesArg { stages, output } = arg;
    let table = util::load_stage_table(stages.as_deref())?;
    util::write_json(&table, output.as_deref())
}
