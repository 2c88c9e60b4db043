use std::path::PathBuf;

use genetris_training::config::TrainingConfig;

use crate::util;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct DefaultConfigArg {
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &DefaultConfigArg) -> anyhow::Result<()> {
    let DefaultConfigArg { output } = arg;
    util::save_json(&TrainingConfig::default(), output.as_deref())
}
