use std::path::PathBuf;

use crate::{
    source::{self, SourceArg},
    util::Output,
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct FetchAggregatesArg {
    #[clap(flatten)]
    pub(crate) source: SourceArg,

    /// Output file path (stdout if omitted)
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
}

pub fn run(arg: &FetchAggregatesArg) -> anyhow::Result<()> {
    let FetchAggregatesArg { source, output } = arg;

    let (_description, aggregates) = source::load_aggregates(source)?;
    Output::save_json(&aggregates, output.clone())?;

    Ok(())
}
