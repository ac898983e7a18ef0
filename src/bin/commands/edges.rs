// bin/commands/edges.rs

use crate::commands::{bin_spec, run_binning, CommonArgs};
use clap::Args;
use multibin::{BinningError, EdgeBinner, Inclusivity};

#[derive(Args)]
pub struct EdgesArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Comma-separated, strictly increasing bin edges. Give once to share the bins
    /// across all channels, or once per channel.
    #[arg(long, value_name = "0,1,2,5", required = true)]
    pub edges: Vec<String>,

    /// Which side of each bin interval is closed.
    #[arg(long, value_enum, default_value_t = Inclusivity::Right)]
    pub inclusive: Inclusivity,
}

pub fn parse_edges(s: &str) -> Result<Vec<f64>, BinningError> {
    s.split(',')
        .map(|edge| edge.trim().parse::<f64>().map_err(BinningError::from))
        .collect()
}

pub fn run(args: EdgesArgs, verbose: bool) -> Result<(), BinningError> {
    let specs = args
        .edges
        .iter()
        .map(|s| parse_edges(s))
        .collect::<Result<Vec<_>, _>>()?;
    let inclusivity = args.inclusive;

    run_binning::<EdgeBinner, _>(
        &args.common,
        None,
        bin_spec(specs),
        verbose,
        |binner, batch| binner.bin(&batch.channels, inclusivity),
    )
}
