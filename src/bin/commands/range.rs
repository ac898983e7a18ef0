// bin/commands/range.rs

use crate::commands::{bin_spec, run_binning, CommonArgs};
use clap::Args;
use multibin::{BinningError, RangeBinner, RangeSpec};

#[derive(Args)]
pub struct RangeArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Uniform bins as MIN:MAX:BINS. Give once to share the bins across all channels,
    /// or once per channel.
    #[arg(long, value_name = "0:100:50", required = true)]
    pub range: Vec<RangeSpec>,

    /// 0-based input column holding a per-event weight applied to every channel.
    #[arg(long, value_name = "IDX")]
    pub weight_column: Option<usize>,
}

pub fn run(args: RangeArgs, verbose: bool) -> Result<(), BinningError> {
    run_binning::<RangeBinner, _>(
        &args.common,
        args.weight_column,
        bin_spec(args.range.clone()),
        verbose,
        |binner, batch| binner.bin(&batch.channels, batch.weights.as_deref()),
    )
}
