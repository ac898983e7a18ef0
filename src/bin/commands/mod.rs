// bin/commands/mod.rs

pub mod edges;
#[cfg(feature = "dev")]
pub mod random;
pub mod range;

use clap::Args;
use multibin::io::{
    write_channel_table, BatchReaderConfig, ChannelBatch, ChannelBatchReader, OutputStream,
};
use multibin::{BinSpec, BinningError, ChannelBinner, HistogramStats, MultiChannelBinner};
use std::path::PathBuf;
use std::time::Instant;
use flate2::Compression;
use tracing::{debug, info};

/// Arguments shared by the binning subcommands.
#[derive(Args)]
pub struct CommonArgs {
    /// Tab-separated input, one row per event and one column per channel
    /// (optionally gzip-compressed).
    #[arg(value_name = "events.tsv")]
    pub input: PathBuf,

    /// Output file. Written to stdout if not given; gzip-compressed if it ends in .gz.
    #[arg(short, long, value_name = "hist.tsv")]
    pub output: Option<PathBuf>,

    /// Rows read and binned per batch.
    #[arg(long, default_value_t = 10_000, value_parser = clap::value_parser!(u64).range(1..))]
    pub batch_size: u64,

    /// Gzip compression level (0-9), used when the output ends in .gz.
    #[arg(long, default_value_t = 6, value_parser = clap::value_parser!(u32).range(0..=9))]
    pub compression_level: u32,

    /// Print per-channel summary statistics to stderr. With --verbose, a full
    /// report per channel is logged as well.
    #[arg(long)]
    pub summary: bool,
}

impl CommonArgs {
    /// Output file, possibly compressed.
    pub fn output_stream(&self) -> OutputStream {
        OutputStream::builder()
            .filepath(self.output.as_ref())
            .buffer_size(256 * 1024)
            .compression_level(Compression::new(self.compression_level))
            .build()
    }
}

/// One specification is shared by every channel; several are used one per channel.
pub fn bin_spec<S>(mut specs: Vec<S>) -> BinSpec<S> {
    if specs.len() == 1 {
        BinSpec::Shared(specs.remove(0))
    } else {
        BinSpec::PerChannel(specs)
    }
}

/// Stream the input through a multi-channel binner in batches and write the
/// cumulative histograms.
///
/// The channel count is taken from the first row of the input.
pub fn run_binning<B, F>(
    common: &CommonArgs,
    weight_column: Option<usize>,
    spec: BinSpec<B::Spec>,
    verbose: bool,
    mut bin_batch: F,
) -> Result<(), BinningError>
where
    B: ChannelBinner,
    F: FnMut(&mut MultiChannelBinner<B>, &ChannelBatch) -> Result<(), BinningError>,
{
    let start = Instant::now();

    let config = BatchReaderConfig {
        batch_size: common.batch_size as usize,
        weight_column,
        ..Default::default()
    };
    let mut reader = ChannelBatchReader::open(&common.input, config)?;

    let Some(first) = reader.next_batch()? else {
        return Err(format!("{} contains no samples", common.input.display()).into());
    };
    let mut binner =
        MultiChannelBinner::<B>::new(spec, first.channels.len())?.with_verbose(verbose);

    bin_batch(&mut binner, &first)?;
    let mut n_events = first.n_samples();
    let mut n_batches = 1;
    for batch in reader {
        let batch = batch?;
        bin_batch(&mut binner, &batch)?;
        n_events += batch.n_samples();
        n_batches += 1;
    }

    info!(
        channels = binner.n_channels(),
        events = n_events,
        batches = n_batches,
        elapsed = ?start.elapsed(),
        "binned {}",
        common.input.display()
    );

    write_channel_table(common.output_stream().writer()?, &binner.info())?;

    if common.summary {
        for (channel, channel_binner) in binner.iter().enumerate() {
            let label = format!("channel {}", channel);
            let stats = HistogramStats::from_histogram(channel_binner.histogram());
            stats.print_summary(&label);
            debug!("{}", stats.generate_report(&label));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::{Read, Write};

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        common: CommonArgs,
    }

    #[test]
    fn test_compression_level() {
        let cli = TestCli::try_parse_from(["multibin", "events.tsv"]).unwrap();
        assert_eq!(cli.common.compression_level, 6);

        let cli =
            TestCli::try_parse_from(["multibin", "events.tsv", "--compression-level", "9"])
                .unwrap();
        assert_eq!(cli.common.compression_level, 9);

        assert!(
            TestCli::try_parse_from(["multibin", "events.tsv", "--compression-level", "10"])
                .is_err()
        );
    }

    #[test]
    fn test_output_stream() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hist.tsv.gz");
        let cli = TestCli::try_parse_from([
            "multibin",
            "events.tsv",
            "--compression-level",
            "1",
            "-o",
            path.to_str().unwrap(),
        ])
        .unwrap();

        {
            let mut writer = cli.common.output_stream().writer().unwrap();
            writer.write_all(b"channel\tcount\n").unwrap();
            writer.flush().unwrap();
        }

        let mut text = String::new();
        flate2::read::GzDecoder::new(std::fs::File::open(&path).unwrap())
            .read_to_string(&mut text)
            .unwrap();
        assert_eq!(text, "channel\tcount\n");
    }
}
