// bin/commands/random.rs

use clap::Args;
use multibin::error::BinningError;
use multibin::io::OutputStream;
use rand::{Rng, SeedableRng};
use std::fmt::Write as _;
use std::io::Write;
use std::path::PathBuf;

#[derive(Args)]
pub struct RandomArgs {
    /// Output file path (.tsv or .tsv.gz)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Number of channels (columns)
    #[arg(short, long, default_value = "4")]
    pub channels: usize,

    /// Number of events (rows) to generate
    #[arg(short = 'n', long, default_value = "1000000")]
    pub num_events: usize,

    /// Optional seed for random number generation
    #[arg(short, long)]
    pub seed: Option<u64>,
}

pub fn run(args: RandomArgs) -> Result<(), BinningError> {
    eprintln!(
        "Generating {} random events over {} channels to {}",
        args.num_events,
        args.channels,
        args.output
            .as_ref()
            .map_or("<stdout>".to_string(), |v| v.to_string_lossy().to_string())
    );

    let output = OutputStream::new(args.output);
    let mut output_writer = output.writer()?;

    let mut rng = match args.seed {
        Some(s) => rand::rngs::StdRng::seed_from_u64(s),
        None => rand::rngs::StdRng::from_entropy(),
    };

    let mut line_buffer = String::new();
    for _ in 0..args.num_events {
        line_buffer.clear();
        for channel in 0..args.channels {
            if channel > 0 {
                line_buffer.push('\t');
            }
            // Channel c is centered on 10 * c with unit spread.
            let value = 10.0 * channel as f64 + approx_normal(&mut rng);
            write!(line_buffer, "{:.6}", value).map_err(|e| e.to_string())?;
        }
        writeln!(output_writer, "{}", line_buffer)?;
    }
    output_writer.flush()?;

    eprintln!("Done!");
    Ok(())
}

/// Irwin-Hall approximation of a standard normal draw.
fn approx_normal<R: Rng>(rng: &mut R) -> f64 {
    (0..12).map(|_| rng.gen::<f64>()).sum::<f64>() - 6.0
}
