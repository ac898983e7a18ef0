#[cfg(feature = "cli")]
mod commands;

#[cfg(feature = "cli")]
mod cli {
    use crate::commands::{edges, range};
    #[cfg(feature = "dev")]
    use crate::commands::random;
    use clap::Parser;
    use multibin::error::BinningError;
    use tracing::Level;

    #[derive(Parser)]
    #[command(author, version, about, long_about = None)]
    pub struct Cli {
        /// Log each channel as it is binned, and enable debug logging
        #[arg(short, long, global = true)]
        verbose: bool,

        #[command(subcommand)]
        command: Commands,
    }

    #[derive(clap::Subcommand)]
    enum Commands {
        /// Histogram each channel over explicit bin edges.
        Edges(edges::EdgesArgs),
        /// Histogram each channel over uniform bins in a fixed range.
        Range(range::RangeArgs),
        #[cfg(feature = "dev")]
        /// Generate a random multi-channel table for benchmarking (only with dev feature)
        Random(random::RandomArgs),
    }

    pub fn run() -> Result<(), BinningError> {
        let cli = Cli::parse();

        let level = if cli.verbose {
            Level::DEBUG
        } else {
            Level::INFO
        };
        tracing_subscriber::fmt()
            .with_max_level(level)
            .with_writer(std::io::stderr)
            .init();

        match cli.command {
            Commands::Edges(args) => edges::run(args, cli.verbose),
            Commands::Range(args) => range::run(args, cli.verbose),
            #[cfg(feature = "dev")]
            Commands::Random(args) => random::run(args),
        }
    }
}

fn main() {
    #[cfg(feature = "cli")]
    if let Err(e) = cli::run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    #[cfg(not(feature = "cli"))]
    {
        eprintln!("CLI feature not enabled. Please rebuild with --features cli");
        std::process::exit(1);
    }
}
