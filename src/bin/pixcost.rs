use clap::{Parser, ValueEnum};
use env_logger::Env;
use log::LevelFilter;
use pixcost::estimation::{estimate, EstimatorConfig, Scheme};
use pixcost::grid::open_grid;
use std::path::PathBuf;
use std::process;

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum SchemeArg {
    /// Exact matches in a history window.
    OffsetOnly,
    /// Exact or near matches in a history window.
    OffsetOrDiff,
    /// Blocks of small differences from a literal anchor.
    DiffBlock,
    /// Moving-average prediction with runs.
    MovingAvg,
    /// Every scheme, one after the other.
    All,
}

#[derive(Parser, Debug)]
#[command(about = "Estimates the compression ratio of lossless pixel-prediction schemes", long_about = None)]
#[command(version)]
struct Args {
    /// The input image. Only the RGB channels are used.
    input: PathBuf,

    /// The scheme to estimate.
    #[arg(short, long, value_enum, default_value_t = SchemeArg::MovingAvg)]
    scheme: SchemeArg,

    /// log2 of the history window (offset schemes). Defaults to 2 for
    /// offset-only and 3 for offset-or-diff.
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(0..=16))]
    lookback_bits: Option<u32>,

    /// log2 of the largest coded difference. Defaults to 4 for diff-block
    /// and 3 for moving-avg.
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(0..=8))]
    diff_bits: Option<u32>,

    /// log2 of the run window (moving-avg). Defaults to 0.
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(0..=16))]
    rle_bits: Option<u32>,

    /// Print every counter behind the ratios.
    #[arg(long)]
    details: bool,

    /// Enable debug logging.
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    /// Returns the selected schemes with the command line overrides applied.
    fn schemes(&self) -> Vec<Scheme> {
        let selected = match self.scheme {
            SchemeArg::OffsetOnly => vec![Scheme::offset_only()],
            SchemeArg::OffsetOrDiff => vec![Scheme::offset_or_diff()],
            SchemeArg::DiffBlock => vec![Scheme::diff_block()],
            SchemeArg::MovingAvg => vec![Scheme::moving_average()],
            SchemeArg::All => Scheme::all().to_vec(),
        };

        selected
            .into_iter()
            .map(|scheme| match scheme {
                Scheme::OffsetOnly { lookback_bits } => Scheme::OffsetOnly {
                    lookback_bits: self.lookback_bits.unwrap_or(lookback_bits),
                },
                Scheme::OffsetOrDiff { lookback_bits } => Scheme::OffsetOrDiff {
                    lookback_bits: self.lookback_bits.unwrap_or(lookback_bits),
                },
                Scheme::DiffBlock { diff_bits } => Scheme::DiffBlock {
                    diff_bits: self.diff_bits.unwrap_or(diff_bits),
                },
                Scheme::MovingAverage {
                    diff_bits,
                    rle_bits,
                } => Scheme::MovingAverage {
                    diff_bits: self.diff_bits.unwrap_or(diff_bits),
                    rle_bits: self.rle_bits.unwrap_or(rle_bits),
                },
            })
            .collect()
    }
}

fn main() {
    let args = Args::parse();

    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or("warn"));
    if args.verbose {
        builder.filter_level(LevelFilter::Debug);
    }
    builder.init();

    let grid = match open_grid(&args.input) {
        Ok(g) => g,
        Err(e) => {
            eprintln!("Cannot read image: {}", e);
            process::exit(1)
        }
    };

    let config = EstimatorConfig::default();
    for scheme in args.schemes() {
        let report = estimate(&grid, scheme, config);
        println!("{}", report);
        if args.details {
            print!("{}", report.details());
        }
    }
}
