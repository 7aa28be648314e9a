use clap::Parser;
use contree_core::rng::Xoshiro256PlusPlus;
use contree_datagen::{
    generate_bidding_batch, generate_gameplay_batch, write_bidding_partition,
    write_gameplay_partition, BiddingColumns, BiddingConfig, GameplayColumns, GameplayConfig,
};
use contree_solver::SolverConfig;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Parser)]
#[command(name = "contree")]
#[command(about = "Generate solver-labeled contrée datasets", long_about = None)]
struct Args {
    /// Number of bidding samples to produce
    #[arg(long = "bidding-samples", default_value = "0")]
    bidding_samples: usize,

    /// Number of gameplay samples to produce
    #[arg(long = "gameplay-samples", default_value = "0")]
    gameplay_samples: usize,

    /// Output directory for bidding partitions
    #[arg(long = "bidding-output", default_value = "bidding")]
    bidding_output: PathBuf,

    /// Output directory for gameplay partitions
    #[arg(long = "gameplay-output", default_value = "gameplay")]
    gameplay_output: PathBuf,

    /// Perfect-information Monte-Carlo worlds per bidding sample
    #[arg(long = "pimc", default_value = "1")]
    pimc: u32,

    /// log2 of transposition-table entries per worker
    #[arg(long = "tt-log2", default_value = "22")]
    tt_log2: u32,

    /// Samples per generation batch (one partition file each)
    #[arg(long = "batch-size", default_value = "1024")]
    batch_size: usize,

    /// Worker threads (0 = all cores)
    #[arg(long = "threads", default_value = "0")]
    threads: usize,

    /// Random seed (defaults to current time)
    #[arg(long = "seed")]
    seed: Option<u64>,
}

fn validate(args: &Args) -> Result<(), String> {
    if args.pimc == 0 {
        return Err("--pimc must be at least 1".into());
    }
    if !(10..=30).contains(&args.tt_log2) {
        return Err("--tt-log2 must be between 10 and 30".into());
    }
    if args.batch_size == 0 {
        return Err("--batch-size must be positive".into());
    }
    if args.bidding_samples == 0 && args.gameplay_samples == 0 {
        return Err("nothing to do: set --bidding-samples or --gameplay-samples".into());
    }
    Ok(())
}

fn progress_bar(total: u64, label: &str) -> ProgressBar {
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::with_template("{msg} [{bar:40}] {pos}/{len} ({per_sec})")
            .expect("static template"),
    );
    pb.set_message(label.to_string());
    pb
}

fn main() {
    let args = Args::parse();

    if let Err(message) = validate(&args) {
        eprintln!("invalid configuration: {}", message);
        std::process::exit(2);
    }

    // Use provided seed or default to current time (microsecond resolution)
    let seed = args.seed.unwrap_or_else(|| {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("Time went backwards")
            .as_micros() as u64
    });

    if args.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(args.threads)
            .build_global()
            .ok(); // Ignore error if pool already initialized
    }

    let solver_config = SolverConfig {
        tt_log2: args.tt_log2,
        ..SolverConfig::default()
    };
    let mut seeder = Xoshiro256PlusPlus::seed_from_u64(seed);

    if args.bidding_samples > 0 {
        let config = BiddingConfig {
            pimc_n: args.pimc,
            biased: true,
        };
        let pb = progress_bar(args.bidding_samples as u64, "bidding");

        let mut produced = 0;
        let mut partition = 0;
        while produced < args.bidding_samples {
            let want = args.batch_size.min(args.bidding_samples - produced);
            let seeds: Vec<u64> = (0..want).map(|_| seeder.next_u64()).collect();

            let samples = match generate_bidding_batch(&seeds, &config, &solver_config) {
                Ok(samples) => samples,
                Err(err) => {
                    eprintln!("bidding generation failed: {}", err);
                    std::process::exit(1);
                }
            };
            let columns: BiddingColumns = samples.into_iter().collect();
            if let Err(err) = write_bidding_partition(&args.bidding_output, partition, &columns) {
                eprintln!("failed to write bidding partition {}: {}", partition, err);
                std::process::exit(1);
            }

            produced += columns.len();
            partition += 1;
            pb.inc(columns.len() as u64);
        }
        pb.finish_and_clear();
        eprintln!(
            "Produced {} bidding samples in {} partitions under {}",
            produced,
            partition,
            args.bidding_output.display()
        );
    }

    if args.gameplay_samples > 0 {
        let config = GameplayConfig::default();
        let pb = progress_bar(args.gameplay_samples as u64, "gameplay");

        let mut produced = 0;
        let mut requested = 0u64;
        let mut partition = 0;
        while produced < args.gameplay_samples {
            let want = args.batch_size.min(args.gameplay_samples - produced);
            let seeds: Vec<u64> = (0..want).map(|_| seeder.next_u64()).collect();
            requested += seeds.len() as u64;

            let samples = match generate_gameplay_batch(&seeds, &config, &solver_config) {
                Ok(samples) => samples,
                Err(err) => {
                    eprintln!("gameplay generation failed: {}", err);
                    std::process::exit(1);
                }
            };
            // The critical-position filter may have dropped some seeds
            if samples.is_empty() {
                continue;
            }
            let over = (produced + samples.len()).saturating_sub(args.gameplay_samples);
            let keep = samples.len() - over;
            let columns: GameplayColumns = samples.into_iter().take(keep).collect();

            if let Err(err) = write_gameplay_partition(&args.gameplay_output, partition, &columns)
            {
                eprintln!("failed to write gameplay partition {}: {}", partition, err);
                std::process::exit(1);
            }

            produced += columns.len();
            partition += 1;
            pb.inc(columns.len() as u64);
        }
        pb.finish_and_clear();
        eprintln!(
            "Produced {} gameplay samples from {} synthesized states in {} partitions under {}",
            produced,
            requested,
            partition,
            args.gameplay_output.display()
        );
    }
}
