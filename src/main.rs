use clap::Parser;
use community_bench::dataset::{DEFAULT_DATA_DIR, DEFAULT_FOOTBALL_URL};
use community_bench::*;
use log::info;
use std::io;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(about = "Benchmarks Louvain community detection on classic datasets", long_about = None)]
struct Args {
    /// Dataset number (1-4); prompts on stdin when omitted.
    #[arg(short, long)]
    choice: Option<String>,

    #[arg(short, long, default_value = DEFAULT_DATA_DIR)]
    data_dir: PathBuf,

    #[arg(short, long, default_value_t = 3)]
    trials: usize,

    #[arg(short, long, default_value_t = 123)]
    seed: u64,

    #[arg(short, long, default_value_t = 1.0)]
    resolution: f64,

    #[arg(long, default_value = DEFAULT_FOOTBALL_URL)]
    football_url: String,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();
    info!("Args: {:?}", args);

    // 1. Configure sources and the benchmark
    let datasets = DatasetConfig {
        data_dir: args.data_dir,
        football_url: args.football_url,
        ..DatasetConfig::default()
    };
    let trials = TrialConfig {
        trial_count: args.trials,
        resolution: args.resolution,
        seed: args.seed,
    };

    // 2. Menu, load and benchmark
    let stdin = io::stdin();
    let stdout = io::stdout();
    let outcome = run_session(
        &mut stdin.lock(),
        &mut stdout.lock(),
        args.choice.as_deref(),
        &datasets,
        &trials,
    )?;

    // 3. Every outcome exits 0
    info!("session finished: {:?}", outcome);
    Ok(())
}
