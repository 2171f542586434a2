use anyhow::{Context, anyhow};
use clap::{Parser, Subcommand};
use lanewise::{
    add, add_scalars, broadcast,
    fs::Operands,
    load,
    numerics::{AlignedBlock, Isa, SIMD_LANECOUNT, add_slices, add_slices_with_stats},
    statistics::Stats,
    store,
};
use rand::{SeedableRng, rngs::StdRng};
use rand_distr::{Distribution, Normal};
use serde::Serialize;
use std::{hint::black_box, path::PathBuf, process::ExitCode, time::Instant};
use tqdm::tqdm;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Lane-wise f32 arithmetic on 16-lane vectors
#[derive(Parser, Debug)]
#[command(name = "lanewise")]
#[command(about = "Lane-wise f32x16 arithmetic backed by AVX-512", long_about = None)]
struct Args {
    /// Log filter used when RUST_LOG is not set (e.g. "debug", "lanewise=trace")
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Skip AVX-512 detection and run the portable backend
    #[arg(long, global = true)]
    force_scalar: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Add the ramps 0..15 and 15..0 and print the result lanes
    Demo,

    /// Add two 32-bit integers with wraparound
    Scalar {
        #[arg(allow_hyphen_values = true)]
        a: i32,
        #[arg(allow_hyphen_values = true)]
        b: i32,
    },

    /// Add two 1-D f32 arrays stored as .npy files
    Add {
        /// Path to the left operand (numpy format)
        #[arg(short, long)]
        left: PathBuf,

        /// Path to the right operand (numpy format)
        #[arg(short, long)]
        right: PathBuf,
    },

    /// Time repeated slice additions on random data
    Bench {
        /// Number of f32 values per operand
        #[arg(long, default_value_t = 1 << 20)]
        len: usize,

        /// How many times the whole slices are added
        #[arg(long, default_value_t = 100)]
        iterations: usize,

        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
}

#[derive(Serialize)]
struct AddReport {
    backend: Isa,
    len: usize,
    sum: Vec<f32>,
}

#[derive(Serialize)]
struct BenchReport {
    backend: Isa,
    len: usize,
    iterations: usize,
    seconds: f64,
    elements_per_second: f64,
    checksum: f64,
    stats: Stats,
}

fn run_demo() {
    let x: [f32; SIMD_LANECOUNT] = std::array::from_fn(|i| i as f32);
    let y: [f32; SIMD_LANECOUNT] = std::array::from_fn(|i| (SIMD_LANECOUNT - 1 - i) as f32);

    let mut result = AlignedBlock::zeroed();
    store(&mut result, add(load(&x), load(&y)));
    println!("x + y = {:?}", result.data);

    let mut splatted = AlignedBlock::zeroed();
    store(&mut splatted, broadcast(1.5));
    println!("broadcast(1.5) = {:?}", splatted.data);
}

fn run_add(left: PathBuf, right: PathBuf, backend: Isa) -> anyhow::Result<()> {
    let left_values = Vec::<f32>::load_from_npy(&left)
        .with_context(|| format!("loading left operand {}", left.display()))?;
    let right_values = Vec::<f32>::load_from_npy(&right)
        .with_context(|| format!("loading right operand {}", right.display()))?;

    let sum = add_slices(&left_values, &right_values)?;
    info!(len = sum.len(), "added operands");

    let report = AddReport {
        backend,
        len: sum.len(),
        sum,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn run_bench(len: usize, iterations: usize, seed: u64, backend: Isa) -> anyhow::Result<()> {
    let mut rng = StdRng::seed_from_u64(seed);
    let normal = Normal::new(0.0f32, 1.0).map_err(|e| anyhow!("bad distribution: {e}"))?;
    let left: Vec<f32> = (0..len).map(|_| normal.sample(&mut rng)).collect();
    let right: Vec<f32> = (0..len).map(|_| normal.sample(&mut rng)).collect();
    let mut out = vec![0.0; len];

    info!(len, iterations, backend = backend.name(), "starting benchmark");

    let mut stats = Stats::new();
    let start_time = Instant::now();
    for _ in tqdm(0..iterations) {
        add_slices_with_stats(black_box(&left), black_box(&right), &mut out, &mut stats)?;
    }
    let elapsed = start_time.elapsed();
    stats.dump();

    let seconds = elapsed.as_secs_f64();
    let report = BenchReport {
        backend,
        len,
        iterations,
        seconds,
        elements_per_second: (len * iterations) as f64 / seconds,
        checksum: out.iter().map(|&v| v as f64).sum(),
        stats,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn run(args: Args) -> anyhow::Result<()> {
    let backend = Isa::init(args.force_scalar);
    info!(backend = backend.name(), "lane backend ready");

    match args.command {
        Command::Demo => run_demo(),
        Command::Scalar { a, b } => println!("{}", add_scalars(a, b)),
        Command::Add { left, right } => run_add(left, right, backend)?,
        Command::Bench {
            len,
            iterations,
            seed,
        } => run_bench(len, iterations, seed, backend)?,
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}
