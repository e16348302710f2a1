use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use h_good_search::config::Config;
use h_good_search::conflict::CachedMatrix;
use h_good_search::ip::formulate::{Mode, DEFAULT_POOL_SIZE};
use h_good_search::ip::BranchAndBound;
use h_good_search::pattern::PatternFamily;
use h_good_search::{pipeline, storage};

#[derive(Parser, Debug)]
#[clap(
    name = "h-good-search",
    about = "Largest families of graphs whose pairwise symmetric differences avoid a forbidden pattern family"
)]
struct Cli {
    /// Number of vertices of the candidate graphs
    #[clap(long, short = 'n', default_value = "5")]
    vertices: usize,

    /// Forbidden pattern as an edge bitstring (repeatable), e.g. 111 for a triangle
    #[clap(long = "pattern")]
    patterns: Vec<String>,

    /// Forbid K_k when no --pattern is given
    #[clap(long, default_value = "3")]
    pattern_vertices: usize,

    /// Optimum to compute over the conflict graph
    #[clap(long, value_enum, default_value = "independent-set")]
    mode: Mode,

    /// Alternate optimal solutions to keep in max-clique mode
    #[clap(long, default_value_t = DEFAULT_POOL_SIZE)]
    pool_size: usize,

    /// Load the conflict matrix from this file if it exists, otherwise write it there
    #[clap(long)]
    matrix_cache: Option<PathBuf>,

    /// Output directory for results
    #[clap(long, default_value = "h_good_results")]
    output_dir: PathBuf,

    /// Give up after this many solver search nodes
    #[clap(long)]
    node_limit: Option<u64>,

    /// Give up after this many seconds in the solver
    #[clap(long)]
    time_limit_secs: Option<u64>,

    /// Build the conflict matrix on a single thread
    #[clap(long)]
    sequential: bool,

    /// Number of worker threads (0 = use all available cores)
    #[clap(long, default_value = "0")]
    threads: usize,

    /// Verbose logging
    #[clap(long, short)]
    verbose: bool,
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Cli::parse();

    // Configure logging
    let log_level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp_millis()
        .init();

    // Set number of threads
    let num_threads = if args.threads > 0 {
        args.threads
    } else {
        num_cpus::get()
    };

    log::info!("Using {} worker threads", num_threads);
    rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build_global()?;

    let family = if args.patterns.is_empty() {
        PatternFamily::complete(args.pattern_vertices)?
    } else {
        PatternFamily::parse(&args.patterns)?
    };

    let config = Config {
        node_limit: args.node_limit,
        time_limit: args.time_limit_secs.map(Duration::from_secs),
        ..Config::new(args.vertices, args.mode, args.pool_size, !args.sequential)
    };

    log::info!("Starting H-good search on {} vertices", config.vertices);
    log::info!("Forbidden patterns: {:?}", family.to_strings());
    log::info!("Mode: {:?}", config.mode);

    let cached = match &args.matrix_cache {
        Some(path) if path.exists() => Some(storage::load_matrix(path)?),
        _ => None,
    };
    let was_cached = cached.is_some();

    let mut oracle = BranchAndBound::new()
        .with_node_limit(config.node_limit)
        .with_time_limit(config.time_limit);

    let (matrix, report) = pipeline::run(&config, &family, cached, &mut oracle)?;
    log::info!("Solver explored {} nodes", oracle.nodes_explored());

    if let (Some(path), false) = (&args.matrix_cache, was_cached) {
        storage::save_matrix(&CachedMatrix::new(matrix, report.vertices, &family), path)?;
    }

    let summary = storage::save_report(&report, &args.output_dir)?;
    log::info!("Optimum: {}", report.optimum);
    log::info!("Results saved to {}", summary.display());

    Ok(())
}
