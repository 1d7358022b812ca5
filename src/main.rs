use anyhow::Result;
use clap::Parser;

mod cache;
mod cluster;
mod config;
mod data;
mod error;
mod graph;
mod report;
mod spatial;
mod storage;
mod viz;

use config::Config;

#[derive(Parser, Debug)]
#[clap(
    name = "incident-network-analyzer",
    about = "Spatiotemporal hotspot and network analysis of incident records"
)]
struct Cli {
    /// Path to the input incident CSV
    #[clap(long)]
    input: String,

    /// Incident category to analyze
    #[clap(long, default_value = "ROBBERY")]
    crime_type: String,

    /// Output directory for results
    #[clap(long, default_value = "analysis_results")]
    output_dir: String,

    /// Spatial radius for graph edges, in miles
    #[clap(long, default_value = "0.5")]
    spatial_radius_miles: f64,

    /// Temporal window for graph edges, in days
    #[clap(long, default_value = "3")]
    temporal_days: i64,

    /// DBSCAN neighborhood radius, in miles
    #[clap(long, default_value = "0.5")]
    dbscan_eps_miles: f64,

    /// DBSCAN minimum neighborhood size
    #[clap(long, default_value = "5")]
    dbscan_min_samples: usize,

    /// Skip the HTML dashboard
    #[clap(long)]
    skip_viz: bool,

    /// Number of worker threads (0 = use all available cores)
    #[clap(long, default_value = "0")]
    threads: usize,

    /// Verbose logging
    #[clap(long, short)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Cli::parse();

    let log_level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp_millis()
        .init();

    let num_threads = if args.threads > 0 {
        args.threads
    } else {
        num_cpus::get()
    };

    log::info!("Using {} worker threads", num_threads);
    rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build_global()?;

    let cfg = Config::new(
        args.spatial_radius_miles,
        args.temporal_days,
        args.dbscan_eps_miles,
        args.dbscan_min_samples,
    );
    cfg.validate()?;

    log::info!("Starting incident network analysis");
    log::info!("Input: {}", args.input);
    log::info!("Category: {}", args.crime_type);
    log::info!("Output: {}", args.output_dir);

    // 1. Load and clean the incident table
    let incidents = data::csv::load_incidents(&args.input)?;

    // 2. Run the analysis once per (category, config); the cache keeps
    //    the payload shareable for the rest of the process
    let results = cache::ResultCache::new();
    let payload = results.get_or_compute(&args.crime_type, &cfg, || {
        report::build_payload(&incidents, &args.crime_type, &cfg)
    })?;

    log::info!(
        "Analysis complete: {} nodes, {} edges, {} hotspot clusters",
        payload.network.nodes,
        payload.network.edges,
        payload.hotspots.len()
    );

    // 3. Save results
    storage::save_results(&payload, &args.output_dir)?;

    // 4. Render the dashboard if requested
    if !args.skip_viz {
        viz::generate_dashboard(&payload, &args.output_dir)?;
    }

    log::info!("Done. Results saved to {}", args.output_dir);

    Ok(())
}
