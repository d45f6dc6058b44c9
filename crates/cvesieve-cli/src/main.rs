//! cvesieve - CVE-list exporter
//!
//! Downloads the NVD yearly JSON feeds, extracts the products matching the
//! configured target fragments, and writes one CSV row per
//! (CVE, affected product) pair.

use anyhow::Result;
use clap::Parser;
use cvesieve_common::{Config, LogConfig, LogFormat};
use tracing::info;

mod run;

/// cvesieve CVE-list exporter
#[derive(Parser, Debug)]
#[command(name = "cvesieve")]
#[command(version)]
#[command(about = "Export per-product CVE rows from the NVD yearly feeds", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "/etc/cvesieve/cvesieve.toml")]
    config: String,

    /// Output CSV path (overrides config)
    #[arg(short, long)]
    output: Option<String>,

    /// Comma-separated target product fragments (overrides config)
    #[arg(short, long)]
    targets: Option<String>,

    /// First feed year to process (overrides config)
    #[arg(long)]
    from_year: Option<u16>,

    /// Last feed year to process (overrides config; defaults to the current year)
    #[arg(long)]
    to_year: Option<u16>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Log format (pretty, json, compact)
    #[arg(long, default_value = "pretty")]
    log_format: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let log_config = LogConfig::new()
        .level(&args.log_level)
        .format(LogFormat::from_name(&args.log_format));
    cvesieve_common::init_logging_with_config(log_config);

    info!("cvesieve starting...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = if std::path::Path::new(&args.config).exists() {
        Config::from_file(&args.config)?
    } else {
        info!("Config file not found, using defaults");
        Config::default()
    };

    let mut config = config.merge_env();

    // CLI overrides
    if let Some(output) = args.output {
        config.export.output_path = output;
    }
    if let Some(targets) = args.targets {
        config.export.target_products = targets
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
    }
    if let Some(year) = args.from_year {
        config.export.start_year = year;
    }
    if let Some(year) = args.to_year {
        config.export.end_year = Some(year);
    }

    info!("Target products: {}", config.export.target_products.join(", "));
    info!("Output file: {}", config.export.output_path);

    let stats = run::run(&config).await?;

    info!(
        "Done. Total: {} rows exported to {}",
        stats.rows_written, config.export.output_path
    );
    Ok(())
}
