//! ABI L2 inspection tool.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use abi_inspect::{inspect, InspectOptions};
use abi_l2_reader::ReaderConfig;

#[derive(Parser, Debug)]
#[command(name = "abi-inspect")]
#[command(about = "Decode a GOES ABI L2 variable and print its area definition")]
struct Args {
    /// NetCDF file or JSON/YAML dataset manifest
    file: PathBuf,

    /// Variable to decode (e.g. HT, RSR, ACHA)
    #[arg(short, long)]
    variable: Option<String>,

    /// Platform shortname when the filename does not carry one
    #[arg(long, env = "ABI_PLATFORM", default_value = "G16")]
    platform: String,

    /// Scan mode when the filename does not carry one
    #[arg(long, default_value = "M3")]
    scan_mode: String,

    /// Reader configuration file (YAML); environment variables otherwise
    #[arg(short, long, env = "ABI_CONFIG")]
    config: Option<PathBuf>,

    /// Log level
    #[arg(long, env = "LOG_LEVEL", default_value = "warn")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,
}

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };

    // Logs go to stderr so stdout stays valid JSON
    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr);
    if args.json_logs {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }

    #[cfg(feature = "netcdf")]
    abi_l2_reader::silence_hdf5_errors();

    let config = match &args.config {
        Some(path) => ReaderConfig::from_yaml_file(path)?,
        None => {
            let config = ReaderConfig::from_env();
            config.validate()?;
            config
        }
    };
    info!(config = ?config, "Loaded reader configuration");

    let options = InspectOptions {
        path: args.file,
        variable: args.variable,
        platform: args.platform,
        scan_mode: args.scan_mode,
        config,
    };

    let summary = inspect(&options)?;
    println!("{}", serde_json::to_string_pretty(&summary)?);

    Ok(())
}
