//! Tariff Service entry point.
//!
//! Usage: `tariff-service [--metrics] <amount>...`
//!
//! Prints one JSON quote per amount and active tariff. With `--metrics` the
//! Prometheus text dump follows on stderr.

use service_core::observability::init_tracing;
use tariff_service::cli::{write_quotes, CliArgs, USAGE};
use tariff_service::config::TariffConfig;
use tariff_service::services::{get_metrics, init_metrics};
use tariff_service::startup::Application;

fn main() -> std::io::Result<()> {
    // Load configuration
    let config = TariffConfig::from_env().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        std::io::Error::other(format!("Configuration error: {}", e))
    })?;

    init_tracing(
        &config.service_name,
        &config.common.log_level,
        config.common.log_format,
    );

    tracing::info!(
        version = %config.service_version,
        fixed_fee_mode = config.fees.fixed_fee_mode.as_str(),
        "Starting tariff-service"
    );

    let args = CliArgs::parse(std::env::args().skip(1)).inspect_err(|_| {
        eprintln!("{}", USAGE);
    })?;

    if args.print_metrics {
        init_metrics();
    }

    let app = Application::build(config).map_err(|e| {
        tracing::error!(error = %e, "Failed to build application");
        std::io::Error::other(format!("Application build error: {}", e))
    })?;

    let lines = write_quotes(&app, &args.amounts, &mut std::io::stdout().lock())?;

    tracing::info!(quotes = lines, "Quotes complete");

    if args.print_metrics {
        eprint!("{}", get_metrics());
    }

    Ok(())
}
