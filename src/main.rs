//! s3scout - Concurrent S3 Bucket Discovery Scanner
//!
//! Entry point for the CLI application.

use anyhow::{Context, Result};
use clap::Parser;
use s3scout::config::{CliArgs, ScanConfig};
use s3scout::probe::S3ProbeFactory;
use s3scout::report::{print_header, print_summary};
use s3scout::scanner::ScanCoordinator;
use std::process::ExitCode;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    // Parse CLI arguments
    let args = CliArgs::parse();

    // Setup logging
    setup_logging(args.verbose)?;

    // Validate and create config
    let config = ScanConfig::from_args(args).context("Invalid configuration")?;

    print_header(&config.profile, &config.region, config.worker_count);

    // Create tokio runtime
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to create async runtime")?;

    runtime.block_on(run_scan(config))
}

async fn run_scan(config: ScanConfig) -> Result<()> {
    // Shared AWS configuration; each worker gets its own client from the factory
    let factory = Arc::new(S3ProbeFactory::load(&config.profile, &config.region).await);

    let coordinator = ScanCoordinator::new(config.clone(), factory);

    // Setup signal handler for graceful shutdown
    let shutdown_flag = coordinator.shutdown_flag();
    ctrlc::set_handler(move || {
        eprintln!("\nInterrupt received, shutting down...");
        shutdown_flag.store(true, Ordering::SeqCst);
    })
    .context("Failed to set signal handler")?;

    // Run the scan
    let summary = coordinator.run().await.context("Scan failed")?;

    print_summary(&summary, config.output_path.as_deref());

    match &config.output_path {
        Some(path) => info!(path = %path.display(), "Scan complete, results saved"),
        None => info!("Scan complete"),
    }

    Ok(())
}

fn setup_logging(verbose: bool) -> Result<()> {
    let filter = if verbose {
        EnvFilter::new("s3scout=debug,warn")
    } else {
        EnvFilter::new("s3scout=info,warn")
    };

    // Keep the AWS SDK's internal diagnostics out of scan output
    let filter = filter
        .add_directive("aws_config=error".parse()?)
        .add_directive("aws_smithy_runtime=error".parse()?)
        .add_directive("aws_sdk_s3=error".parse()?)
        .add_directive("hyper=error".parse()?);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();

    Ok(())
}
