//! Command-line entry point for the invoice intake watcher.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use tokio::sync::mpsc;
use tracing::{info, warn};

use invoice_intake::{
    start_up, ConfigLoader, DirectoryScanner, IntakeConfig, IntakeService, IntakeSummary,
    Pipeline,
};

/// Watched-folder intake for PDF invoices
#[derive(Parser)]
#[command(name = "invoice-intake")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to a JSON config file; environment variables override it
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Watch the intake directory until interrupted (default)
    Watch(WatchArgs),

    /// Run the pipeline once on the given files and exit
    Process(ProcessArgs),
}

#[derive(Args, Default)]
struct WatchArgs {
    /// Also process PDFs already in the watch directory at startup
    #[arg(long)]
    scan_existing: bool,
}

#[derive(Args)]
struct ProcessArgs {
    /// Files to process
    #[arg(required = true)]
    files: Vec<PathBuf>,
}

const EVENT_CHANNEL_CAPACITY: usize = 64;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut loader = ConfigLoader::new();
    if let Some(path) = &cli.config {
        loader = loader.with_file(path);
    }
    let config = loader.load().context("Failed to load configuration")?;

    start_up(&config, cli.verbose).context("Failed to start intake")?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    match cli.command.unwrap_or(Commands::Watch(WatchArgs::default())) {
        Commands::Watch(args) => runtime.block_on(watch(config, args)),
        Commands::Process(args) => runtime.block_on(process(config, args)),
    }
}

async fn watch(config: IntakeConfig, args: WatchArgs) -> Result<()> {
    let scanner = DirectoryScanner::from_config(&config)
        .with_initial_scan(args.scan_existing || config.scan_existing);
    let watch_dir = config.watch_dir.clone();
    let service = IntakeService::new(Arc::new(Pipeline::from_config(Arc::new(config))));

    let shutdown = Arc::new(AtomicBool::new(false));
    {
        let shutdown = Arc::clone(&shutdown);
        ctrlc::set_handler(move || {
            shutdown.store(true, Ordering::Relaxed);
        })
        .context("Failed to install Ctrl-C handler")?;
    }

    let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);

    info!("Watching: {}", watch_dir.display());

    let watcher = std::thread::spawn(move || {
        scanner.watch(
            move |path| {
                if tx.blocking_send(path).is_err() {
                    log::warn!("Intake service stopped, dropping file event");
                }
            },
            shutdown,
        )
    });

    // Ends once the watcher thread drops its sender and in-flight runs drain
    let summary = service.run(rx).await;
    report(&summary);

    match watcher.join() {
        Ok(result) => result.context("Directory watcher failed"),
        Err(_) => bail!("Directory watcher thread panicked"),
    }
}

async fn process(config: IntakeConfig, args: ProcessArgs) -> Result<()> {
    let service = IntakeService::new(Arc::new(Pipeline::from_config(Arc::new(config))));

    let summary = service.process_paths(args.files).await;
    report(&summary);

    if summary.sink_failed > 0 || summary.crashed > 0 {
        bail!(
            "{} record(s) could not be written, {} run(s) crashed",
            summary.sink_failed,
            summary.crashed
        );
    }
    Ok(())
}

fn report(summary: &IntakeSummary) {
    println!(
        "Processed: {} success, {} needs review, {} skipped",
        summary.success, summary.needs_review, summary.skipped
    );
    if summary.sink_failed > 0 {
        warn!("{} record(s) were not written to the log", summary.sink_failed);
    }
}
