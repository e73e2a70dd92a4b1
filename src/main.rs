//! Stack Cartographer main entry point
//!
//! This is the command-line interface for the API documentation mapper.

use clap::Parser;
use stack_cartographer::config::{load_config, validate, Config, FailurePolicy};
use stack_cartographer::crawler::{run_to_file, CrawlEvent, CrawlReport, EXIT_FAILURE};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Stack Cartographer: maps an API documentation site into a JSON catalog
///
/// Fetches the documentation index, visits every method's page one at a
/// time and writes the method names, descriptions and parameter
/// declarations to a single JSON file.
#[derive(Parser, Debug)]
#[command(name = "stack-cartographer")]
#[command(version)]
#[command(about = "Maps an API documentation site into a JSON catalog", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file (built-in defaults otherwise)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Write the catalog here instead of the configured output path
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Skip methods whose page cannot be processed and write a partial catalog
    #[arg(long)]
    keep_going: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error log output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    match run(&cli).await {
        Ok(report) => {
            if !report.is_complete() {
                println!("Warning: {} methods were skipped", report.failures.len());
            }
            ExitCode::from(report.exit_code())
        }
        Err(e) => {
            tracing::debug!("Run failed: {:?}", e);
            println!("Error: {}", e);
            ExitCode::from(EXIT_FAILURE)
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr; stdout carries the progress lines.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("stack_cartographer=warn,warn"),
            1 => EnvFilter::new("stack_cartographer=info,warn"),
            2 => EnvFilter::new("stack_cartographer=debug,info"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Loads the configuration and applies command-line overrides
fn resolve_config(cli: &Cli) -> stack_cartographer::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)?
        }
        None => Config::default(),
    };

    if let Some(output) = &cli.output {
        config.output.path = output.clone();
    }
    if cli.keep_going {
        config.crawl.on_failure = FailurePolicy::Skip;
    }

    validate(&config)?;
    Ok(config)
}

/// Runs the whole pipeline
async fn run(cli: &Cli) -> stack_cartographer::Result<CrawlReport> {
    let config = resolve_config(cli)?;

    println!("Fetching list of all methods...");
    let report = run_to_file(&config, print_progress).await?;

    println!(
        "Catalog of {} methods written to {}",
        report.methods.len(),
        config.output.path.display()
    );

    Ok(report)
}

fn print_progress(event: CrawlEvent<'_>) {
    match event {
        CrawlEvent::Listed { count } => {
            println!("{} methods found - parsing them one at a time...", count)
        }
        CrawlEvent::Method { index, total, name } => println!("[{}/{}] {}", index, total, name),
        CrawlEvent::Skipped { name, error } => println!("  skipped {}: {}", name, error),
    }
}
