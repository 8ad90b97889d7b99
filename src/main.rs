use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{debug, error};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use portal_reports::cli::{format_report_list, handle_report_command, ReportCommands};
use portal_reports::config::{ReportPaths, Settings};

#[derive(Parser)]
#[command(
    name = "portal",
    author = "Kaylee Beyene",
    version,
    about = "Financial report aggregation and export",
    long_about = "portal renders trial balances, income & expenditure statements, \
                  work-in-progress, job card and inventory reports from fetched \
                  ledger rows, as CSV, print-ready HTML or JSON."
)]
struct Cli {
    /// Log level (overridden by RUST_LOG)
    #[arg(long, global = true, env = "PORTAL_LOG_LEVEL", default_value_t = LevelFilter::WARN)]
    log_level: LevelFilter,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    #[command(flatten)]
    Report(ReportCommands),

    /// Show current configuration and paths
    Config {
        /// Write the current settings to disk
        #[arg(long)]
        init: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logger(cli.log_level);
    debug!("Log level set to {}", cli.log_level.to_string().to_lowercase());

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Exiting with error: {e:#}");
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let paths = ReportPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;

    match cli.command {
        Some(Commands::Report(cmd)) => handle_report_command(&paths, &settings, cmd)?,
        Some(Commands::Config { init }) => {
            if init {
                settings.save(&paths)?;
                println!("Settings written to: {}", paths.settings_file().display());
            }
            println!("portal-reports Configuration");
            println!("============================");
            println!("Base directory:   {}", paths.base_dir().display());
            println!("Settings file:    {}", paths.settings_file().display());
            println!("Output directory: {}", settings.output_dir(&paths).display());
            println!();
            println!("Settings:");
            println!("  Organization:     {}", settings.organization);
            println!("  Timestamp format: {}", settings.timestamp_format);
            println!("  Page size:        {}", settings.page_size);
            for (kind, policy) in &settings.zero_policies {
                println!(
                    "  Zero policy {}: missing={:?} zero={:?}",
                    kind, policy.missing, policy.zero
                );
            }
        }
        None => {
            println!("portal - financial report aggregation and export");
            println!();
            print!("{}", format_report_list());
            println!();
            println!("Run 'portal --help' for usage information.");
        }
    }

    Ok(())
}

/// Initializes the tracing subscriber.
fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => EnvFilter::from_default_env(),
        None => EnvFilter::new(format!("portal_reports={},{}={}", level, env!("CARGO_CRATE_NAME"), level)),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
