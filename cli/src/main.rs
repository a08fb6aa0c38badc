use clap::{Parser, Subcommand};
use console::style;
use enginebench::config::LoggingSettings;
use std::process;
use tracing::debug;

mod commands;
mod error;

use commands::*;
use error::Result;

#[derive(Parser)]
#[command(name = "enginebench")]
#[command(about = "enginebench - Compare SQL expression performance across query engines")]
#[command(version)]
#[command(long_about = "
enginebench runs the same SQL expressions on several query engines over a
synthetic dataset, reports per-function mean latencies with winners and
speedups, and compares saved results across runs.

Examples:
  enginebench list                                        # Show suites and functions
  enginebench run --suite strings --rows 100000           # Benchmark the strings suite
  enginebench run --suite strings --string-view --json out/sv.json
  enginebench compare a.json b.json --label v50 --label v51 --title \"strings\"
  enginebench config --output enginebench.toml            # Write a sample configuration
")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a benchmark suite on the configured engines
    Run(RunArgs),

    /// Compare saved JSON results across runs
    Compare(CompareArgs),

    /// List suites and their functions
    List(ListArgs),

    /// Write a sample configuration file
    Config(ConfigArgs),
}

fn main() {
    let cli = Cli::parse();

    init_logging(&cli);

    if let Err(e) = run_command(cli) {
        eprintln!("{} {}", style("error:").red().bold(), error::format_error(&e));
        process::exit(e.exit_code());
    }
}

fn run_command(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Run(args) => commands::run::run(args),
        Commands::Compare(args) => commands::compare::run(args),
        Commands::List(args) => commands::list::run(args),
        Commands::Config(args) => commands::config::run(args),
    }
}

/// Config file and environment first, then the verbosity flags
fn logging_settings(cli: &Cli) -> LoggingSettings {
    let config_path = match &cli.command {
        Commands::Run(args) => args.config.as_deref(),
        _ => None,
    };
    let mut logging = commands::run::configured_logging(config_path);

    if cli.debug {
        logging.level = "enginebench=debug".to_string();
    } else if cli.verbose {
        logging.level = "enginebench=info".to_string();
    } else if cli.quiet {
        logging.level = "error".to_string();
    }
    if cli.log_json {
        logging.json = true;
    }
    logging
}

fn init_logging(cli: &Cli) {
    let logging = logging_settings(cli);
    enginebench::init_logging(&logging.level, logging.json);
    debug!(level = %logging.level, json = logging.json, "enginebench CLI started");
}
