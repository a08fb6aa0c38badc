use crate::error::Result;
use clap::Args;
use enginebench::engines::{create_adapter, parse_engine_list};
use enginebench::config::LoggingSettings;
use enginebench::{report, Config, SuiteRegistry, TimingHarness, Variant};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Suite to run (see `enginebench list`)
    #[arg(short, long)]
    pub suite: Option<String>,

    /// Number of dataset rows [default: 1000000]
    #[arg(short, long)]
    pub rows: Option<usize>,

    /// Warmup iterations per function and engine [default: 2]
    #[arg(long)]
    pub warmup: Option<usize>,

    /// Measured iterations per function and engine [default: 5]
    #[arg(short, long)]
    pub iterations: Option<usize>,

    /// Markdown report path (stdout when omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Also save the run as JSON for later comparison
    #[arg(long)]
    pub json: Option<PathBuf>,

    /// Write Prometheus metrics in text format
    #[arg(long)]
    pub metrics: Option<PathBuf>,

    /// Store text columns as Utf8View
    #[arg(long)]
    pub string_view: bool,

    /// Comma separated engines, e.g. `datafusion,duckdb`
    #[arg(short, long)]
    pub engines: Option<String>,

    /// Configuration file (TOML)
    #[arg(short, long, env = "ENGINEBENCH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Do not draw a progress bar
    #[arg(long)]
    pub no_progress: bool,
}

/// Logging section of the config file and environment.
///
/// Unreadable files fall back to defaults here; `resolve_config` reports
/// them once logging is installed.
pub fn configured_logging(path: Option<&Path>) -> LoggingSettings {
    let mut config = path
        .and_then(|p| Config::load_from_file(p).ok())
        .unwrap_or_default();
    if config.apply_env().is_err() {
        return Config::default().logging;
    }
    config.logging
}

/// Defaults, then the config file, then environment, then flags
pub fn resolve_config(args: &RunArgs) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::load_from_file(path)?,
        None => Config::default(),
    };
    config.apply_env()?;

    if let Some(suite) = &args.suite {
        config.run.suite = suite.clone();
    }
    if let Some(rows) = args.rows {
        config.run.rows = rows;
    }
    if let Some(warmup) = args.warmup {
        config.run.warmup = warmup;
    }
    if let Some(iterations) = args.iterations {
        config.run.iterations = iterations;
    }
    if args.string_view {
        config.run.variant = Variant::StringView;
    }
    if let Some(engines) = &args.engines {
        config.run.engines = parse_engine_list(engines)?;
    }
    if args.output.is_some() {
        config.output.markdown = args.output.clone();
    }
    if args.json.is_some() {
        config.output.json = args.json.clone();
    }
    if args.metrics.is_some() {
        config.output.metrics = args.metrics.clone();
    }
    if args.no_progress {
        config.output.progress = false;
    }

    config.validate()?;
    Ok(config)
}

pub fn run(args: RunArgs) -> Result<()> {
    let config = resolve_config(&args)?;

    let registry = SuiteRegistry::builtin()?;
    let suite = registry.get(&config.run.suite)?;

    let adapters: Vec<_> = config.run.engines.iter().map(|e| create_adapter(*e)).collect();
    let harness = TimingHarness::new(config.harness_settings())?.with_progress(config.output.progress);

    let result = harness.run(suite, &adapters, config.run.rows, config.run.variant)?;

    let markdown = report::render_markdown(&result);
    report::write_report(&markdown, config.output.markdown.as_deref())?;

    if let Some(path) = &config.output.json {
        let bytes = report::to_json(&result)?;
        std::fs::write(path, bytes)?;
        info!(path = %path.display(), "saved JSON results");
    }

    if let Some(path) = &config.output.metrics {
        std::fs::write(path, harness.metrics().export_text()?)?;
        info!(path = %path.display(), "saved metrics");
    }

    Ok(())
}
