use crate::error::{CliError, Result};
use clap::Args;
use enginebench::{report, Comparator, EngineId, RunResult};
use std::path::PathBuf;
use tracing::info;

#[derive(Args, Debug)]
pub struct CompareArgs {
    /// Saved JSON results, two or more
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// One label per file, in the same order
    #[arg(short, long = "label", required = true)]
    pub labels: Vec<String>,

    /// Label to compare against [default: first label]
    #[arg(short, long)]
    pub baseline: Option<String>,

    /// Engine whose means are compared
    #[arg(short, long, default_value = "datafusion", value_parser = parse_engine)]
    pub engine: EngineId,

    /// Heading of the comparison report
    #[arg(short, long)]
    pub title: String,

    /// Markdown report path (stdout when omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Also save the comparison as JSON
    #[arg(long)]
    pub json: Option<PathBuf>,
}

fn parse_engine(s: &str) -> std::result::Result<EngineId, String> {
    s.parse().map_err(|e: enginebench::BenchError| e.to_string())
}

pub fn run(args: CompareArgs) -> Result<()> {
    if args.files.len() != args.labels.len() {
        return Err(CliError::Usage(format!(
            "{} files but {} labels; give one --label per file",
            args.files.len(),
            args.labels.len()
        )));
    }

    let runs = args
        .labels
        .iter()
        .zip(&args.files)
        .map(|(label, path)| {
            let run = report::load_run(path).map_err(|source| CliError::ComparisonInput {
                path: path.display().to_string(),
                source,
            })?;
            Ok((label.clone(), run))
        })
        .collect::<Result<Vec<(String, RunResult)>>>()?;

    let mut comparator = Comparator::new(args.engine);
    if let Some(baseline) = &args.baseline {
        comparator = comparator.with_baseline(baseline.clone());
    }
    let comparison = comparator.compare(&runs)?;

    let markdown = report::render_comparison_markdown(&comparison, &args.title);
    report::write_report(&markdown, args.output.as_deref())?;

    if let Some(path) = &args.json {
        let bytes = serde_json::to_vec_pretty(&comparison).map_err(enginebench::BenchError::from)?;
        std::fs::write(path, bytes)?;
        info!(path = %path.display(), "saved comparison JSON");
    }

    Ok(())
}
