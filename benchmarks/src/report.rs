//! Report rendering and persistence
//!
//! Markdown for humans, pretty JSON for the comparator. Nothing in here
//! touches an engine.

use std::fmt::Write as _;
use std::fs;
use std::io::{self, Write};
use std::path::Path;

use tracing::info;

use crate::compare::ComparisonResult;
use crate::error::Result;
use crate::results::RunResult;

const UNSUPPORTED: &str = "unsupported";
const NOT_AVAILABLE: &str = "n/a";

/// Render one run as a markdown document
pub fn render_markdown(run: &RunResult) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "# {} benchmark results", run.suite_name);
    let _ = writeln!(out);
    let _ = writeln!(out, "**Rows:** {}  ", group_thousands(run.row_count));
    let _ = writeln!(out, "**Variant:** {}  ", run.variant);
    let _ = writeln!(
        out,
        "**Configuration:** {} warmup, {} measured iterations, single-threaded  ",
        run.warmup_iterations, run.measured_iterations
    );
    if let Some(at) = run.recorded_at {
        let _ = writeln!(out, "**Recorded:** {}  ", at.format("%Y-%m-%d %H:%M:%S UTC"));
    }
    let _ = writeln!(out);

    // table
    out.push_str("| Function |");
    for engine in &run.engines {
        let _ = write!(out, " {} (ms) |", engine.display_name());
    }
    out.push_str(" Speedup | Winner |\n|----------|");
    for _ in &run.engines {
        out.push_str("---:|");
    }
    out.push_str("---:|---|\n");

    for row in &run.rows {
        let _ = write!(out, "| {} |", row.function_name);
        for engine in &run.engines {
            match row.mean_ms(*engine) {
                Some(mean) => {
                    let _ = write!(out, " {:.3} |", mean);
                }
                None => {
                    let _ = write!(out, " {} |", UNSUPPORTED);
                }
            }
        }
        let speedup = row
            .speedup
            .map(|s| format!("{:.2}x", s))
            .unwrap_or_else(|| NOT_AVAILABLE.to_string());
        let winner = row.winner.map(|w| w.display_name()).unwrap_or(NOT_AVAILABLE);
        let _ = writeln!(out, " {} | {} |", speedup, winner);
    }

    // summary
    let summary = &run.summary;
    let _ = writeln!(out);
    let _ = writeln!(out, "## Summary");
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "- **Functions measured (one or more engines):** {}",
        summary.functions_tested
    );
    let _ = writeln!(
        out,
        "- **Functions compared (two or more engines):** {}",
        summary.functions_compared
    );
    for engine in &run.engines {
        let _ = writeln!(
            out,
            "- **{} wins:** {}",
            engine.display_name(),
            summary.wins(*engine)
        );
    }
    for engine in &run.engines {
        let _ = writeln!(
            out,
            "- **Total {} time:** {:.3} ms",
            engine.display_name(),
            summary.total_ms(*engine)
        );
    }

    out
}

/// Render a cross-run comparison as a markdown document
pub fn render_comparison_markdown(comparison: &ComparisonResult, title: &str) -> String {
    let mut out = String::new();
    let baseline = comparison.baseline_index();
    let others: Vec<usize> = (0..comparison.labels.len())
        .filter(|i| *i != baseline)
        .collect();

    let _ = writeln!(out, "# {}", title);
    let _ = writeln!(out);
    let _ = writeln!(out, "**Engine:** {}  ", comparison.engine.display_name());
    let _ = writeln!(out, "**Baseline:** {}  ", comparison.baseline);
    let _ = writeln!(out);

    out.push_str("| Function |");
    for label in &comparison.labels {
        let _ = write!(out, " {} (ms) |", label);
    }
    for i in &others {
        let _ = write!(out, " {} vs {} |", comparison.labels[*i], comparison.baseline);
    }
    out.push_str("\n|----------|");
    for _ in 0..comparison.labels.len() + others.len() {
        out.push_str("---:|");
    }
    out.push('\n');

    for row in &comparison.rows {
        let _ = write!(out, "| {} |", row.function_name);
        for mean in &row.means_ms {
            let _ = write!(out, " {} |", format_ms(*mean));
        }
        for i in &others {
            let cell = match (row.speedups[*i], row.speedup_percent(*i)) {
                (Some(s), Some(p)) => format!("{:.2}x ({:+.1}%)", s, p),
                _ => NOT_AVAILABLE.to_string(),
            };
            let _ = write!(out, " {} |", cell);
        }
        out.push('\n');
    }

    out.push_str("| **Total** |");
    for total in &comparison.totals_ms {
        let _ = write!(out, " {:.3} |", total);
    }
    for _ in &others {
        out.push_str(" |");
    }
    out.push('\n');

    out.push_str("| **Geomean speedup** |");
    for _ in &comparison.labels {
        out.push_str(" |");
    }
    for i in &others {
        let cell = comparison.geomean_speedups[*i]
            .map(|g| format!("{:.3}x", g))
            .unwrap_or_else(|| NOT_AVAILABLE.to_string());
        let _ = write!(out, " {} |", cell);
    }
    out.push('\n');

    out
}

/// Pretty JSON, the format [`from_json`] and the comparator read back
pub fn to_json(run: &RunResult) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec_pretty(run)?)
}

/// Parse a persisted run; fields other producers may omit are derived
pub fn from_json(bytes: &[u8]) -> Result<RunResult> {
    let run: RunResult = serde_json::from_slice(bytes)?;
    Ok(run.with_derived_fields())
}

pub fn load_run(path: &Path) -> Result<RunResult> {
    let bytes = fs::read(path)?;
    from_json(&bytes)
}

/// Write `text` to `path`, or to stdout when no path is given
pub fn write_report(text: &str, path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, text)?;
            info!(path = %path.display(), "report written");
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            handle.write_all(text.as_bytes())?;
            handle.flush()?;
        }
    }
    Ok(())
}

fn format_ms(mean: Option<f64>) -> String {
    match mean {
        Some(mean) => format!("{:.3}", mean),
        None => UNSUPPORTED.to_string(),
    }
}

/// `1000000` → `1,000,000`
fn group_thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
