//! Cross-run comparison
//!
//! Aligns two or more persisted runs by function name and expresses every
//! run's mean for one engine relative to a baseline run. Functions missing
//! from a run keep their row with an empty cell for that run.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::engines::EngineId;
use crate::error::{BenchError, Result};
use crate::results::RunResult;
use crate::utils::stats;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRow {
    pub function_name: String,
    /// Mean per run label, aligned with [`ComparisonResult::labels`]
    pub means_ms: Vec<Option<f64>>,
    /// `baseline / run` per label; above 1.0 means the run is faster
    pub speedups: Vec<Option<f64>>,
}

impl ComparisonRow {
    /// Signed percentage change of run `index` against the baseline.
    ///
    /// Positive values mean faster, negative slower, symmetric around zero:
    /// a 2x speedup is `+100` and a 2x slowdown is `-100`.
    pub fn speedup_percent(&self, index: usize) -> Option<f64> {
        let speedup = self.speedups.get(index).copied().flatten()?;
        if speedup <= 0.0 {
            return None;
        }
        if speedup >= 1.0 {
            Some((speedup - 1.0) * 100.0)
        } else {
            Some(-(1.0 / speedup - 1.0) * 100.0)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub engine: EngineId,
    pub baseline: String,
    pub labels: Vec<String>,
    pub rows: Vec<ComparisonRow>,
    /// Sum of non-null means per label
    pub totals_ms: Vec<f64>,
    /// Geometric mean of each label's non-null speedups
    pub geomean_speedups: Vec<Option<f64>>,
}

impl ComparisonResult {
    pub fn baseline_index(&self) -> usize {
        self.labels
            .iter()
            .position(|l| l == &self.baseline)
            .unwrap_or(0)
    }

    pub fn row(&self, function_name: &str) -> Option<&ComparisonRow> {
        self.rows.iter().find(|r| r.function_name == function_name)
    }
}

/// Builder-style entry point for comparisons
#[derive(Debug, Clone)]
pub struct Comparator {
    engine: EngineId,
    baseline: Option<String>,
}

impl Comparator {
    pub fn new(engine: EngineId) -> Self {
        Self {
            engine,
            baseline: None,
        }
    }

    /// Compare against `label` instead of the first run
    pub fn with_baseline(mut self, label: impl Into<String>) -> Self {
        self.baseline = Some(label.into());
        self
    }

    pub fn compare(&self, runs: &[(String, RunResult)]) -> Result<ComparisonResult> {
        if runs.len() < 2 {
            return Err(BenchError::InsufficientRuns { got: runs.len() });
        }

        let mut seen = HashSet::new();
        for (label, _) in runs {
            if !seen.insert(label.as_str()) {
                return Err(BenchError::config(format!(
                    "run label '{}' is used more than once",
                    label
                )));
            }
        }

        let baseline_index = match &self.baseline {
            Some(label) => runs
                .iter()
                .position(|(l, _)| l == label)
                .ok_or_else(|| BenchError::UnknownBaseline {
                    label: label.clone(),
                })?,
            None => 0,
        };
        let baseline = runs[baseline_index].0.clone();

        // baseline first, then every other run in order
        let order = std::iter::once(baseline_index)
            .chain((0..runs.len()).filter(|i| *i != baseline_index));
        let mut names: Vec<&str> = Vec::new();
        let mut known = HashSet::new();
        for i in order {
            for row in &runs[i].1.rows {
                if known.insert(row.function_name.as_str()) {
                    names.push(&row.function_name);
                }
            }
        }

        let rows: Vec<ComparisonRow> = names
            .iter()
            .map(|name| {
                let means_ms: Vec<Option<f64>> = runs
                    .iter()
                    .map(|(_, run)| run.row(name).and_then(|r| r.mean_ms(self.engine)))
                    .collect();
                let base = means_ms[baseline_index];
                let speedups = means_ms
                    .iter()
                    .map(|mean| match (base, mean) {
                        (Some(b), Some(m)) if *m > 0.0 => Some(b / m),
                        _ => None,
                    })
                    .collect();
                ComparisonRow {
                    function_name: name.to_string(),
                    means_ms,
                    speedups,
                }
            })
            .collect();

        let totals_ms = (0..runs.len())
            .map(|i| rows.iter().filter_map(|r| r.means_ms[i]).sum::<f64>())
            .collect();
        let geomean_speedups = (0..runs.len())
            .map(|i| {
                let speedups: Vec<f64> = rows.iter().filter_map(|r| r.speedups[i]).collect();
                stats::geomean(&speedups)
            })
            .collect();

        debug!(
            engine = %self.engine,
            baseline = %baseline,
            runs = runs.len(),
            functions = rows.len(),
            "compared runs"
        );

        Ok(ComparisonResult {
            engine: self.engine,
            baseline,
            labels: runs.iter().map(|(l, _)| l.clone()).collect(),
            rows,
            totals_ms,
            geomean_speedups,
        })
    }
}

/// Compare `runs` for `engine` against the first run
pub fn compare(runs: &[(String, RunResult)], engine: EngineId) -> Result<ComparisonResult> {
    Comparator::new(engine).compare(runs)
}
