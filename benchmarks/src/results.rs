//! Run results
//!
//! A [`RunResult`] is the persisted unit of one harness invocation. Winner,
//! speedup and summary figures are derived here from per-engine means so the
//! harness, the JSON reader and the tests all share one definition.

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::engines::EngineId;
use crate::harness::{DEFAULT_MEASURED_ITERATIONS, DEFAULT_WARMUP_ITERATIONS};
use crate::suite::Variant;

/// One timed sample; consumed by aggregation, never persisted
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    pub function_name: String,
    pub engine: EngineId,
    pub iteration: usize,
    pub elapsed: Duration,
}

/// Per-function outcome across every configured engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRow {
    pub function_name: String,
    /// Mean milliseconds per engine; `None` marks an unsupported cell
    #[serde(rename = "engines")]
    pub means_ms: BTreeMap<EngineId, Option<f64>>,
    pub winner: Option<EngineId>,
    pub speedup: Option<f64>,
}

impl ResultRow {
    /// Build a row from means listed in configured engine order.
    ///
    /// Winner and speedup are only set when at least two engines have a
    /// mean. Ties go to the engine listed first.
    pub fn from_means(function_name: impl Into<String>, means: &[(EngineId, Option<f64>)]) -> Self {
        let present: Vec<(EngineId, f64)> = means
            .iter()
            .filter_map(|(engine, mean)| mean.map(|m| (*engine, m)))
            .collect();

        let (winner, speedup) = if present.len() >= 2 {
            let mut fastest = present[0];
            let mut slowest = present[0].1;
            for (engine, mean) in &present[1..] {
                if *mean < fastest.1 {
                    fastest = (*engine, *mean);
                }
                if *mean > slowest {
                    slowest = *mean;
                }
            }
            let speedup = if fastest.1 > 0.0 {
                Some(slowest / fastest.1)
            } else {
                None
            };
            (Some(fastest.0), speedup)
        } else {
            (None, None)
        };

        Self {
            function_name: function_name.into(),
            means_ms: means.iter().copied().collect(),
            winner,
            speedup,
        }
    }

    pub fn mean_ms(&self, engine: EngineId) -> Option<f64> {
        self.means_ms.get(&engine).copied().flatten()
    }

    /// Engines with a non-null mean
    pub fn supported_count(&self) -> usize {
        self.means_ms.values().filter(|m| m.is_some()).count()
    }

    /// Whether the row enters win counts (two or more engines measured)
    pub fn is_compared(&self) -> bool {
        self.supported_count() >= 2
    }
}

/// Aggregate figures over every row of a run
///
/// Only the per-engine maps are required in persisted files; the counters
/// are rebuilt from the rows when absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Rows with at least one measured engine
    #[serde(default)]
    pub functions_tested: usize,
    /// Rows with at least two measured engines
    #[serde(default)]
    pub functions_compared: usize,
    #[serde(default)]
    pub per_engine_total_ms: BTreeMap<EngineId, f64>,
    #[serde(default)]
    pub per_engine_win_count: BTreeMap<EngineId, usize>,
}

impl RunSummary {
    /// Every engine in `engines` appears in both maps, even with zero
    pub fn from_rows(engines: &[EngineId], rows: &[ResultRow]) -> Self {
        let mut per_engine_total_ms: BTreeMap<EngineId, f64> =
            engines.iter().map(|e| (*e, 0.0)).collect();
        let mut per_engine_win_count: BTreeMap<EngineId, usize> =
            engines.iter().map(|e| (*e, 0)).collect();

        let mut functions_tested = 0;
        let mut functions_compared = 0;

        for row in rows {
            if row.supported_count() >= 1 {
                functions_tested += 1;
            }
            for engine in engines {
                if let Some(mean) = row.mean_ms(*engine) {
                    *per_engine_total_ms.entry(*engine).or_insert(0.0) += mean;
                }
            }
            if row.is_compared() {
                functions_compared += 1;
                if let Some(winner) = row.winner {
                    *per_engine_win_count.entry(winner).or_insert(0) += 1;
                }
            }
        }

        Self {
            functions_tested,
            functions_compared,
            per_engine_total_ms,
            per_engine_win_count,
        }
    }

    pub fn total_ms(&self, engine: EngineId) -> f64 {
        self.per_engine_total_ms.get(&engine).copied().unwrap_or(0.0)
    }

    pub fn wins(&self, engine: EngineId) -> usize {
        self.per_engine_win_count.get(&engine).copied().unwrap_or(0)
    }
}

/// Everything one harness invocation produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    pub suite_name: String,
    pub row_count: usize,
    #[serde(default)]
    pub variant: Variant,
    /// Configured engine order; derived from the rows when absent
    #[serde(default)]
    pub engines: Vec<EngineId>,
    #[serde(default = "default_warmup_iterations")]
    pub warmup_iterations: usize,
    #[serde(default = "default_measured_iterations")]
    pub measured_iterations: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recorded_at: Option<DateTime<Utc>>,
    pub rows: Vec<ResultRow>,
    #[serde(default)]
    pub summary: RunSummary,
}

fn default_warmup_iterations() -> usize {
    DEFAULT_WARMUP_ITERATIONS
}

fn default_measured_iterations() -> usize {
    DEFAULT_MEASURED_ITERATIONS
}

impl RunResult {
    /// Assemble a run from finished rows, deriving the summary
    pub fn new(
        suite_name: impl Into<String>,
        row_count: usize,
        variant: Variant,
        engines: Vec<EngineId>,
        warmup_iterations: usize,
        measured_iterations: usize,
        rows: Vec<ResultRow>,
    ) -> Self {
        let summary = RunSummary::from_rows(&engines, &rows);
        Self {
            suite_name: suite_name.into(),
            row_count,
            variant,
            engines,
            warmup_iterations,
            measured_iterations,
            recorded_at: None,
            rows,
            summary,
        }
    }

    pub fn with_recorded_at(mut self, at: DateTime<Utc>) -> Self {
        self.recorded_at = Some(at);
        self
    }

    /// Fill what a minimal persisted document leaves out.
    ///
    /// Missing engines become the engines named in the rows, first seen
    /// first. Counters are always recomputed from the rows; per-engine
    /// totals and win counts from the file are kept, engines absent from
    /// them get derived values.
    pub fn with_derived_fields(mut self) -> Self {
        if self.engines.is_empty() {
            for row in &self.rows {
                for engine in row.means_ms.keys() {
                    if !self.engines.contains(engine) {
                        self.engines.push(*engine);
                    }
                }
            }
        }

        let derived = RunSummary::from_rows(&self.engines, &self.rows);
        self.summary.functions_tested = derived.functions_tested;
        self.summary.functions_compared = derived.functions_compared;
        for (engine, total) in derived.per_engine_total_ms {
            self.summary.per_engine_total_ms.entry(engine).or_insert(total);
        }
        for (engine, wins) in derived.per_engine_win_count {
            self.summary.per_engine_win_count.entry(engine).or_insert(wins);
        }
        self
    }

    pub fn row(&self, function_name: &str) -> Option<&ResultRow> {
        self.rows.iter().find(|r| r.function_name == function_name)
    }
}
