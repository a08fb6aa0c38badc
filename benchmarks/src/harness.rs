//! Timing harness
//!
//! Runs every function of a suite on every configured engine with a
//! warmup/measure protocol and reduces the measured iterations to a mean.
//! Structural problems (bad settings, malformed templates, engines that fail
//! to load the dataset) abort the run before anything is timed; a statement
//! an engine rejects only empties that one cell.

use std::collections::HashSet;

use chrono::Utc;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, warn};

use crate::dataset::{self, Dataset};
use crate::engines::{EngineAdapter, EngineId, EngineSession};
use crate::error::{BenchError, Result};
use crate::metrics::{HarnessMetrics, Phase};
use crate::results::{Measurement, ResultRow, RunResult};
use crate::suite::{Suite, Variant};
use crate::utils::{duration_ms, stats};

pub const DEFAULT_WARMUP_ITERATIONS: usize = 2;
pub const DEFAULT_MEASURED_ITERATIONS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HarnessSettings {
    /// Discarded executions before measuring
    pub warmup_iterations: usize,
    pub measured_iterations: usize,
}

impl Default for HarnessSettings {
    fn default() -> Self {
        Self {
            warmup_iterations: DEFAULT_WARMUP_ITERATIONS,
            measured_iterations: DEFAULT_MEASURED_ITERATIONS,
        }
    }
}

impl HarnessSettings {
    pub fn validate(&self) -> Result<()> {
        if self.measured_iterations == 0 {
            return Err(BenchError::config(
                "measured iterations must be at least 1; a mean needs one sample",
            ));
        }
        Ok(())
    }
}

/// One function's rendered statements, in configured engine order
struct PlannedFunction {
    name: String,
    statements: Vec<(EngineId, Option<String>)>,
}

pub struct TimingHarness {
    settings: HarnessSettings,
    metrics: HarnessMetrics,
    show_progress: bool,
}

impl TimingHarness {
    pub fn new(settings: HarnessSettings) -> Result<Self> {
        Ok(Self {
            settings,
            metrics: HarnessMetrics::new()?,
            show_progress: false,
        })
    }

    /// Draw an `indicatif` progress bar on stderr while running
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    pub fn settings(&self) -> &HarnessSettings {
        &self.settings
    }

    pub fn metrics(&self) -> &HarnessMetrics {
        &self.metrics
    }

    /// Benchmark `suite` on `adapters` over a fresh dataset of `row_count` rows
    pub fn run(
        &self,
        suite: &Suite,
        adapters: &[Box<dyn EngineAdapter>],
        row_count: usize,
        variant: Variant,
    ) -> Result<RunResult> {
        self.settings.validate()?;
        if row_count == 0 {
            return Err(BenchError::config("row count must be a positive integer"));
        }
        let engines = engine_ids(adapters)?;
        let plan = render_plan(suite, &engines)?;

        let dataset = dataset::generate(suite, row_count, variant)?;
        let mut sessions = adapters
            .iter()
            .map(|adapter| adapter.prepare(&dataset))
            .collect::<Result<Vec<_>>>()?;

        info!(
            suite = suite.name(),
            rows = row_count,
            variant = %dataset.variant(),
            engines = ?engines,
            warmup = self.settings.warmup_iterations,
            iterations = self.settings.measured_iterations,
            "starting benchmark run"
        );

        let progress = self.progress_bar((plan.len() * engines.len()) as u64, suite.name());
        let mut rows = Vec::with_capacity(plan.len());

        for function in &plan {
            let mut means = Vec::with_capacity(engines.len());
            for ((engine, statement), session) in function.statements.iter().zip(sessions.iter_mut()) {
                progress.set_message(format!("{} on {}", function.name, engine));
                let mean = match statement {
                    Some(sql) => self.measure(&function.name, *engine, session.as_mut(), sql, &dataset),
                    None => {
                        warn!(function = %function.name, engine = %engine, "unsupported on engine, skipping");
                        None
                    }
                };
                means.push((*engine, mean));
                progress.inc(1);
            }

            let row = ResultRow::from_means(function.name.clone(), &means);
            if let (Some(winner), Some(speedup)) = (row.winner, row.speedup) {
                debug!(function = %row.function_name, winner = %winner, speedup, "function compared");
            }
            rows.push(row);
        }
        progress.finish_and_clear();

        let result = RunResult::new(
            suite.name(),
            row_count,
            dataset.variant(),
            engines,
            self.settings.warmup_iterations,
            self.settings.measured_iterations,
            rows,
        )
        .with_recorded_at(Utc::now());

        info!(
            suite = suite.name(),
            tested = result.summary.functions_tested,
            compared = result.summary.functions_compared,
            "benchmark run finished"
        );
        Ok(result)
    }

    /// Warm up, then time `measured_iterations` executions.
    ///
    /// Returns the mean in milliseconds, or `None` if any execution fails.
    fn measure(
        &self,
        function_name: &str,
        engine: EngineId,
        session: &mut dyn EngineSession,
        sql: &str,
        dataset: &Dataset,
    ) -> Option<f64> {
        let total = self.settings.warmup_iterations + self.settings.measured_iterations;
        let mut measurements = Vec::with_capacity(self.settings.measured_iterations);

        for i in 0..total {
            let phase = if i < self.settings.warmup_iterations {
                Phase::Warmup
            } else {
                Phase::Measured
            };

            let execution = match session.execute(sql) {
                Ok(execution) => execution,
                Err(e) => {
                    warn!(function = function_name, engine = %engine, error = %e.message, "execution failed, marking unsupported");
                    self.metrics.record_error(engine);
                    return None;
                }
            };
            self.metrics
                .record_iteration(engine, phase, execution.elapsed.as_secs_f64());

            if execution.rows != dataset.row_count() {
                warn!(
                    function = function_name,
                    engine = %engine,
                    expected = dataset.row_count(),
                    actual = execution.rows,
                    "result row count differs from dataset"
                );
            }

            if phase == Phase::Measured {
                measurements.push(Measurement {
                    function_name: function_name.to_string(),
                    engine,
                    iteration: i - self.settings.warmup_iterations,
                    elapsed: execution.elapsed,
                });
            }
        }

        let samples: Vec<f64> = measurements.iter().map(|m| duration_ms(m.elapsed)).collect();
        let mean = stats::mean(&samples);
        debug!(function = function_name, engine = %engine, mean_ms = ?mean, "measured");
        mean
    }

    fn progress_bar(&self, len: u64, suite_name: &str) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }
        let pb = ProgressBar::new(len);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} {prefix} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos:>4}/{len:4} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        pb.set_prefix(suite_name.to_string());
        pb
    }
}

/// Engine ids in adapter order; rejects an empty or repeating list
fn engine_ids(adapters: &[Box<dyn EngineAdapter>]) -> Result<Vec<EngineId>> {
    if adapters.is_empty() {
        return Err(BenchError::config("at least one engine is required"));
    }
    let mut seen = HashSet::new();
    let mut engines = Vec::with_capacity(adapters.len());
    for adapter in adapters {
        let engine = adapter.engine_id();
        if !seen.insert(engine) {
            return Err(BenchError::config(format!("engine {} configured twice", engine)));
        }
        engines.push(engine);
    }
    Ok(engines)
}

/// Render every statement before anything runs
fn render_plan(suite: &Suite, engines: &[EngineId]) -> Result<Vec<PlannedFunction>> {
    suite
        .functions()
        .iter()
        .map(|function| {
            let statements = engines
                .iter()
                .map(|engine| Ok((*engine, suite.render_statement(function, *engine)?)))
                .collect::<Result<Vec<_>>>()?;
            Ok(PlannedFunction {
                name: function.name().to_string(),
                statements,
            })
        })
        .collect()
}
