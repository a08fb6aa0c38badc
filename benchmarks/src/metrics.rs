//! Prometheus metrics for harness runs
//!
//! Each [`HarnessMetrics`] owns its own registry, so concurrent harnesses
//! (and tests) never share counters.

use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder,
};

use crate::engines::EngineId;
use crate::error::Result;

/// Iteration phase label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Warmup,
    Measured,
}

impl Phase {
    fn as_str(&self) -> &'static str {
        match self {
            Phase::Warmup => "warmup",
            Phase::Measured => "measured",
        }
    }
}

pub struct HarnessMetrics {
    registry: Registry,
    iterations: IntCounterVec,
    execution_errors: IntCounterVec,
    iteration_seconds: HistogramVec,
}

impl HarnessMetrics {
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let iterations = IntCounterVec::new(
            Opts::new(
                "enginebench_iterations_total",
                "Statements executed, by engine and phase",
            ),
            &["engine", "phase"],
        )?;
        registry.register(Box::new(iterations.clone()))?;

        let execution_errors = IntCounterVec::new(
            Opts::new(
                "enginebench_execution_errors_total",
                "Statements an engine rejected or failed",
            ),
            &["engine"],
        )?;
        registry.register(Box::new(execution_errors.clone()))?;

        let iteration_seconds = HistogramVec::new(
            HistogramOpts::new(
                "enginebench_iteration_seconds",
                "Wall-clock time of measured iterations",
            )
            .buckets(prometheus::exponential_buckets(0.0005, 2.0, 16)?),
            &["engine"],
        )?;
        registry.register(Box::new(iteration_seconds.clone()))?;

        Ok(Self {
            registry,
            iterations,
            execution_errors,
            iteration_seconds,
        })
    }

    pub fn record_iteration(&self, engine: EngineId, phase: Phase, seconds: f64) {
        self.iterations
            .with_label_values(&[engine.as_str(), phase.as_str()])
            .inc();
        if phase == Phase::Measured {
            self.iteration_seconds
                .with_label_values(&[engine.as_str()])
                .observe(seconds);
        }
    }

    pub fn record_error(&self, engine: EngineId) {
        self.execution_errors
            .with_label_values(&[engine.as_str()])
            .inc();
    }

    pub fn iterations(&self, engine: EngineId, phase: Phase) -> u64 {
        self.iterations
            .with_label_values(&[engine.as_str(), phase.as_str()])
            .get()
    }

    pub fn errors(&self, engine: EngineId) -> u64 {
        self.execution_errors
            .with_label_values(&[engine.as_str()])
            .get()
    }

    /// Export metrics in the Prometheus text format
    pub fn export_text(&self) -> Result<String> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}
