//! Cross-engine SQL expression benchmarks
//!
//! This crate compares equivalent SQL expressions across query engines under
//! repeatable conditions:
//!
//! - Suites of benchmark functions, each expressed once per engine
//! - Deterministic synthetic datasets (Arrow record batches)
//! - Engine adapters for DataFusion and DuckDB behind one trait
//! - A warmup/measure timing harness reducing iterations to means
//! - Markdown and JSON reports, plus cross-run comparison of saved results

pub mod compare;
pub mod config;
pub mod dataset;
pub mod definition;
pub mod engines;
pub mod error;
pub mod harness;
pub mod metrics;
pub mod registry;
pub mod report;
pub mod results;
pub mod suite;
pub mod suites;
pub mod utils;

pub use compare::{compare, Comparator, ComparisonResult, ComparisonRow};
pub use config::Config;
pub use dataset::Dataset;
pub use definition::{BenchmarkFunction, EngineTemplate};
pub use engines::{create_adapter, EngineAdapter, EngineId, EngineSession, Execution};
pub use error::{BenchError, ExecutionError, Result};
pub use harness::{HarnessSettings, TimingHarness};
pub use registry::SuiteRegistry;
pub use results::{ResultRow, RunResult, RunSummary};
pub use suite::{LogicalType, Suite, Variant};

use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber.
///
/// Logs go to stderr so reports written to stdout stay clean. `RUST_LOG`
/// takes precedence over `level` when set.
pub fn init_logging(level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    // a second call (e.g. from tests) keeps the first subscriber
    let _ = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
}
