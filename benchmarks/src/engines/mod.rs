//! Engine adapters
//!
//! Every query engine is reached through the same narrow contract: load a
//! [`Dataset`] once, then execute raw SQL statements and report how long each
//! one took to produce a fully materialized result.

pub mod datafusion;
pub mod duckdb;

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::dataset::Dataset;
use crate::error::{BenchError, ExecutionError, Result};

/// Table name every adapter registers the dataset under
pub const TABLE_NAME: &str = "bench_data";

/// Query engines known to the harness
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineId {
    DataFusion,
    DuckDb,
}

impl EngineId {
    /// Every engine, in canonical order. Suites must cover each one.
    pub const ALL: [EngineId; 2] = [EngineId::DataFusion, EngineId::DuckDb];

    pub fn as_str(&self) -> &'static str {
        match self {
            EngineId::DataFusion => "datafusion",
            EngineId::DuckDb => "duckdb",
        }
    }

    /// Human readable name used in reports
    pub fn display_name(&self) -> &'static str {
        match self {
            EngineId::DataFusion => "DataFusion",
            EngineId::DuckDb => "DuckDB",
        }
    }
}

impl fmt::Display for EngineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EngineId {
    type Err = BenchError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "datafusion" => Ok(EngineId::DataFusion),
            "duckdb" => Ok(EngineId::DuckDb),
            other => Err(BenchError::config(format!(
                "unknown engine '{}', expected one of: datafusion, duckdb",
                other
            ))),
        }
    }
}

/// Outcome of one timed statement
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Execution {
    /// Wall-clock time for planning, execution and materialization
    pub elapsed: Duration,
    /// Rows in the materialized result
    pub rows: usize,
}

/// Factory side of an engine: knows how to load a dataset
pub trait EngineAdapter {
    fn engine_id(&self) -> EngineId;

    /// Load the dataset into a fresh single-threaded execution context.
    ///
    /// Called once per benchmark invocation; its cost is never timed.
    fn prepare(&self, dataset: &Dataset) -> Result<Box<dyn EngineSession>>;
}

/// A loaded execution context, ready to run statements against [`TABLE_NAME`]
pub trait EngineSession {
    /// Run one statement to completion, consuming every output row.
    fn execute(&mut self, sql: &str) -> std::result::Result<Execution, ExecutionError>;
}

/// Build the real adapter for an engine
pub fn create_adapter(engine: EngineId) -> Box<dyn EngineAdapter> {
    match engine {
        EngineId::DataFusion => Box::new(datafusion::DataFusionAdapter::new()),
        EngineId::DuckDb => Box::new(duckdb::DuckDbAdapter::new()),
    }
}

/// Parse a comma separated engine list such as `datafusion,duckdb`
pub fn parse_engine_list(list: &str) -> Result<Vec<EngineId>> {
    let engines = list
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(EngineId::from_str)
        .collect::<Result<Vec<_>>>()?;

    if engines.is_empty() {
        return Err(BenchError::config("engine list is empty"));
    }
    Ok(engines)
}
