//! Error handling for the benchmark harness
//!
//! Structural problems (bad configuration, malformed suites, unknown names)
//! surface as [`BenchError`] and abort the operation. Engine failures on a
//! single statement surface as [`ExecutionError`], which the timing harness
//! catches and records as an unsupported cell.

use std::io;

use thiserror::Error;

use crate::engines::EngineId;

/// The main error type for the harness
#[derive(Error, Debug)]
pub enum BenchError {
    /// Invalid row count, iteration counts or engine selection
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Unknown suite: {name}. Available: {available}")]
    UnknownSuite { name: String, available: String },

    #[error("Suite already registered: {name}")]
    DuplicateSuite { name: String },

    #[error("Suite {suite} defines function {function} more than once")]
    DuplicateFunction { suite: String, function: String },

    /// A function is missing an entry (template or explicit unsupported) for an engine
    #[error("Suite {suite}: function {function} has no entry for engine {engine}")]
    IncompleteTemplates {
        suite: String,
        function: String,
        engine: EngineId,
    },

    /// A template references a placeholder the suite does not bind
    #[error("Template error in {suite}/{function} for {engine}: {reason}")]
    Template {
        suite: String,
        function: String,
        engine: EngineId,
        reason: String,
    },

    #[error(transparent)]
    Execution(#[from] ExecutionError),

    /// An engine could not be created or could not load the dataset
    #[error("Engine setup failed for {engine}: {reason}")]
    EngineSetup { engine: EngineId, reason: String },

    #[error("At least two runs are required for a comparison, got {got}")]
    InsufficientRuns { got: usize },

    #[error("Baseline label {label} is not among the compared runs")]
    UnknownBaseline { label: String },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("Arrow error: {0}")]
    Arrow(#[from] datafusion::arrow::error::ArrowError),

    #[error("Parquet error: {0}")]
    Parquet(#[from] datafusion::parquet::errors::ParquetError),

    #[error("Metrics error: {0}")]
    Metrics(#[from] prometheus::Error),
}

/// An engine rejected or failed a rendered statement
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{engine} failed to execute `{sql}`: {message}")]
pub struct ExecutionError {
    pub engine: EngineId,
    pub sql: String,
    pub message: String,
}

impl ExecutionError {
    pub fn new(engine: EngineId, sql: impl Into<String>, message: impl ToString) -> Self {
        Self {
            engine,
            sql: sql.into(),
            message: message.to_string(),
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, BenchError>;

impl BenchError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        BenchError::Configuration(msg.into())
    }

    /// Get the error category for logging and exit code mapping
    pub fn category(&self) -> &'static str {
        match self {
            BenchError::Configuration(_) => "configuration",
            BenchError::UnknownSuite { .. } => "unknown_suite",
            BenchError::DuplicateSuite { .. }
            | BenchError::DuplicateFunction { .. }
            | BenchError::IncompleteTemplates { .. }
            | BenchError::Template { .. } => "suite_definition",
            BenchError::Execution(_) | BenchError::EngineSetup { .. } => "engine",
            BenchError::InsufficientRuns { .. } | BenchError::UnknownBaseline { .. } => {
                "comparison"
            }
            BenchError::Io(_) => "io",
            BenchError::Json(_) | BenchError::TomlDe(_) | BenchError::TomlSer(_) => {
                "serialization"
            }
            BenchError::Arrow(_) | BenchError::Parquet(_) => "dataset",
            BenchError::Metrics(_) => "metrics",
        }
    }
}
