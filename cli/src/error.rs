use enginebench::BenchError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Bench(#[from] BenchError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A results file that could not be read for comparison
    #[error("Cannot read results {path}: {source}")]
    ComparisonInput { path: String, source: BenchError },

    /// Arguments that parse but do not fit together
    #[error("Invalid arguments: {0}")]
    Usage(String),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Usage(_) => 2,
            CliError::ComparisonInput { .. } => 4,
            CliError::Bench(e) => match e {
                BenchError::Configuration(_) => 2,
                BenchError::UnknownSuite { .. } => 3,
                BenchError::InsufficientRuns { .. } | BenchError::UnknownBaseline { .. } => 4,
                _ => 1,
            },
            CliError::Io(_) => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, CliError>;

/// Format error for user-friendly display
pub fn format_error(error: &CliError) -> String {
    match error {
        CliError::Bench(BenchError::UnknownSuite { name, available }) => {
            format!(
                "Unknown suite: {}\n\nAvailable suites: {}\nRun 'enginebench list' to see their functions.",
                name, available
            )
        }
        CliError::Bench(BenchError::Configuration(msg)) | CliError::Usage(msg) => {
            format!(
                "Configuration Error: {}\n\nRun 'enginebench config' to write a sample configuration.",
                msg
            )
        }
        CliError::Bench(BenchError::InsufficientRuns { got }) => {
            format!(
                "Comparison Error: got {} result file(s), at least two are needed.",
                got
            )
        }
        _ => error.to_string(),
    }
}
