//! Configuration for benchmark runs
//!
//! Layered as: defaults, then an optional TOML file, then `ENGINEBENCH_*`
//! environment variables. Command line flags are applied last by the CLI.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::engines::EngineId;
use crate::error::{BenchError, Result};
use crate::harness::{HarnessSettings, DEFAULT_MEASURED_ITERATIONS, DEFAULT_WARMUP_ITERATIONS};
use crate::suite::Variant;

pub const DEFAULT_ROWS: usize = 1_000_000;
pub const ENV_PREFIX: &str = "ENGINEBENCH_";

/// Main benchmark configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub run: RunSettings,
    pub output: OutputSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunSettings {
    pub suite: String,
    pub rows: usize,
    pub warmup: usize,
    pub iterations: usize,
    pub variant: Variant,
    pub engines: Vec<EngineId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Markdown report path; stdout when unset
    pub markdown: Option<PathBuf>,
    pub json: Option<PathBuf>,
    /// Prometheus text export path
    pub metrics: Option<PathBuf>,
    pub progress: bool,
}

/// Read by the CLI before any command runs; verbosity flags win
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// `EnvFilter` directive, e.g. `warn` or `enginebench=debug`
    pub level: String,
    pub json: bool,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            suite: "strings".to_string(),
            rows: DEFAULT_ROWS,
            warmup: DEFAULT_WARMUP_ITERATIONS,
            iterations: DEFAULT_MEASURED_ITERATIONS,
            variant: Variant::Baseline,
            engines: EngineId::ALL.to_vec(),
        }
    }
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            markdown: None,
            json: None,
            metrics: None,
            progress: true,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            json: false,
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Override fields from `ENGINEBENCH_*` environment variables
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_vars(|key| std::env::var(format!("{}{}", ENV_PREFIX, key)).ok())
    }

    /// Same as [`Config::apply_env`] with an explicit variable source
    pub fn apply_vars<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(suite) = lookup("SUITE") {
            self.run.suite = suite;
        }
        if let Some(rows) = lookup("ROWS") {
            self.run.rows = parse_count("ROWS", &rows)?;
        }
        if let Some(warmup) = lookup("WARMUP") {
            self.run.warmup = parse_count("WARMUP", &warmup)?;
        }
        if let Some(iterations) = lookup("ITERATIONS") {
            self.run.iterations = parse_count("ITERATIONS", &iterations)?;
        }
        if let Some(variant) = lookup("VARIANT") {
            self.run.variant = variant.parse()?;
        }
        if let Some(engines) = lookup("ENGINES") {
            self.run.engines = crate::engines::parse_engine_list(&engines)?;
        }
        if let Some(level) = lookup("LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(json) = lookup("LOG_JSON") {
            self.logging.json = parse_flag("LOG_JSON", &json)?;
        }
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.run.suite.trim().is_empty() {
            return Err(BenchError::config("suite name must not be empty"));
        }
        if self.run.rows == 0 {
            return Err(BenchError::config("rows must be greater than 0"));
        }
        if self.run.engines.is_empty() {
            return Err(BenchError::config("at least one engine must be configured"));
        }
        for (i, engine) in self.run.engines.iter().enumerate() {
            if self.run.engines[..i].contains(engine) {
                return Err(BenchError::config(format!(
                    "engine {} is listed more than once",
                    engine
                )));
            }
        }
        self.harness_settings().validate()
    }

    pub fn harness_settings(&self) -> HarnessSettings {
        HarnessSettings {
            warmup_iterations: self.run.warmup,
            measured_iterations: self.run.iterations,
        }
    }
}

fn parse_count(key: &str, value: &str) -> Result<usize> {
    value.trim().parse().map_err(|_| {
        BenchError::config(format!(
            "{}{} must be a non-negative integer, got '{}'",
            ENV_PREFIX, key, value
        ))
    })
}

fn parse_flag(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(BenchError::config(format!(
            "{}{} must be true or false, got '{}'",
            ENV_PREFIX, key, value
        ))),
    }
}
