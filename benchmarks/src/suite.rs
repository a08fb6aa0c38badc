//! Suites: named groups of benchmark functions sharing one dataset shape

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use datafusion::arrow::datatypes::{DataType, Field, Schema, TimeUnit};
use datafusion::arrow::record_batch::RecordBatch;
use serde::{Deserialize, Serialize};

use crate::definition::{render_template, BenchmarkFunction, EngineTemplate};
use crate::engines::{EngineId, TABLE_NAME};
use crate::error::{BenchError, Result};

/// Physical representation of textual columns
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    /// Regular offset-based `Utf8` strings
    #[default]
    Baseline,
    /// Arrow `Utf8View` strings; logical values are unchanged
    StringView,
}

impl Variant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Baseline => "baseline",
            Variant::StringView => "string_view",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Variant {
    type Err = BenchError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "baseline" | "string" => Ok(Variant::Baseline),
            "string_view" | "stringview" => Ok(Variant::StringView),
            other => Err(BenchError::config(format!("unknown variant '{}'", other))),
        }
    }
}

/// Logical column types a suite can declare
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalType {
    Utf8,
    Int64,
    Float64,
    TimestampMicros,
}

impl LogicalType {
    /// Arrow type for this logical type under a variant
    pub fn arrow_type(&self, variant: Variant) -> DataType {
        match (self, variant) {
            (LogicalType::Utf8, Variant::Baseline) => DataType::Utf8,
            (LogicalType::Utf8, Variant::StringView) => DataType::Utf8View,
            (LogicalType::Int64, _) => DataType::Int64,
            (LogicalType::Float64, _) => DataType::Float64,
            (LogicalType::TimestampMicros, _) => {
                DataType::Timestamp(TimeUnit::Microsecond, None)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpec {
    pub name: String,
    pub logical_type: LogicalType,
    pub nullable: bool,
}

/// Builds the suite's table for `(row_count, variant)`; must be deterministic
pub type GenerateFn = fn(usize, Variant) -> Result<RecordBatch>;

/// A named collection of benchmark functions over one synthetic table
#[derive(Clone)]
pub struct Suite {
    name: String,
    description: String,
    columns: Vec<ColumnSpec>,
    placeholders: Vec<(String, String)>,
    variants: Vec<Variant>,
    generator: GenerateFn,
    functions: Vec<BenchmarkFunction>,
}

impl fmt::Debug for Suite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Suite")
            .field("name", &self.name)
            .field("columns", &self.columns)
            .field("placeholders", &self.placeholders)
            .field("variants", &self.variants)
            .field("functions", &self.functions.len())
            .finish()
    }
}

impl Suite {
    pub fn builder(name: impl Into<String>, generator: GenerateFn) -> SuiteBuilder {
        SuiteBuilder {
            suite: Suite {
                name: name.into(),
                description: String::new(),
                columns: Vec::new(),
                placeholders: Vec::new(),
                variants: vec![Variant::Baseline],
                generator,
                functions: Vec::new(),
            },
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    pub fn placeholders(&self) -> &[(String, String)] {
        &self.placeholders
    }

    pub fn functions(&self) -> &[BenchmarkFunction] {
        &self.functions
    }

    pub fn variants(&self) -> &[Variant] {
        &self.variants
    }

    /// The first declared variant
    pub fn baseline_variant(&self) -> Variant {
        self.variants.first().copied().unwrap_or_default()
    }

    pub fn supports(&self, variant: Variant) -> bool {
        self.variants.contains(&variant)
    }

    /// Requested variant if supported, otherwise the suite's baseline
    pub fn resolve_variant(&self, requested: Variant) -> Variant {
        if self.supports(requested) {
            requested
        } else {
            let baseline = self.baseline_variant();
            tracing::warn!(
                suite = %self.name,
                requested = %requested,
                using = %baseline,
                "variant not supported by suite, falling back to baseline"
            );
            baseline
        }
    }

    /// Arrow schema the generator must produce under `variant`
    pub fn schema(&self, variant: Variant) -> Schema {
        Schema::new(
            self.columns
                .iter()
                .map(|c| Field::new(&c.name, c.logical_type.arrow_type(variant), c.nullable))
                .collect::<Vec<_>>(),
        )
    }

    pub(crate) fn generate_batch(&self, row_count: usize, variant: Variant) -> Result<RecordBatch> {
        (self.generator)(row_count, variant)
    }

    /// Structural checks run at registration time
    pub fn validate(&self) -> Result<()> {
        if self.columns.is_empty() {
            return Err(BenchError::config(format!(
                "suite {} declares no columns",
                self.name
            )));
        }

        for (placeholder, column) in &self.placeholders {
            if !self.columns.iter().any(|c| &c.name == column) {
                return Err(BenchError::config(format!(
                    "suite {}: placeholder '{}' is bound to undeclared column '{}'",
                    self.name, placeholder, column
                )));
            }
        }

        let mut seen = HashSet::new();
        for function in &self.functions {
            if !seen.insert(function.name()) {
                return Err(BenchError::DuplicateFunction {
                    suite: self.name.clone(),
                    function: function.name().to_string(),
                });
            }
            if let Some(engine) = function.missing_engine() {
                return Err(BenchError::IncompleteTemplates {
                    suite: self.name.clone(),
                    function: function.name().to_string(),
                    engine,
                });
            }
            for engine in EngineId::ALL {
                self.render_statement(function, engine)?;
            }
        }

        Ok(())
    }

    /// Full statement for one function on one engine.
    ///
    /// `Ok(None)` when the function is marked unsupported on that engine.
    pub fn render_statement(
        &self,
        function: &BenchmarkFunction,
        engine: EngineId,
    ) -> Result<Option<String>> {
        match function.template(engine) {
            Some(EngineTemplate::Sql(template)) => {
                let expr = render_template(template, &self.placeholders).map_err(|reason| {
                    BenchError::Template {
                        suite: self.name.clone(),
                        function: function.name().to_string(),
                        engine,
                        reason,
                    }
                })?;
                Ok(Some(format!("SELECT {} FROM {}", expr, TABLE_NAME)))
            }
            Some(EngineTemplate::Unsupported) | None => Ok(None),
        }
    }
}

/// Builder for [`Suite`]
pub struct SuiteBuilder {
    suite: Suite,
}

impl SuiteBuilder {
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.suite.description = description.into();
        self
    }

    pub fn column(mut self, name: impl Into<String>, logical_type: LogicalType) -> Self {
        self.suite.columns.push(ColumnSpec {
            name: name.into(),
            logical_type,
            nullable: false,
        });
        self
    }

    pub fn nullable_column(mut self, name: impl Into<String>, logical_type: LogicalType) -> Self {
        self.suite.columns.push(ColumnSpec {
            name: name.into(),
            logical_type,
            nullable: true,
        });
        self
    }

    /// Bind `{placeholder}` in templates to a declared column
    pub fn placeholder(mut self, placeholder: impl Into<String>, column: impl Into<String>) -> Self {
        self.suite
            .placeholders
            .push((placeholder.into(), column.into()));
        self
    }

    /// Supported variants; the first one is the baseline
    pub fn variants(mut self, variants: &[Variant]) -> Self {
        if !variants.is_empty() {
            self.suite.variants = variants.to_vec();
        }
        self
    }

    pub fn function(mut self, function: BenchmarkFunction) -> Self {
        self.suite.functions.push(function);
        self
    }

    pub fn functions(mut self, functions: impl IntoIterator<Item = BenchmarkFunction>) -> Self {
        self.suite.functions.extend(functions);
        self
    }

    pub fn build(self) -> Suite {
        self.suite
    }
}
