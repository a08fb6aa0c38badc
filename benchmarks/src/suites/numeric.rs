//! Math and numeric function suite

use std::sync::Arc;

use datafusion::arrow::array::{ArrayRef, Float64Array};
use datafusion::arrow::datatypes::{Field, Schema};
use datafusion::arrow::record_batch::RecordBatch;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

use crate::dataset::DEFAULT_SEED;
use crate::definition::BenchmarkFunction;
use crate::error::{BenchError, Result};
use crate::suite::{LogicalType, Suite, Variant};

const COLUMN: &str = "num_col";

pub fn suite() -> Suite {
    Suite::builder("numeric", generate)
        .description("Math and numeric function benchmarks")
        .column(COLUMN, LogicalType::Float64)
        .placeholder("col", COLUMN)
        .functions(functions())
        .build()
}

fn functions() -> Vec<BenchmarkFunction> {
    vec![
        // basic
        BenchmarkFunction::portable("abs", "abs({col})"),
        BenchmarkFunction::portable("ceil", "ceil({col})"),
        BenchmarkFunction::portable("floor", "floor({col})"),
        BenchmarkFunction::portable("round", "round({col}, 2)"),
        BenchmarkFunction::portable("trunc", "trunc({col})"),
        BenchmarkFunction::dialects("signum", "signum({col})", "sign({col})"),
        // powers and roots
        BenchmarkFunction::portable("sqrt", "sqrt(abs({col}))"),
        BenchmarkFunction::portable("cbrt", "cbrt({col})"),
        BenchmarkFunction::portable("power", "power({col}, 2)"),
        BenchmarkFunction::portable("exp", "exp({col} / 100)"),
        // logarithms
        BenchmarkFunction::portable("ln", "ln(abs({col}) + 1)"),
        BenchmarkFunction::portable("log10", "log10(abs({col}) + 1)"),
        BenchmarkFunction::portable("log2", "log2(abs({col}) + 1)"),
        BenchmarkFunction::portable("log", "log(2, abs({col}) + 1)"),
        // trigonometry
        BenchmarkFunction::portable("sin", "sin({col})"),
        BenchmarkFunction::portable("cos", "cos({col})"),
        BenchmarkFunction::portable("tan", "tan({col})"),
        BenchmarkFunction::portable("asin", "asin(sin({col}))"),
        BenchmarkFunction::portable("acos", "acos(cos({col}))"),
        BenchmarkFunction::portable("atan", "atan({col})"),
        BenchmarkFunction::portable("atan2", "atan2({col}, {col} + 1)"),
        BenchmarkFunction::portable("sinh", "sinh({col} / 100)"),
        BenchmarkFunction::portable("cosh", "cosh({col} / 100)"),
        BenchmarkFunction::portable("tanh", "tanh({col})"),
        BenchmarkFunction::portable("degrees", "degrees({col})"),
        BenchmarkFunction::portable("radians", "radians({col})"),
        BenchmarkFunction::portable("pi_mult", "pi() * {col}"),
        // integer arithmetic
        BenchmarkFunction::portable("mod", "CAST({col} AS BIGINT) % 7"),
        BenchmarkFunction::portable("gcd", "gcd(CAST({col} AS BIGINT), 12)"),
        BenchmarkFunction::portable("lcm", "lcm(CAST(abs({col}) AS BIGINT) % 1000 + 1, 12)"),
        BenchmarkFunction::dialects(
            "factorial",
            "factorial(CAST(abs({col}) AS BIGINT) % 20)",
            "factorial(CAST(abs({col}) AS INTEGER) % 20)",
        ),
        // comparison
        BenchmarkFunction::portable("greatest", "greatest({col}, {col} * 2, 0)"),
        BenchmarkFunction::portable("least", "least({col}, {col} * 2, 0)"),
        BenchmarkFunction::portable("coalesce", "coalesce({col}, 0)"),
        BenchmarkFunction::portable("nullif", "nullif({col}, 0)"),
        // bitwise
        BenchmarkFunction::portable("bit_and", "CAST({col} AS BIGINT) & 255"),
        BenchmarkFunction::portable("bit_or", "CAST({col} AS BIGINT) | 255"),
        BenchmarkFunction::dialects(
            "bit_xor",
            "CAST({col} AS BIGINT) ^ 255",
            "xor(CAST({col} AS BIGINT), 255)",
        ),
    ]
}

/// Five interleaved distributions: small integers, large integers, uniform
/// decimals, the unit interval and a normal spread around zero.
pub fn generate(rows: usize, _variant: Variant) -> Result<RecordBatch> {
    let mut rng = StdRng::seed_from_u64(DEFAULT_SEED);
    let normal = Normal::new(0.0, 500.0)
        .map_err(|e| BenchError::config(format!("invalid normal distribution: {}", e)))?;

    let values: Vec<f64> = (0..rows)
        .map(|i| match i % 5 {
            0 => rng.gen_range(-100..=100) as f64,
            1 => rng.gen_range(-10_000..=10_000) as f64,
            2 => rng.gen_range(-1000.0..1000.0),
            3 => rng.gen_range(-1.0..1.0),
            _ => normal.sample(&mut rng),
        })
        .collect();

    let schema = Arc::new(Schema::new(vec![Field::new(
        COLUMN,
        LogicalType::Float64.arrow_type(Variant::Baseline),
        false,
    )]));
    let column: ArrayRef = Arc::new(Float64Array::from(values));
    Ok(RecordBatch::try_new(schema, vec![column])?)
}
