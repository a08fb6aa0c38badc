//! Conditional expression suite: CASE, NULL handling, boolean logic and
//! comparison operators over an integer column and a sparse nullable one.

use std::sync::Arc;

use datafusion::arrow::array::{ArrayRef, Int64Array};
use datafusion::arrow::datatypes::{Field, Schema};
use datafusion::arrow::record_batch::RecordBatch;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::dataset::DEFAULT_SEED;
use crate::definition::BenchmarkFunction;
use crate::error::Result;
use crate::suite::{LogicalType, Suite, Variant};

const VALUE_COLUMN: &str = "val_col";
const NULLABLE_COLUMN: &str = "nullable_col";
const NULL_DENSITY: f64 = 0.3;

pub fn suite() -> Suite {
    Suite::builder("conditional", generate)
        .description("Conditional expression benchmarks")
        .column(VALUE_COLUMN, LogicalType::Int64)
        .nullable_column(NULLABLE_COLUMN, LogicalType::Int64)
        .placeholder("col", VALUE_COLUMN)
        .placeholder("nullable", NULLABLE_COLUMN)
        .functions(functions())
        .build()
}

fn functions() -> Vec<BenchmarkFunction> {
    vec![
        // CASE
        BenchmarkFunction::portable(
            "case_simple",
            "CASE {col} WHEN 1 THEN 'one' WHEN 2 THEN 'two' ELSE 'other' END",
        ),
        BenchmarkFunction::portable(
            "case_searched",
            "CASE WHEN {col} < 0 THEN 'negative' WHEN {col} = 0 THEN 'zero' ELSE 'positive' END",
        ),
        BenchmarkFunction::portable(
            "case_many_branches",
            "CASE WHEN {col} < -50 THEN 'a' WHEN {col} < -25 THEN 'b' WHEN {col} < 0 THEN 'c' \
             WHEN {col} < 25 THEN 'd' WHEN {col} < 50 THEN 'e' ELSE 'f' END",
        ),
        BenchmarkFunction::portable(
            "case_nested",
            "CASE WHEN {col} > 0 THEN CASE WHEN {col} > 50 THEN 'high' ELSE 'low' END ELSE 'negative' END",
        ),
        // NULL handling
        BenchmarkFunction::portable("coalesce_2", "COALESCE({nullable}, 0)"),
        BenchmarkFunction::portable("coalesce_3", "COALESCE({nullable}, {col}, 0)"),
        BenchmarkFunction::portable(
            "coalesce_many",
            "COALESCE({nullable}, NULL, NULL, {col}, 0)",
        ),
        BenchmarkFunction::portable("nullif", "NULLIF({col}, 0)"),
        BenchmarkFunction::portable("nullif_expr", "NULLIF({col} % 10, 5)"),
        BenchmarkFunction::portable("ifnull", "IFNULL({nullable}, -1)"),
        BenchmarkFunction::dialects("nvl", "NVL({nullable}, -1)", "IFNULL({nullable}, -1)"),
        // comparison functions
        BenchmarkFunction::portable("greatest_2", "GREATEST({col}, {col} * -1)"),
        BenchmarkFunction::portable("greatest_3", "GREATEST({col}, 0, -100)"),
        BenchmarkFunction::portable("least_2", "LEAST({col}, {col} * -1)"),
        BenchmarkFunction::portable("least_3", "LEAST({col}, 0, 100)"),
        // boolean logic
        BenchmarkFunction::portable("and_simple", "{col} > 0 AND {col} < 50"),
        BenchmarkFunction::portable("or_simple", "{col} < -50 OR {col} > 50"),
        BenchmarkFunction::portable("not", "NOT ({col} > 0)"),
        BenchmarkFunction::portable(
            "and_or_mixed",
            "({col} > 0 AND {col} < 50) OR {col} < -50",
        ),
        BenchmarkFunction::portable(
            "complex_bool",
            "({col} > 0 AND {col} < 25) OR ({col} < 0 AND {col} > -25) OR {col} = 0",
        ),
        // comparison operators
        BenchmarkFunction::portable("eq", "{col} = 0"),
        BenchmarkFunction::portable("neq", "{col} <> 0"),
        BenchmarkFunction::portable("lt", "{col} < 0"),
        BenchmarkFunction::portable("lte", "{col} <= 0"),
        BenchmarkFunction::portable("gt", "{col} > 0"),
        BenchmarkFunction::portable("gte", "{col} >= 0"),
        // BETWEEN / IN
        BenchmarkFunction::portable("between", "{col} BETWEEN -50 AND 50"),
        BenchmarkFunction::portable("not_between", "{col} NOT BETWEEN -25 AND 25"),
        BenchmarkFunction::portable("in_list_small", "{col} IN (1, 2, 3, 4, 5)"),
        BenchmarkFunction::portable(
            "in_list_medium",
            "{col} IN (1, 2, 3, 4, 5, 6, 7, 8, 9, 10)",
        ),
        BenchmarkFunction::portable("not_in", "{col} NOT IN (1, 2, 3, 4, 5)"),
        // NULL checks
        BenchmarkFunction::portable("is_null", "{nullable} IS NULL"),
        BenchmarkFunction::portable("is_not_null", "{nullable} IS NOT NULL"),
        // IF: DuckDB has it natively, DataFusion spells it as CASE
        BenchmarkFunction::dialects(
            "if_simple",
            "CASE WHEN {col} > 0 THEN 'positive' ELSE 'non-positive' END",
            "IF({col} > 0, 'positive', 'non-positive')",
        ),
        BenchmarkFunction::dialects(
            "if_numeric",
            "CASE WHEN {col} > 0 THEN {col} ELSE 0 END",
            "IF({col} > 0, {col}, 0)",
        ),
        BenchmarkFunction::dialects(
            "if_nested",
            "CASE WHEN {col} > 0 THEN CASE WHEN {col} > 50 THEN 'high' ELSE 'low' END ELSE 'negative' END",
            "IF({col} > 0, IF({col} > 50, 'high', 'low'), 'negative')",
        ),
    ]
}

pub fn generate(rows: usize, _variant: Variant) -> Result<RecordBatch> {
    let mut rng = StdRng::seed_from_u64(DEFAULT_SEED);

    let mut values = Vec::with_capacity(rows);
    let mut nullable = Vec::with_capacity(rows);
    for _ in 0..rows {
        values.push(rng.gen_range(-100i64..=100));
        if rng.gen_bool(NULL_DENSITY) {
            nullable.push(None);
        } else {
            nullable.push(Some(rng.gen_range(-100i64..=100)));
        }
    }

    let schema = Arc::new(Schema::new(vec![
        Field::new(VALUE_COLUMN, LogicalType::Int64.arrow_type(Variant::Baseline), false),
        Field::new(NULLABLE_COLUMN, LogicalType::Int64.arrow_type(Variant::Baseline), true),
    ]));
    let columns: Vec<ArrayRef> = vec![
        Arc::new(Int64Array::from(values)),
        Arc::new(Int64Array::from(nullable)),
    ];
    Ok(RecordBatch::try_new(schema, columns)?)
}
