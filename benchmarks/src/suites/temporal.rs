//! Date/time function suite

use std::sync::Arc;

use datafusion::arrow::array::{ArrayRef, TimestampMicrosecondArray};
use datafusion::arrow::datatypes::{Field, Schema};
use datafusion::arrow::record_batch::RecordBatch;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::dataset::DEFAULT_SEED;
use crate::definition::BenchmarkFunction;
use crate::error::Result;
use crate::suite::{LogicalType, Suite, Variant};

const COLUMN: &str = "ts_col";

/// 2020-01-01T00:00:00Z
const BASE_MICROS: i64 = 1_577_836_800_000_000;
const MAX_DAYS: i64 = 365 * 5;
const MICROS_PER_SECOND: i64 = 1_000_000;
const MICROS_PER_MINUTE: i64 = 60 * MICROS_PER_SECOND;
const MICROS_PER_HOUR: i64 = 60 * MICROS_PER_MINUTE;
const MICROS_PER_DAY: i64 = 24 * MICROS_PER_HOUR;
const BUSINESS_HOURS: [i64; 9] = [9, 10, 11, 12, 13, 14, 15, 16, 17];

pub fn suite() -> Suite {
    Suite::builder("temporal", generate)
        .description("Date/time function benchmarks")
        .column(COLUMN, LogicalType::TimestampMicros)
        .placeholder("col", COLUMN)
        .functions(functions())
        .build()
}

fn functions() -> Vec<BenchmarkFunction> {
    vec![
        // extraction
        BenchmarkFunction::dialects("year", "date_part('year', {col})", "year({col})"),
        BenchmarkFunction::dialects("month", "date_part('month', {col})", "month({col})"),
        BenchmarkFunction::dialects("day", "date_part('day', {col})", "day({col})"),
        BenchmarkFunction::dialects("hour", "date_part('hour', {col})", "hour({col})"),
        BenchmarkFunction::dialects("minute", "date_part('minute', {col})", "minute({col})"),
        BenchmarkFunction::dialects("second", "date_part('second', {col})", "second({col})"),
        BenchmarkFunction::dialects("week", "date_part('week', {col})", "week({col})"),
        BenchmarkFunction::dialects("quarter", "date_part('quarter', {col})", "quarter({col})"),
        BenchmarkFunction::dialects("day_of_week", "extract(dow from {col})", "dayofweek({col})"),
        BenchmarkFunction::dialects("day_of_year", "extract(doy from {col})", "dayofyear({col})"),
        // truncation
        BenchmarkFunction::portable("date_trunc_day", "date_trunc('day', {col})"),
        BenchmarkFunction::portable("date_trunc_month", "date_trunc('month', {col})"),
        BenchmarkFunction::portable("date_trunc_year", "date_trunc('year', {col})"),
        BenchmarkFunction::portable("date_trunc_hour", "date_trunc('hour', {col})"),
        // arithmetic
        BenchmarkFunction::portable("date_add_days", "{col} + interval '7 days'"),
        BenchmarkFunction::portable("date_sub_days", "{col} - interval '7 days'"),
        BenchmarkFunction::portable("date_add_months", "{col} + interval '1 month'"),
        // formatting
        BenchmarkFunction::dialects(
            "to_char",
            "to_char({col}, '%Y-%m-%d')",
            "strftime({col}, '%Y-%m-%d')",
        ),
        BenchmarkFunction::portable("date_part_hour", "date_part('hour', {col})"),
        BenchmarkFunction::portable("date_part_minute", "date_part('minute', {col})"),
        BenchmarkFunction::portable("is_past", "{col} < now()"),
    ]
}

/// Four interleaved patterns over a five year window: arbitrary instants,
/// midnights, business hours and a one-second time series.
pub fn generate(rows: usize, _variant: Variant) -> Result<RecordBatch> {
    let mut rng = StdRng::seed_from_u64(DEFAULT_SEED);

    let values: Vec<i64> = (0..rows)
        .map(|i| {
            let day = |rng: &mut StdRng| rng.gen_range(0..=MAX_DAYS) * MICROS_PER_DAY;
            match i % 4 {
                0 => {
                    let d = day(&mut rng);
                    let h = rng.gen_range(0..24) * MICROS_PER_HOUR;
                    let m = rng.gen_range(0..60) * MICROS_PER_MINUTE;
                    let s = rng.gen_range(0..60) * MICROS_PER_SECOND;
                    BASE_MICROS + d + h + m + s
                }
                1 => BASE_MICROS + day(&mut rng),
                2 => {
                    let d = day(&mut rng);
                    let h = BUSINESS_HOURS.choose(&mut rng).copied().unwrap_or(9);
                    BASE_MICROS + d + h * MICROS_PER_HOUR
                }
                _ => BASE_MICROS + i as i64 * MICROS_PER_SECOND,
            }
        })
        .collect();

    let schema = Arc::new(Schema::new(vec![Field::new(
        COLUMN,
        LogicalType::TimestampMicros.arrow_type(Variant::Baseline),
        false,
    )]));
    let column: ArrayRef = Arc::new(TimestampMicrosecondArray::from(values));
    Ok(RecordBatch::try_new(schema, vec![column])?)
}
