//! String function suite

use std::sync::Arc;

use datafusion::arrow::datatypes::{Field, Schema};
use datafusion::arrow::record_batch::RecordBatch;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::dataset::{text_array, DEFAULT_SEED};
use crate::definition::BenchmarkFunction;
use crate::error::Result;
use crate::suite::{LogicalType, Suite, Variant};

const COLUMN: &str = "str_col";
const LOWERCASE: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const MIXED: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789 ";

pub fn suite() -> Suite {
    Suite::builder("strings", generate)
        .description("String function benchmarks")
        .column(COLUMN, LogicalType::Utf8)
        .placeholder("col", COLUMN)
        .variants(&[Variant::Baseline, Variant::StringView])
        .functions(functions())
        .build()
}

fn functions() -> Vec<BenchmarkFunction> {
    vec![
        BenchmarkFunction::portable("trim", "trim({col})"),
        BenchmarkFunction::portable("ltrim", "ltrim({col})"),
        BenchmarkFunction::portable("rtrim", "rtrim({col})"),
        BenchmarkFunction::portable("lower", "lower({col})"),
        BenchmarkFunction::portable("upper", "upper({col})"),
        BenchmarkFunction::portable("length", "length({col})"),
        BenchmarkFunction::dialects("char_length", "char_length({col})", "length({col})"),
        BenchmarkFunction::portable("reverse", "reverse({col})"),
        BenchmarkFunction::portable("repeat_3", "repeat({col}, 3)"),
        BenchmarkFunction::portable("concat", "concat({col}, {col})"),
        BenchmarkFunction::portable("concat_ws", "concat_ws('-', {col}, {col})"),
        BenchmarkFunction::portable("substring_1_5", "substring({col}, 1, 5)"),
        BenchmarkFunction::portable("left_5", "left({col}, 5)"),
        BenchmarkFunction::portable("right_5", "right({col}, 5)"),
        BenchmarkFunction::portable("lpad_20", "lpad({col}, 20, '*')"),
        BenchmarkFunction::portable("rpad_20", "rpad({col}, 20, '*')"),
        BenchmarkFunction::portable("replace", "replace({col}, 'a', 'X')"),
        BenchmarkFunction::portable("translate", "translate({col}, 'aeiou', '12345')"),
        BenchmarkFunction::portable("ascii", "ascii({col})"),
        BenchmarkFunction::portable("md5", "md5({col})"),
        BenchmarkFunction::portable("sha256", "sha256({col})"),
        BenchmarkFunction::dialects("btrim", "btrim({col}, ' ')", "trim({col}, ' ')"),
        BenchmarkFunction::portable("split_part", "split_part({col}, ' ', 1)"),
        BenchmarkFunction::portable("starts_with", "starts_with({col}, 'test')"),
        BenchmarkFunction::portable("ends_with", "ends_with({col}, 'data')"),
        BenchmarkFunction::portable("strpos", "strpos({col}, 'e')"),
        BenchmarkFunction::dialects(
            "regexp_replace",
            "regexp_replace({col}, '[aeiou]', '*')",
            "regexp_replace({col}, '[aeiou]', '*', 'g')",
        ),
    ]
}

fn random_string(rng: &mut StdRng, alphabet: &[u8], len: usize) -> String {
    (0..len)
        .map(|_| alphabet[rng.gen_range(0..alphabet.len())] as char)
        .collect()
}

/// Five interleaved patterns: padded, long lowercase, mixed case with
/// digits, phrase-like, and random length alphanumerics with spaces.
pub fn generate(rows: usize, variant: Variant) -> Result<RecordBatch> {
    let mut rng = StdRng::seed_from_u64(DEFAULT_SEED);

    let values: Vec<String> = (0..rows)
        .map(|i| match i % 5 {
            0 => format!("  test_{}  ", i % 1000),
            1 => random_string(&mut rng, LOWERCASE, 20),
            2 => format!("TestData_{}_Value", i),
            3 => format!("hello world {} data", i % 100),
            _ => {
                let len = rng.gen_range(5..=50);
                random_string(&mut rng, MIXED, len)
            }
        })
        .collect();

    let schema = Arc::new(Schema::new(vec![Field::new(
        COLUMN,
        LogicalType::Utf8.arrow_type(variant),
        false,
    )]));
    Ok(RecordBatch::try_new(schema, vec![text_array(values, variant)?])?)
}
