use chrono::{TimeZone, Utc};
use enginebench::{report, Comparator, EngineId, Variant};

use crate::fixtures::{assert_close, harness, ms, partially_supported_suite, trim_lower_suite, TEST_ROWS};
use crate::mocks::FakeEngine;

#[test]
fn test_markdown_for_harness_run() {
    let datafusion = FakeEngine::new(EngineId::DataFusion)
        .with_latency("trim(str_col)", ms(46.57))
        .with_latency("lower(str_col)", ms(44.93));
    let duckdb = FakeEngine::new(EngineId::DuckDb)
        .with_latency("trim(str_col)", ms(123.44))
        .with_latency("lower(str_col)", ms(63.10));

    let run = harness(2, 5)
        .run(
            &trim_lower_suite(),
            &[datafusion.boxed(), duckdb.boxed()],
            TEST_ROWS,
            Variant::Baseline,
        )
        .unwrap()
        .with_recorded_at(Utc.with_ymd_and_hms(2024, 11, 2, 9, 30, 0).unwrap());

    let md = report::render_markdown(&run);
    assert!(md.starts_with("# strings benchmark results"));
    assert!(md.contains("**Rows:** 1,000"));
    assert!(md.contains("**Recorded:** 2024-11-02 09:30:00 UTC"));
    assert!(md.contains("| Function | DataFusion (ms) | DuckDB (ms) | Speedup | Winner |"));
    assert!(md.contains("| trim | 46.570 | 123.440 | 2.65x | DataFusion |"));
    assert!(md.contains("| lower | 44.930 | 63.100 | 1.40x | DataFusion |"));
    assert!(md.contains("- **Total DataFusion time:** 91.500 ms"));
    assert!(md.contains("- **Total DuckDB time:** 186.540 ms"));
}

#[test]
fn test_markdown_marks_unsupported_cells() {
    let datafusion = FakeEngine::new(EngineId::DataFusion).with_default_latency(ms(2.0));
    let duckdb = FakeEngine::new(EngineId::DuckDb).with_default_latency(ms(1.0));

    let run = harness(0, 1)
        .run(
            &partially_supported_suite(),
            &[datafusion.boxed(), duckdb.boxed()],
            TEST_ROWS,
            Variant::Baseline,
        )
        .unwrap();

    let md = report::render_markdown(&run);
    assert!(md.contains("| to_hex | 2.000 | unsupported | n/a | n/a |"));
    assert!(md.contains("| upper | 2.000 | 1.000 | 2.00x | DuckDB |"));
}

#[test]
fn test_json_document_shape() {
    let datafusion = FakeEngine::new(EngineId::DataFusion).with_default_latency(ms(2.0));
    let duckdb = FakeEngine::new(EngineId::DuckDb).with_default_latency(ms(1.0));

    let run = harness(0, 1)
        .run(
            &partially_supported_suite(),
            &[datafusion.boxed(), duckdb.boxed()],
            TEST_ROWS,
            Variant::Baseline,
        )
        .unwrap();

    let value: serde_json::Value = serde_json::from_slice(&report::to_json(&run).unwrap()).unwrap();
    assert_eq!(value["suite_name"], "strings");
    assert_eq!(value["row_count"], 1000);
    assert_eq!(value["engines"], serde_json::json!(["datafusion", "duckdb"]));

    let to_hex = &value["rows"][1];
    assert_eq!(to_hex["function_name"], "to_hex");
    assert!(to_hex["engines"]["duckdb"].is_null());
    assert!(to_hex["winner"].is_null());
    assert_eq!(value["rows"][0]["winner"], "duckdb");

    let back = report::from_json(&report::to_json(&run).unwrap()).unwrap();
    assert_eq!(back, run);
}

fn minimal_document(trim_datafusion: f64) -> String {
    format!(
        r#"{{
  "suite_name": "strings",
  "row_count": 1000000,
  "variant": "baseline",
  "rows": [
    {{
      "function_name": "trim",
      "engines": {{ "datafusion": {}, "duckdb": 123.44 }},
      "winner": "datafusion",
      "speedup": 2.65
    }},
    {{
      "function_name": "to_hex",
      "engines": {{ "datafusion": 7.5, "duckdb": null }},
      "winner": null,
      "speedup": null
    }}
  ],
  "summary": {{
    "per_engine_total_ms": {{ "datafusion": {}, "duckdb": 123.44 }},
    "per_engine_win_count": {{ "datafusion": 1, "duckdb": 0 }}
  }}
}}"#,
        trim_datafusion,
        trim_datafusion + 7.5
    )
}

#[test]
fn test_minimal_persisted_document_is_accepted() {
    let run = report::from_json(minimal_document(46.57).as_bytes()).unwrap();

    assert_eq!(run.suite_name, "strings");
    assert_eq!(run.variant, Variant::Baseline);
    assert_eq!(run.engines, vec![EngineId::DataFusion, EngineId::DuckDb]);
    assert_eq!(run.warmup_iterations, 2);
    assert_eq!(run.measured_iterations, 5);
    assert_eq!(run.recorded_at, None);

    assert_eq!(run.summary.functions_tested, 2);
    assert_eq!(run.summary.functions_compared, 1);
    assert_close(run.summary.total_ms(EngineId::DataFusion), 54.07);
    assert_eq!(run.summary.wins(EngineId::DataFusion), 1);
    assert_eq!(run.row("to_hex").unwrap().mean_ms(EngineId::DuckDb), None);

    // the summary keys alone are enough to render a report
    let md = report::render_markdown(&run);
    assert!(md.contains("| trim | 46.570 | 123.440 | 2.65x | DataFusion |"));
}

#[test]
fn test_minimal_persisted_documents_compare() {
    let runs = vec![
        (
            "v50".to_string(),
            report::from_json(minimal_document(17.67).as_bytes()).unwrap(),
        ),
        (
            "v51".to_string(),
            report::from_json(minimal_document(16.57).as_bytes()).unwrap(),
        ),
    ];

    let comparison = Comparator::new(EngineId::DataFusion).compare(&runs).unwrap();
    let trim = comparison.row("trim").unwrap();
    assert_eq!(format!("{:.3}", trim.speedups[1].unwrap()), "1.066");
    assert_close(comparison.row("to_hex").unwrap().speedups[1].unwrap(), 1.0);
}
