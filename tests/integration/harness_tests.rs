use enginebench::metrics::Phase;
use enginebench::suites::{numeric, strings};
use enginebench::{BenchError, EngineAdapter, EngineId, HarnessSettings, TimingHarness, Variant};

use crate::fixtures::{
    assert_close, broken_template_suite, harness, ms, partially_supported_suite, trim_lower_suite,
    TEST_ROWS,
};
use crate::init_test_environment;
use crate::mocks::FakeEngine;

fn scenario_engines() -> (FakeEngine, FakeEngine) {
    let datafusion = FakeEngine::new(EngineId::DataFusion)
        .with_latency("trim(str_col)", ms(46.57))
        .with_latency("lower(str_col)", ms(44.93));
    let duckdb = FakeEngine::new(EngineId::DuckDb)
        .with_latency("trim(str_col)", ms(123.44))
        .with_latency("lower(str_col)", ms(63.10));
    (datafusion, duckdb)
}

#[test]
fn test_two_engine_string_scenario() {
    init_test_environment();
    let (datafusion, duckdb) = scenario_engines();
    let adapters = vec![datafusion.boxed(), duckdb.boxed()];

    let run = harness(2, 5)
        .run(&trim_lower_suite(), &adapters, TEST_ROWS, Variant::Baseline)
        .unwrap();

    assert_eq!(run.suite_name, "strings");
    assert_eq!(run.engines, vec![EngineId::DataFusion, EngineId::DuckDb]);
    assert!(run.recorded_at.is_some());

    let trim = run.row("trim").unwrap();
    assert_close(trim.mean_ms(EngineId::DataFusion).unwrap(), 46.57);
    assert_close(trim.mean_ms(EngineId::DuckDb).unwrap(), 123.44);
    assert_eq!(trim.winner, Some(EngineId::DataFusion));
    assert_eq!(format!("{:.2}", trim.speedup.unwrap()), "2.65");

    let lower = run.row("lower").unwrap();
    assert_eq!(lower.winner, Some(EngineId::DataFusion));
    assert_eq!(format!("{:.2}", lower.speedup.unwrap()), "1.40");

    assert_eq!(run.summary.functions_tested, 2);
    assert_eq!(run.summary.functions_compared, 2);
    assert_close(run.summary.total_ms(EngineId::DataFusion), 91.50);
    assert_close(run.summary.total_ms(EngineId::DuckDb), 186.54);
    assert_eq!(run.summary.wins(EngineId::DataFusion), 2);
    assert_eq!(run.summary.wins(EngineId::DuckDb), 0);
}

#[test]
fn test_warmup_iterations_are_discarded() {
    let datafusion = FakeEngine::new(EngineId::DataFusion).with_latency_sequence(
        "trim(str_col)",
        vec![ms(500.0), ms(400.0), ms(10.0), ms(12.0), ms(14.0)],
    );
    let adapters = vec![datafusion.boxed()];

    let run = harness(2, 3)
        .run(&trim_lower_suite(), &adapters, TEST_ROWS, Variant::Baseline)
        .unwrap();

    let trim = run.row("trim").unwrap();
    assert_close(trim.mean_ms(EngineId::DataFusion).unwrap(), 12.0);
    // single engine: nothing to compare against
    assert_eq!(trim.winner, None);
    assert_eq!(trim.speedup, None);

    assert_eq!(datafusion.executions_of("trim(str_col)"), 5);
    assert_eq!(datafusion.executions_of("lower(str_col)"), 5);
    assert_eq!(run.summary.functions_tested, 2);
    assert_eq!(run.summary.functions_compared, 0);
}

#[test]
fn test_zero_measured_iterations_rejected_before_any_engine_call() {
    let (datafusion, duckdb) = scenario_engines();
    let adapters = vec![datafusion.boxed(), duckdb.boxed()];

    let err = harness(2, 0)
        .run(&trim_lower_suite(), &adapters, TEST_ROWS, Variant::Baseline)
        .unwrap_err();

    assert!(matches!(err, BenchError::Configuration(_)));
    assert_eq!(datafusion.prepare_count(), 0);
    assert_eq!(duckdb.prepare_count(), 0);
    assert_eq!(datafusion.execution_count() + duckdb.execution_count(), 0);
}

#[test]
fn test_zero_warmup_is_allowed() {
    let datafusion = FakeEngine::new(EngineId::DataFusion);
    let adapters = vec![datafusion.boxed()];

    let run = harness(0, 1)
        .run(&trim_lower_suite(), &adapters, TEST_ROWS, Variant::Baseline)
        .unwrap();

    assert_eq!(run.warmup_iterations, 0);
    assert_eq!(datafusion.execution_count(), 2);
}

#[test]
fn test_zero_rows_rejected() {
    let datafusion = FakeEngine::new(EngineId::DataFusion);
    let adapters = vec![datafusion.boxed()];

    let err = harness(1, 1)
        .run(&trim_lower_suite(), &adapters, 0, Variant::Baseline)
        .unwrap_err();

    assert!(matches!(err, BenchError::Configuration(_)));
    assert_eq!(datafusion.prepare_count(), 0);
}

#[test]
fn test_engine_list_validation() {
    let empty: Vec<Box<dyn EngineAdapter>> = Vec::new();
    let err = harness(1, 1)
        .run(&trim_lower_suite(), &empty, TEST_ROWS, Variant::Baseline)
        .unwrap_err();
    assert!(matches!(err, BenchError::Configuration(_)));

    let datafusion = FakeEngine::new(EngineId::DataFusion);
    let twice = vec![datafusion.boxed(), datafusion.boxed()];
    let err = harness(1, 1)
        .run(&trim_lower_suite(), &twice, TEST_ROWS, Variant::Baseline)
        .unwrap_err();
    assert!(err.to_string().contains("configured twice"));
    assert_eq!(datafusion.prepare_count(), 0);
}

#[test]
fn test_template_error_surfaces_before_timing() {
    let (datafusion, duckdb) = scenario_engines();
    let adapters = vec![datafusion.boxed(), duckdb.boxed()];

    let err = harness(1, 1)
        .run(&broken_template_suite(), &adapters, TEST_ROWS, Variant::Baseline)
        .unwrap_err();

    match err {
        BenchError::Template {
            function, reason, ..
        } => {
            assert_eq!(function, "broken");
            assert!(reason.contains("missing"));
        }
        other => panic!("expected template error, got {}", other),
    }
    // upper renders fine but must not have been timed
    assert_eq!(datafusion.prepare_count(), 0);
    assert_eq!(datafusion.execution_count(), 0);
    assert_eq!(duckdb.execution_count(), 0);
}

#[test]
fn test_unsupported_function_is_excluded() {
    let datafusion = FakeEngine::new(EngineId::DataFusion)
        .with_latency("upper(str_col)", ms(5.0))
        .with_latency("to_hex(length(str_col))", ms(7.0));
    let duckdb = FakeEngine::new(EngineId::DuckDb).with_latency("upper(str_col)", ms(4.0));
    let adapters = vec![datafusion.boxed(), duckdb.boxed()];

    let run = harness(1, 2)
        .run(&partially_supported_suite(), &adapters, TEST_ROWS, Variant::Baseline)
        .unwrap();

    let to_hex = run.row("to_hex").unwrap();
    assert_close(to_hex.mean_ms(EngineId::DataFusion).unwrap(), 7.0);
    assert_eq!(to_hex.mean_ms(EngineId::DuckDb), None);
    assert_eq!(to_hex.winner, None);
    assert_eq!(to_hex.speedup, None);

    // never sent to the engine that lacks it
    assert!(duckdb.executed().iter().all(|sql| !sql.contains("to_hex")));

    assert_eq!(run.summary.functions_tested, 2);
    assert_eq!(run.summary.functions_compared, 1);
    assert_eq!(run.summary.wins(EngineId::DuckDb), 1);
    assert_close(run.summary.total_ms(EngineId::DuckDb), 4.0);
    assert_close(run.summary.total_ms(EngineId::DataFusion), 12.0);
}

#[test]
fn test_execution_failure_empties_one_cell() {
    let datafusion = FakeEngine::new(EngineId::DataFusion)
        .with_latency("trim(str_col)", ms(3.0))
        .with_latency("lower(str_col)", ms(3.0));
    let duckdb = FakeEngine::new(EngineId::DuckDb)
        .failing_on("trim(str_col)")
        .with_latency("lower(str_col)", ms(2.0));
    let adapters = vec![datafusion.boxed(), duckdb.boxed()];

    let harness = harness(2, 5);
    let run = harness
        .run(&trim_lower_suite(), &adapters, TEST_ROWS, Variant::Baseline)
        .unwrap();

    let trim = run.row("trim").unwrap();
    assert_eq!(trim.mean_ms(EngineId::DuckDb), None);
    assert_eq!(trim.winner, None);
    // the first failure stops that cell
    assert_eq!(duckdb.executions_of("trim(str_col)"), 1);

    let lower = run.row("lower").unwrap();
    assert_eq!(lower.winner, Some(EngineId::DuckDb));
    assert_close(lower.speedup.unwrap(), 1.5);

    assert_eq!(harness.metrics().errors(EngineId::DuckDb), 1);
    assert_eq!(harness.metrics().errors(EngineId::DataFusion), 0);
}

#[test]
fn test_prepare_failure_aborts_run() {
    let datafusion = FakeEngine::new(EngineId::DataFusion);
    let duckdb = FakeEngine::new(EngineId::DuckDb).failing_prepare();
    let adapters = vec![datafusion.boxed(), duckdb.boxed()];

    let err = harness(1, 1)
        .run(&trim_lower_suite(), &adapters, TEST_ROWS, Variant::Baseline)
        .unwrap_err();

    assert!(matches!(err, BenchError::EngineSetup { engine: EngineId::DuckDb, .. }));
    assert_eq!(datafusion.execution_count(), 0);
}

#[test]
fn test_row_count_mismatch_still_recorded() {
    let datafusion = FakeEngine::new(EngineId::DataFusion)
        .with_rows(1)
        .with_default_latency(ms(2.0));
    let adapters = vec![datafusion.boxed()];

    let run = harness(0, 2)
        .run(&trim_lower_suite(), &adapters, TEST_ROWS, Variant::Baseline)
        .unwrap();

    assert_close(run.row("trim").unwrap().mean_ms(EngineId::DataFusion).unwrap(), 2.0);
}

#[test]
fn test_rows_follow_registration_order() {
    let suite = strings::suite();
    let datafusion = FakeEngine::new(EngineId::DataFusion);
    let duckdb = FakeEngine::new(EngineId::DuckDb);
    let adapters = vec![duckdb.boxed(), datafusion.boxed()];

    let run = harness(0, 1)
        .run(&suite, &adapters, TEST_ROWS, Variant::StringView)
        .unwrap();

    let expected: Vec<&str> = suite.functions().iter().map(|f| f.name()).collect();
    let actual: Vec<&str> = run.rows.iter().map(|r| r.function_name.as_str()).collect();
    assert_eq!(actual, expected);
    assert_eq!(run.engines, vec![EngineId::DuckDb, EngineId::DataFusion]);
    assert_eq!(run.variant, Variant::StringView);

    // function-major: each engine runs trim, then ltrim, in suite order
    for engine in [&duckdb, &datafusion] {
        let first_two: Vec<String> = engine.executed().into_iter().take(2).collect();
        assert_eq!(
            first_two,
            vec![
                "SELECT trim(str_col) FROM bench_data".to_string(),
                "SELECT ltrim(str_col) FROM bench_data".to_string(),
            ]
        );
    }
}

#[test]
fn test_unsupported_variant_falls_back_to_baseline() {
    let datafusion = FakeEngine::new(EngineId::DataFusion);
    let adapters = vec![datafusion.boxed()];

    let run = harness(0, 1)
        .run(&numeric::suite(), &adapters, TEST_ROWS, Variant::StringView)
        .unwrap();

    assert_eq!(run.variant, Variant::Baseline);
    assert_eq!(run.rows.len(), numeric::suite().functions().len());
}

#[test]
fn test_metrics_count_every_iteration() {
    let (datafusion, duckdb) = scenario_engines();
    let adapters = vec![datafusion.boxed(), duckdb.boxed()];
    let harness = TimingHarness::new(HarnessSettings::default()).unwrap();

    harness
        .run(&trim_lower_suite(), &adapters, TEST_ROWS, Variant::Baseline)
        .unwrap();

    let metrics = harness.metrics();
    for engine in [EngineId::DataFusion, EngineId::DuckDb] {
        assert_eq!(metrics.iterations(engine, Phase::Warmup), 4);
        assert_eq!(metrics.iterations(engine, Phase::Measured), 10);
    }
    let text = metrics.export_text().unwrap();
    assert!(text.contains("enginebench_iteration_seconds"));
}
