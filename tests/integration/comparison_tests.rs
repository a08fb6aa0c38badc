use enginebench::{report, BenchError, Comparator, EngineId, Variant};
use tempfile::TempDir;

use crate::fixtures::{assert_close, harness, ms, saved_run, trim_lower_suite, TEST_ROWS};
use crate::mocks::FakeEngine;

fn labeled(runs: Vec<(&str, enginebench::RunResult)>) -> Vec<(String, enginebench::RunResult)> {
    runs.into_iter().map(|(l, r)| (l.to_string(), r)).collect()
}

#[test]
fn test_compare_runs_saved_to_disk() {
    let dir = TempDir::new().unwrap();
    let mut paths = Vec::new();

    for (label, trim) in [("before", 20.0), ("after", 10.0)] {
        let datafusion = FakeEngine::new(EngineId::DataFusion)
            .with_latency("trim(str_col)", ms(trim))
            .with_latency("lower(str_col)", ms(8.0));
        let run = harness(1, 3)
            .run(&trim_lower_suite(), &[datafusion.boxed()], TEST_ROWS, Variant::Baseline)
            .unwrap();

        let path = dir.path().join(format!("{}.json", label));
        report::write_report(
            &String::from_utf8(report::to_json(&run).unwrap()).unwrap(),
            Some(path.as_path()),
        )
        .unwrap();
        paths.push((label, path));
    }

    let runs: Vec<(String, enginebench::RunResult)> = paths
        .iter()
        .map(|(label, path)| (label.to_string(), report::load_run(path).unwrap()))
        .collect();
    let comparison = enginebench::compare(&runs, EngineId::DataFusion).unwrap();

    assert_eq!(comparison.baseline, "before");
    let trim = comparison.row("trim").unwrap();
    assert_close(trim.speedups[1].unwrap(), 2.0);
    assert_close(trim.speedup_percent(1).unwrap(), 100.0);
    let lower = comparison.row("lower").unwrap();
    assert_close(lower.speedups[1].unwrap(), 1.0);

    assert_close(comparison.totals_ms[0], 28.0);
    assert_close(comparison.totals_ms[1], 18.0);
    assert_close(comparison.geomean_speedups[1].unwrap(), 2.0_f64.sqrt());
}

#[test]
fn test_partial_alignment_keeps_every_function() {
    let runs = labeled(vec![
        (
            "v50",
            saved_run("conditional", &[("case_2_branches", Some(17.67), Some(20.0))]),
        ),
        (
            "v51",
            saved_run(
                "conditional",
                &[
                    ("case_2_branches", Some(16.57), Some(20.0)),
                    ("nvl", Some(3.0), None),
                ],
            ),
        ),
    ]);

    let comparison = Comparator::new(EngineId::DataFusion).compare(&runs).unwrap();

    let names: Vec<&str> = comparison
        .rows
        .iter()
        .map(|r| r.function_name.as_str())
        .collect();
    assert_eq!(names, vec!["case_2_branches", "nvl"]);

    let nvl = comparison.row("nvl").unwrap();
    assert_eq!(nvl.means_ms, vec![None, Some(3.0)]);
    assert_eq!(nvl.speedups, vec![None, None]);

    let case = comparison.row("case_2_branches").unwrap();
    assert_eq!(format!("{:.3}", case.speedups[1].unwrap()), "1.066");
    // the missing function does not drag the geomean down
    assert_eq!(
        format!("{:.3}", comparison.geomean_speedups[1].unwrap()),
        "1.066"
    );
}

#[test]
fn test_other_engine_and_baseline_override() {
    let runs = labeled(vec![
        ("v50", saved_run("numeric", &[("abs", Some(1.0), Some(4.0))])),
        ("v51", saved_run("numeric", &[("abs", Some(1.0), Some(2.0))])),
    ]);

    let comparison = Comparator::new(EngineId::DuckDb)
        .with_baseline("v51")
        .compare(&runs)
        .unwrap();

    assert_eq!(comparison.engine, EngineId::DuckDb);
    assert_eq!(comparison.baseline_index(), 1);
    let abs = comparison.row("abs").unwrap();
    assert_close(abs.speedups[0].unwrap(), 0.5);
    assert_close(abs.speedup_percent(0).unwrap(), -100.0);
}

#[test]
fn test_comparison_errors() {
    let single = labeled(vec![("v50", saved_run("numeric", &[("abs", Some(1.0), None)]))]);
    assert!(matches!(
        Comparator::new(EngineId::DataFusion).compare(&single),
        Err(BenchError::InsufficientRuns { got: 1 })
    ));

    let runs = labeled(vec![
        ("v50", saved_run("numeric", &[("abs", Some(1.0), None)])),
        ("v51", saved_run("numeric", &[("abs", Some(1.0), None)])),
    ]);
    assert!(matches!(
        Comparator::new(EngineId::DataFusion)
            .with_baseline("v49")
            .compare(&runs),
        Err(BenchError::UnknownBaseline { .. })
    ));

    let duplicated = labeled(vec![
        ("v50", saved_run("numeric", &[("abs", Some(1.0), None)])),
        ("v50", saved_run("numeric", &[("abs", Some(2.0), None)])),
    ]);
    assert!(matches!(
        Comparator::new(EngineId::DataFusion).compare(&duplicated),
        Err(BenchError::Configuration(_))
    ));
}
