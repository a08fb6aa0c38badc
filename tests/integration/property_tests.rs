use enginebench::{report, Comparator, EngineId, ResultRow, RunResult, Variant};
use proptest::prelude::*;

fn mean() -> impl Strategy<Value = Option<f64>> {
    prop::option::weighted(0.8, 0.001f64..10_000.0)
}

fn rows() -> impl Strategy<Value = Vec<(Option<f64>, Option<f64>)>> {
    prop::collection::vec((mean(), mean()), 1..12)
}

fn build_run(means: &[(Option<f64>, Option<f64>)]) -> RunResult {
    let rows = means
        .iter()
        .enumerate()
        .map(|(i, (datafusion, duckdb))| {
            ResultRow::from_means(
                format!("fn_{}", i),
                &[(EngineId::DataFusion, *datafusion), (EngineId::DuckDb, *duckdb)],
            )
        })
        .collect();
    RunResult::new(
        "numeric",
        1_000,
        Variant::Baseline,
        vec![EngineId::DataFusion, EngineId::DuckDb],
        2,
        5,
        rows,
    )
}

proptest! {
    #[test]
    fn winner_is_fastest_and_speedup_at_least_one(a in 0.001f64..10_000.0, b in 0.001f64..10_000.0) {
        let row = ResultRow::from_means(
            "f",
            &[(EngineId::DataFusion, Some(a)), (EngineId::DuckDb, Some(b))],
        );
        let expected = if b < a { EngineId::DuckDb } else { EngineId::DataFusion };
        prop_assert_eq!(row.winner, Some(expected));

        let speedup = row.speedup.unwrap();
        prop_assert!(speedup >= 1.0);
        prop_assert!((speedup - a.max(b) / a.min(b)).abs() < 1e-9);
    }

    #[test]
    fn summary_is_consistent_with_rows(means in rows()) {
        let run = build_run(&means);
        let tested = means.iter().filter(|(a, b)| a.is_some() || b.is_some()).count();
        let compared = means.iter().filter(|(a, b)| a.is_some() && b.is_some()).count();

        prop_assert_eq!(run.summary.functions_tested, tested);
        prop_assert_eq!(run.summary.functions_compared, compared);
        prop_assert_eq!(
            run.summary.wins(EngineId::DataFusion) + run.summary.wins(EngineId::DuckDb),
            compared
        );

        let total: f64 = means.iter().filter_map(|(a, _)| *a).sum();
        prop_assert!((run.summary.total_ms(EngineId::DataFusion) - total).abs() < 1e-6);
    }

    #[test]
    fn json_round_trip_preserves_run(means in rows()) {
        let run = build_run(&means);
        let back = report::from_json(&report::to_json(&run).unwrap()).unwrap();
        prop_assert_eq!(back, run);
    }

    #[test]
    fn self_comparison_is_neutral(means in rows()) {
        let run = build_run(&means);
        let runs = vec![("a".to_string(), run.clone()), ("b".to_string(), run)];
        let comparison = Comparator::new(EngineId::DataFusion).compare(&runs).unwrap();

        for (row, (datafusion, _)) in comparison.rows.iter().zip(&means) {
            match datafusion {
                Some(_) => prop_assert_eq!(row.speedups[1], Some(1.0)),
                None => prop_assert_eq!(row.speedups[1], None),
            }
        }
    }
}
