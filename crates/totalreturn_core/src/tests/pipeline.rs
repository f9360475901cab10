//! End-to-end runs through `run_analysis`

use jiff::civil::{Date, date};

use super::synthetic_series;
use crate::error::{CoreError, Result};
use crate::model::WarningKind;
use crate::source::{InMemorySource, LoadedSeries, PriceSource};
use crate::{AnalysisBuilder, AnalysisConfig, AnalysisError, FailurePolicy, Stage, run_analysis};

const START: Date = date(2020, 1, 1);

fn source() -> InMemorySource {
    InMemorySource::new()
        .with("AAA", synthetic_series(1, START, 600, 0.0006))
        .with("BBB", synthetic_series(2, START, 600, 0.0003))
        .with("CCC", synthetic_series(3, START, 600, 0.0))
        .with("IDX", synthetic_series(4, START, 600, 0.0004))
}

fn config(universe: &[&str]) -> AnalysisBuilder {
    AnalysisBuilder::new()
        .universe(universe.iter().copied())
        .benchmark("IDX")
        .date_range(START, date(2024, 12, 31))
        .trailing_window(126)
        .monte_carlo_runs(200)
        .block_size(21)
        .horizon_years(2)
        .seed(7)
}

#[test]
fn test_full_run_produces_consistent_report() {
    let config = config(&["AAA", "BBB", "CCC"]).build().unwrap();
    let report = run_analysis(&config, &source()).unwrap();

    assert_eq!(report.assets.len(), 3);
    assert!(report.failures.is_empty());
    assert_eq!(report.benchmark.ticker, "IDX");
    assert_eq!(report.portfolio.len(), 600);
    assert_eq!(report.portfolio.rows[0].total_return_index, 1.0);
    for asset in &report.assets {
        assert_eq!(asset.table.rows[0].total_return_index, 1.0);
        assert!(asset.table.rows[0].price.is_some());
    }

    let summary = report.summary;
    assert_eq!(summary.beta, report.regression.beta);
    assert!(summary.beta.is_finite());
    assert!(summary.alpha_annualized.is_finite());
    assert!(summary.sharpe.is_finite());
    assert!(summary.max_drawdown <= 0.0);
    assert!(summary.latest_trailing_return.is_some());
    assert!(summary.mc_p5 <= summary.mc_median);
    assert!(summary.mc_median <= summary.mc_p95);

    assert_eq!(report.monte_carlo.len(), 200);
    assert_eq!(report.regression.diagnostics.n_obs, 599);
    assert!(!report.has_warning(WarningKind::AssetSkipped));
    assert!(!report.has_warning(WarningKind::ShortTrailingHistory));
}

#[test]
fn test_same_seed_same_report() {
    let config = config(&["AAA", "BBB"]).build().unwrap();
    let source = source();

    let first = run_analysis(&config, &source).unwrap();
    let second = run_analysis(&config, &source).unwrap();
    assert_eq!(first, second);

    let reseeded = AnalysisBuilder::from_config(config).seed(8).build().unwrap();
    let third = run_analysis(&reseeded, &source).unwrap();
    assert_ne!(first.monte_carlo, third.monte_carlo);
    assert_eq!(first.regression, third.regression);
}

#[test]
fn test_late_listing_shrinks_portfolio_to_common_dates() {
    let source = source().with("NEW", synthetic_series(9, date(2021, 1, 4), 300, 0.0));
    let config = config(&["AAA", "NEW"]).build().unwrap();

    let report = run_analysis(&config, &source).unwrap();

    let new_len = report.asset("NEW").unwrap().table.len();
    assert!(report.portfolio.len() <= new_len);
    assert!(report.portfolio.len() < report.asset("AAA").unwrap().table.len());
    assert!(report.has_warning(WarningKind::DroppedDates));
}

#[test]
fn test_missing_asset_is_skipped_by_default() {
    let config = config(&["AAA", "MISSING", "BBB"]).build().unwrap();
    let report = run_analysis(&config, &source()).unwrap();

    assert_eq!(report.assets.len(), 2);
    assert!(report.asset("MISSING").is_none());
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].ticker, "MISSING");
    assert_eq!(report.failures[0].stage, Stage::Load);
    assert!(report.has_warning(WarningKind::AssetSkipped));
}

#[test]
fn test_missing_asset_aborts_under_abort_policy() {
    let config = config(&["AAA", "MISSING"])
        .failure_policy(FailurePolicy::Abort)
        .build()
        .unwrap();

    let err = run_analysis(&config, &source()).unwrap_err();
    match err {
        AnalysisError::Asset { ticker, stage, .. } => {
            assert_eq!(ticker, "MISSING");
            assert_eq!(stage, Stage::Load);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_empty_range_fails_at_index_stage() {
    // data ends long before the analysis window opens
    let source = source().with("OLD", synthetic_series(5, date(2000, 1, 3), 50, 0.0));
    let config = config(&["AAA", "OLD"]).build().unwrap();

    let report = run_analysis(&config, &source).unwrap();
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].stage, Stage::BuildIndex);
}

#[test]
fn test_no_usable_assets() {
    let config = config(&["X", "Y"]).build().unwrap();
    let err = run_analysis(&config, &source()).unwrap_err();
    assert!(matches!(err, AnalysisError::NoUsableAssets { attempted: 2 }));
}

#[test]
fn test_benchmark_failure_always_aborts() {
    let config = config(&["AAA"]).benchmark("NOPE").build().unwrap();
    let err = run_analysis(&config, &source()).unwrap_err();

    assert!(matches!(err, AnalysisError::Benchmark { stage: Stage::Load, .. }));
    assert!(err.to_string().contains("NOPE"));
}

#[test]
fn test_history_shorter_than_block_fails_simulation() {
    let short = InMemorySource::new()
        .with("AAA", synthetic_series(1, START, 15, 0.0))
        .with("IDX", synthetic_series(4, START, 15, 0.0));
    let config = config(&["AAA"]).build().unwrap();

    let err = run_analysis(&config, &short).unwrap_err();
    assert_eq!(err.stage(), Some(Stage::Simulate));
    assert!(matches!(
        err,
        AnalysisError::Portfolio { start, end, .. } if start == START && end == date(2024, 12, 31)
    ));
    assert!(matches!(
        err.core_error(),
        Some(CoreError::InsufficientHistory {
            block_size: 21,
            history_len: 14
        })
    ));
}

#[test]
fn test_short_history_warns_about_trailing_window() {
    let short = InMemorySource::new()
        .with("AAA", synthetic_series(1, START, 60, 0.0))
        .with("IDX", synthetic_series(4, START, 60, 0.0));
    let config = config(&["AAA"]).build().unwrap();

    let report = run_analysis(&config, &short).unwrap();
    assert_eq!(report.summary.latest_trailing_return, None);
    assert!(report.has_warning(WarningKind::ShortTrailingHistory));
}

#[test]
fn test_self_benchmark_has_unit_beta() {
    let source = source().with("SAME", synthetic_series(1, START, 600, 0.0006));
    let config = config(&["AAA"]).benchmark("SAME").build().unwrap();

    let report = run_analysis(&config, &source).unwrap();
    assert!((report.summary.beta - 1.0).abs() < 1e-12);
    assert!(report.summary.alpha_annualized.abs() < 1e-10);

    // A perfect fit leaves the t-statistics undefined, and the report still
    // reads back from JSON
    assert_eq!(report.regression.diagnostics.slope_t, None);
    let json = serde_json::to_string(&report).unwrap();
    let back: crate::model::AnalysisReport = serde_json::from_str(&json).unwrap();
    assert_eq!(back.regression.diagnostics.slope_t, None);
    assert_eq!(back.regression.diagnostics.n_obs, 599);
}

#[test]
fn test_portfolio_of_many_unit_constituents_starts_at_one() {
    let mut source = source();
    let tickers: Vec<String> = (0..49).map(|i| format!("T{i:02}")).collect();
    for (i, ticker) in tickers.iter().enumerate() {
        source.insert(ticker.clone(), synthetic_series(100 + i as u64, START, 60, 0.0));
    }
    let config = config(&[]).universe(tickers).build().unwrap();

    let report = run_analysis(&config, &source).unwrap();
    assert_eq!(report.assets.len(), 49);
    assert_eq!(report.portfolio.rows[0].total_return_index, 1.0);
}

/// Source that reports dividends it could not place
struct LossySource(InMemorySource);

impl PriceSource for LossySource {
    fn load(&self, ticker: &str, start: Date, end: Date) -> Result<LoadedSeries> {
        let mut loaded = self.0.load(ticker, start, end)?;
        loaded.dropped_dividends = 2;
        Ok(loaded)
    }
}

#[test]
fn test_dropped_dividends_surface_as_warnings() {
    let config = config(&["AAA"]).build().unwrap();
    let report = run_analysis(&config, &LossySource(source())).unwrap();

    assert_eq!(report.asset("AAA").unwrap().dropped_dividends, 2);
    assert_eq!(report.benchmark.dropped_dividends, 2);
    let count = report
        .warnings
        .iter()
        .filter(|w| w.kind == WarningKind::DroppedDividends)
        .count();
    assert_eq!(count, 2);
}

#[test]
fn test_invalid_config_is_rejected_before_loading() {
    let config = AnalysisConfig {
        universe: Vec::new(),
        ..AnalysisConfig::default()
    };
    let err = run_analysis(&config, &UnreachableSource).unwrap_err();
    assert!(matches!(err, AnalysisError::Config(_)));
}

struct UnreachableSource;

impl PriceSource for UnreachableSource {
    fn load(&self, _: &str, _: Date, _: Date) -> Result<LoadedSeries> {
        panic!("load must not be reached");
    }
}

#[test]
fn test_report_serializes_to_json() {
    let config = config(&["AAA"]).build().unwrap();
    let report = run_analysis(&config, &source()).unwrap();

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["benchmark"]["ticker"], "IDX");
    assert_eq!(json["portfolio"]["rows"][0]["date"], "2020-01-01");
    assert!(json["summary"]["mc_median"].is_number());
}
