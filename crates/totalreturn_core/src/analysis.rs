//! End-to-end analysis pipeline
//!
//! raw series -> per-asset index -> equal-weighted portfolio ->
//! {risk statistics vs. benchmark, block bootstrap} -> summary
//!
//! Constituent failures are scoped to the asset: under
//! `FailurePolicy::SkipAsset` they are recorded and the portfolio is built
//! from the remaining assets. Benchmark and portfolio-level failures always
//! end the run.

#[cfg(feature = "parallel")]
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};

use crate::bootstrap::BlockBootstrap;
use crate::config::{AnalysisConfig, FailurePolicy};
use crate::error::{AnalysisError, CoreError, Stage};
use crate::index_builder::{asset_table, build_index};
use crate::model::{
    AnalysisReport, AnalysisWarning, AssetFailure, AssetReport, PortfolioSummary,
    TotalReturnIndex, WarningKind,
};
use crate::portfolio::aggregate;
use crate::risk::risk_statistics;
use crate::source::PriceSource;

/// One asset's index and table, or the stage it failed at
type AssetOutcome = Result<(AssetReport, TotalReturnIndex), (Stage, CoreError)>;

/// Load one ticker and build its index and table
fn process_asset<S: PriceSource + ?Sized>(
    ticker: &str,
    config: &AnalysisConfig,
    source: &S,
) -> AssetOutcome {
    let loaded = source
        .load(ticker, config.start, config.end)
        .map_err(|e| (Stage::Load, e))?;
    let index = build_index(&loaded.series).map_err(|e| (Stage::BuildIndex, e))?;
    let table = asset_table(&loaded.series, &index, config.trailing_window);

    tracing::debug!(ticker, rows = index.len(), "built total-return index");

    Ok((
        AssetReport {
            ticker: ticker.to_string(),
            dropped_dividends: loaded.dropped_dividends,
            table,
        },
        index,
    ))
}

fn process_universe<S: PriceSource + ?Sized>(
    config: &AnalysisConfig,
    source: &S,
) -> Vec<AssetOutcome> {
    #[cfg(feature = "parallel")]
    let outcomes = config
        .universe
        .par_iter()
        .map(|ticker| process_asset(ticker, config, source))
        .collect();

    #[cfg(not(feature = "parallel"))]
    let outcomes = config
        .universe
        .iter()
        .map(|ticker| process_asset(ticker, config, source))
        .collect();

    outcomes
}

fn dropped_dividend_warning(report: &AssetReport) -> Option<AnalysisWarning> {
    (report.dropped_dividends > 0).then(|| {
        AnalysisWarning::new(
            WarningKind::DroppedDividends,
            format!(
                "{}: {} dividend events fell on non-trading dates and were ignored",
                report.ticker, report.dropped_dividends
            ),
        )
    })
}

/// Run the full analysis for `config` against `source`.
pub fn run_analysis<S: PriceSource + ?Sized>(
    config: &AnalysisConfig,
    source: &S,
) -> Result<AnalysisReport, AnalysisError> {
    config.validate()?;

    let mut warnings = Vec::new();
    let mut assets = Vec::new();
    let mut indices = Vec::new();
    let mut failures = Vec::new();

    for (ticker, outcome) in config.universe.iter().zip(process_universe(config, source)) {
        match outcome {
            Ok((report, index)) => {
                warnings.extend(dropped_dividend_warning(&report));
                assets.push(report);
                indices.push(index);
            }
            Err((stage, error)) => {
                if config.failure_policy == FailurePolicy::Abort {
                    return Err(AnalysisError::Asset {
                        ticker: ticker.clone(),
                        start: config.start,
                        end: config.end,
                        stage,
                        source: error,
                    });
                }
                warnings.push(AnalysisWarning::new(
                    WarningKind::AssetSkipped,
                    format!("{ticker} skipped at {stage}: {error}"),
                ));
                failures.push(AssetFailure {
                    ticker: ticker.clone(),
                    stage,
                    error: error.to_string(),
                });
            }
        }
    }

    if indices.is_empty() {
        return Err(AnalysisError::NoUsableAssets {
            attempted: config.universe.len(),
        });
    }

    let (benchmark, benchmark_index) =
        process_asset(&config.benchmark, config, source).map_err(|(stage, error)| {
            AnalysisError::Benchmark {
                ticker: config.benchmark.clone(),
                start: config.start,
                end: config.end,
                stage,
                source: error,
            }
        })?;
    warnings.extend(dropped_dividend_warning(&benchmark));

    let portfolio_error = |stage: Stage| {
        move |source: CoreError| AnalysisError::Portfolio {
            start: config.start,
            end: config.end,
            stage,
            source,
        }
    };

    let portfolio = aggregate(&indices, config.trailing_window)
        .map_err(portfolio_error(Stage::Aggregate))?;
    if portfolio.dropped_dates > 0 {
        warnings.push(AnalysisWarning::new(
            WarningKind::DroppedDates,
            format!(
                "portfolio join kept {} dates, dropping {} from the longest constituent",
                portfolio.index.len(),
                portfolio.dropped_dates
            ),
        ));
    }

    let risk = risk_statistics(
        &portfolio.index,
        &benchmark_index,
        config.risk_free_annual,
        config.frequency,
    )
    .map_err(portfolio_error(Stage::RiskStatistics))?;
    warnings.extend(risk.warnings);

    let history: Vec<f64> = portfolio
        .table
        .rows
        .iter()
        .skip(1)
        .map(|r| r.log_return)
        .collect();
    let simulate_error = portfolio_error(Stage::Simulate);
    let bootstrap = BlockBootstrap::new(&history, config.block_size, config.horizon_periods())
        .map_err(simulate_error)?;
    let monte_carlo = bootstrap.simulate(config.monte_carlo_runs, config.seed);

    let (Some(mc_median), Some(mc_p5), Some(mc_p95)) =
        (monte_carlo.median(), monte_carlo.p5(), monte_carlo.p95())
    else {
        return Err(simulate_error(CoreError::Config(
            "Monte Carlo produced no runs".to_string(),
        )));
    };

    let latest_trailing_return = portfolio.table.latest_trailing_return();
    if latest_trailing_return.is_none() {
        warnings.push(AnalysisWarning::new(
            WarningKind::ShortTrailingHistory,
            format!(
                "portfolio has {} rows, fewer than the {}-period trailing window",
                portfolio.table.len(),
                config.trailing_window
            ),
        ));
    }

    let summary = PortfolioSummary {
        beta: risk.result.beta,
        alpha_annualized: risk.result.alpha_annualized,
        sharpe: risk.result.sharpe,
        max_drawdown: portfolio.table.max_drawdown(),
        latest_trailing_return,
        mc_median,
        mc_p5,
        mc_p95,
    };

    for warning in &warnings {
        tracing::warn!(kind = ?warning.kind, "{}", warning.message);
    }

    Ok(AnalysisReport {
        assets,
        benchmark,
        failures,
        portfolio: portfolio.table,
        regression: risk.result,
        monte_carlo,
        summary,
        warnings,
    })
}
