//! Analysis outputs
//!
//! Everything here is plain data: built once by the pipeline, never mutated
//! afterwards, and serializable for the reporting layer.

use serde::{Deserialize, Serialize};

use super::index::IndexTable;
use crate::error::Stage;
use crate::stats;

/// Closed-form simple linear regression of portfolio on benchmark
/// log-returns.
///
/// Statistics that are undefined for the fitted sample are `None`: standard
/// errors of a constant regressor, anything divided by zero residual
/// degrees of freedom, t-statistics of a perfect fit, and R² of a constant
/// response.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegressionDiagnostics {
    pub n_obs: usize,
    pub df_resid: usize,
    pub intercept: f64,
    pub slope: f64,
    pub intercept_std_err: Option<f64>,
    pub slope_std_err: Option<f64>,
    pub intercept_t: Option<f64>,
    pub slope_t: Option<f64>,
    pub r_squared: Option<f64>,
    pub adj_r_squared: Option<f64>,
    /// Residual sum of squares
    pub ssr: f64,
    pub residual_std_err: Option<f64>,
    pub residual_mean: f64,
    pub residual_min: f64,
    pub residual_max: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegressionResult {
    pub beta: f64,
    pub alpha_annualized: f64,
    pub sharpe: f64,
    pub rf_daily: f64,
    pub rf_log: f64,
    /// Dates dropped by the index join (portfolio side, benchmark side)
    pub dropped_dates: (usize, usize),
    pub diagnostics: RegressionDiagnostics,
}

/// Final multiples of a block-bootstrap run, one per simulated path.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BootstrapOutcome {
    pub final_multiples: Vec<f64>,
}

impl BootstrapOutcome {
    #[must_use]
    pub fn len(&self) -> usize {
        self.final_multiples.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.final_multiples.is_empty()
    }

    /// Linear-interpolated percentile, `q` in `[0, 1]`
    #[must_use]
    pub fn percentile(&self, q: f64) -> Option<f64> {
        stats::percentile(&self.final_multiples, q)
    }

    #[must_use]
    pub fn median(&self) -> Option<f64> {
        self.percentile(0.5)
    }

    #[must_use]
    pub fn p5(&self) -> Option<f64> {
        self.percentile(0.05)
    }

    #[must_use]
    pub fn p95(&self) -> Option<f64> {
        self.percentile(0.95)
    }
}

/// Headline numbers for the portfolio
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSummary {
    pub beta: f64,
    pub alpha_annualized: f64,
    pub sharpe: f64,
    pub max_drawdown: f64,
    pub latest_trailing_return: Option<f64>,
    pub mc_median: f64,
    pub mc_p5: f64,
    pub mc_p95: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WarningKind {
    /// Portfolio log-returns have (near) zero variance; Sharpe is unreliable
    ZeroVolatility,
    /// Benchmark log-returns have zero variance; beta is undefined
    DegenerateBenchmark,
    /// An inner join dropped rows
    DroppedDates,
    /// Dividend events that did not land on a trading date
    DroppedDividends,
    /// A constituent failed and was left out of the portfolio
    AssetSkipped,
    /// Portfolio history shorter than the trailing window
    ShortTrailingHistory,
}

/// Non-fatal condition worth surfacing to the analyst
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisWarning {
    pub kind: WarningKind,
    pub message: String,
}

impl AnalysisWarning {
    #[must_use]
    pub fn new(kind: WarningKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetReport {
    pub ticker: String,
    pub dropped_dividends: usize,
    pub table: IndexTable,
}

/// A constituent that was skipped, with the reason
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetFailure {
    pub ticker: String,
    pub stage: Stage,
    pub error: String,
}

/// Complete output of one analysis run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub assets: Vec<AssetReport>,
    pub benchmark: AssetReport,
    pub failures: Vec<AssetFailure>,
    pub portfolio: IndexTable,
    pub regression: RegressionResult,
    pub monte_carlo: BootstrapOutcome,
    pub summary: PortfolioSummary,
    pub warnings: Vec<AnalysisWarning>,
}

impl AnalysisReport {
    #[must_use]
    pub fn has_warning(&self, kind: WarningKind) -> bool {
        self.warnings.iter().any(|w| w.kind == kind)
    }

    #[must_use]
    pub fn asset(&self, ticker: &str) -> Option<&AssetReport> {
        self.assets.iter().find(|a| a.ticker == ticker)
    }
}
