//! Market-relative risk statistics
//!
//! Portfolio log-returns are regressed on benchmark log-returns with a
//! closed-form simple linear regression:
//!
//! ```text
//! port_log[t] = alpha + beta * bench_log[t] + e[t]
//! ```
//!
//! Alpha is annualized by plain multiplication with the trading-day
//! frequency (no compounding). The Sharpe ratio uses the daily log
//! equivalent of the annual risk-free rate and the sample standard
//! deviation of the portfolio log-returns, guarded by `SHARPE_EPSILON`.

use crate::align::{inner_join, join_indices};
use crate::error::{CoreError, Result};
use crate::index_builder::log_returns;
use crate::model::{
    AnalysisWarning, RegressionDiagnostics, RegressionResult, TotalReturnIndex, WarningKind,
};
use crate::stats::{mean, sample_std_dev};

pub const SHARPE_EPSILON: f64 = 1e-12;

/// Minimum number of paired log-returns for a fit
pub const MIN_PAIRED_SAMPLES: usize = 2;

/// OLS fit plus whether the regressor had no variance
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OlsFit {
    pub diagnostics: RegressionDiagnostics,
    /// `x` was constant: slope is reported as 0.0, intercept as `mean(y)`
    pub degenerate: bool,
}

/// Risk statistics together with the non-fatal conditions met on the way
#[derive(Debug, Clone, PartialEq)]
pub struct RiskStatistics {
    pub result: RegressionResult,
    pub warnings: Vec<AnalysisWarning>,
}

/// Daily simple and log risk-free rates equivalent to `rf_annual`
#[must_use]
pub fn daily_risk_free(rf_annual: f64, frequency: u32) -> (f64, f64) {
    let rf_daily = (1.0 + rf_annual).powf(1.0 / f64::from(frequency)) - 1.0;
    (rf_daily, rf_daily.ln_1p())
}

/// `Some` for a finite statistic, `None` where it is undefined
fn defined(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

/// Fit `y = intercept + slope * x` by ordinary least squares.
pub fn fit_ols(y: &[f64], x: &[f64]) -> Result<OlsFit> {
    if y.len() != x.len() {
        return Err(CoreError::Data(format!(
            "regression inputs differ in length ({} vs {})",
            y.len(),
            x.len()
        )));
    }
    let n = y.len();
    if n < MIN_PAIRED_SAMPLES {
        return Err(CoreError::InsufficientData {
            required: MIN_PAIRED_SAMPLES,
            actual: n,
        });
    }

    let nf = n as f64;
    let x_mean = mean(x);
    let y_mean = mean(y);

    let mut sxx = 0.0;
    let mut sxy = 0.0;
    let mut syy = 0.0;
    for (xi, yi) in x.iter().zip(y) {
        let dx = xi - x_mean;
        let dy = yi - y_mean;
        sxx += dx * dx;
        sxy += dx * dy;
        syy += dy * dy;
    }

    let degenerate = sxx == 0.0;
    let (slope, intercept) = if degenerate {
        (0.0, y_mean)
    } else {
        let slope = sxy / sxx;
        (slope, y_mean - slope * x_mean)
    };

    let mut ssr = 0.0;
    let mut residual_sum = 0.0;
    let mut residual_min = f64::INFINITY;
    let mut residual_max = f64::NEG_INFINITY;
    for (xi, yi) in x.iter().zip(y) {
        let e = yi - intercept - slope * xi;
        ssr += e * e;
        residual_sum += e;
        residual_min = residual_min.min(e);
        residual_max = residual_max.max(e);
    }

    let df_resid = n - 2;
    let sigma2 = if df_resid > 0 {
        ssr / df_resid as f64
    } else {
        f64::NAN
    };

    let (slope_std_err, intercept_std_err) = if degenerate {
        (None, None)
    } else {
        (
            defined((sigma2 / sxx).sqrt()),
            defined((sigma2 * (1.0 / nf + x_mean * x_mean / sxx)).sqrt()),
        )
    };

    let r_squared = (syy > 0.0).then(|| 1.0 - ssr / syy);
    let adj_r_squared = r_squared
        .filter(|_| df_resid > 0)
        .and_then(|r2| defined(1.0 - (nf - 1.0) / df_resid as f64 * (1.0 - r2)));

    Ok(OlsFit {
        diagnostics: RegressionDiagnostics {
            n_obs: n,
            df_resid,
            intercept,
            slope,
            intercept_std_err,
            slope_std_err,
            intercept_t: intercept_std_err.and_then(|se| defined(intercept / se)),
            slope_t: slope_std_err.and_then(|se| defined(slope / se)),
            r_squared,
            adj_r_squared,
            ssr,
            residual_std_err: defined(sigma2.sqrt()),
            residual_mean: residual_sum / nf,
            residual_min,
            residual_max,
        },
        degenerate,
    })
}

/// Beta, annualized alpha and Sharpe ratio of `portfolio` against
/// `benchmark`.
pub fn risk_statistics(
    portfolio: &TotalReturnIndex,
    benchmark: &TotalReturnIndex,
    rf_annual: f64,
    frequency: u32,
) -> Result<RiskStatistics> {
    if frequency == 0 {
        return Err(CoreError::Config(
            "trading-day frequency must be positive".to_string(),
        ));
    }

    let mut warnings = Vec::new();

    let levels = join_indices("portfolio vs benchmark", portfolio, benchmark)?;
    if levels.len() < MIN_PAIRED_SAMPLES + 1 {
        return Err(CoreError::InsufficientData {
            required: MIN_PAIRED_SAMPLES,
            actual: levels.len().saturating_sub(1),
        });
    }
    if levels.dropped() > 0 {
        warnings.push(AnalysisWarning::new(
            WarningKind::DroppedDates,
            format!(
                "regression join dropped {} portfolio and {} benchmark dates",
                levels.left_dropped, levels.right_dropped
            ),
        ));
    }

    // Returns are dated by the later day of each pair; the undefined first
    // return is left out.
    let dates = &levels.dates[1..];
    let port_log = log_returns(&levels.left);
    let bench_log = log_returns(&levels.right);
    let pairs = inner_join(
        "log-return pairs",
        (dates, &port_log[1..]),
        (dates, &bench_log[1..]),
    )?;

    let mut port = Vec::with_capacity(pairs.len());
    let mut bench = Vec::with_capacity(pairs.len());
    for (p, b) in pairs.left.iter().zip(&pairs.right) {
        if p.is_finite() && b.is_finite() {
            port.push(*p);
            bench.push(*b);
        }
    }
    let non_finite = pairs.len() - port.len();
    if non_finite > 0 {
        warnings.push(AnalysisWarning::new(
            WarningKind::DroppedDates,
            format!("{non_finite} non-finite log-return pairs dropped"),
        ));
    }

    let fit = fit_ols(&port, &bench)?;
    if fit.degenerate {
        warnings.push(AnalysisWarning::new(
            WarningKind::DegenerateBenchmark,
            "benchmark log-returns have zero variance; beta reported as 0",
        ));
    }

    let freq = f64::from(frequency);
    let (rf_daily, rf_log) = daily_risk_free(rf_annual, frequency);
    let excess: Vec<f64> = port.iter().map(|r| r - rf_log).collect();
    let volatility = sample_std_dev(&port);
    let sharpe = mean(&excess) * freq.sqrt() / (volatility + SHARPE_EPSILON);

    if volatility <= SHARPE_EPSILON {
        warnings.push(AnalysisWarning::new(
            WarningKind::ZeroVolatility,
            format!(
                "portfolio log-return volatility is {volatility:e}; Sharpe ratio is not meaningful"
            ),
        ));
    }

    tracing::debug!(
        n = fit.diagnostics.n_obs,
        beta = fit.diagnostics.slope,
        sharpe,
        "fitted risk statistics"
    );

    Ok(RiskStatistics {
        result: RegressionResult {
            beta: fit.diagnostics.slope,
            alpha_annualized: fit.diagnostics.intercept * freq,
            sharpe,
            rf_daily,
            rf_log,
            dropped_dates: (levels.left_dropped, levels.right_dropped),
            diagnostics: fit.diagnostics,
        },
        warnings,
    })
}
