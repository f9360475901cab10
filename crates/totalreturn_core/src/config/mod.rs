//! Analysis configuration
//!
//! `AnalysisConfig` is built once and passed by reference into every stage.
//! Nothing in the crate reads configuration from globals, so several
//! scenarios can run side by side.
//!
//! # Builder DSL
//!
//! ```ignore
//! use totalreturn_core::config::AnalysisBuilder;
//!
//! let config = AnalysisBuilder::new()
//!     .universe(["MSFT", "NVDA", "GOOGL"])
//!     .benchmark("SPY")
//!     .date_range(jiff::civil::date(2010, 1, 1), jiff::civil::date(2024, 12, 31))
//!     .risk_free_annual(0.03)
//!     .monte_carlo_runs(1_000)
//!     .seed(7)
//!     .build()?;
//! ```

use jiff::civil::Date;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;

pub mod builder;

pub use builder::AnalysisBuilder;

/// What to do when a single constituent cannot be loaded or indexed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Record the failure and build the portfolio from the rest
    #[default]
    SkipAsset,
    /// Stop the whole analysis at the first failing asset
    Abort,
}

fn default_universe() -> Vec<String> {
    [
        "MSFT", "NVDA", "GOOGL", "AMZN", "META", "ADBE", "CRM", "ASML", "TSM", "NOW",
    ]
    .iter()
    .map(ToString::to_string)
    .collect()
}

fn default_benchmark() -> String {
    "SPY".to_string()
}

fn default_start() -> Date {
    jiff::civil::date(1999, 1, 1)
}

fn default_end() -> Date {
    jiff::civil::date(2025, 8, 1)
}

fn default_risk_free_annual() -> f64 {
    0.04
}

fn default_monte_carlo_runs() -> usize {
    500
}

fn default_block_size() -> usize {
    crate::bootstrap::DEFAULT_BLOCK_SIZE
}

fn default_trailing_window() -> usize {
    126
}

fn default_horizon_years() -> u32 {
    25
}

fn default_frequency() -> u32 {
    252
}

fn default_seed() -> u64 {
    42
}

/// Complete configuration of one analysis run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Tickers of the equal-weighted portfolio
    #[serde(default = "default_universe")]
    pub universe: Vec<String>,
    #[serde(default = "default_benchmark")]
    pub benchmark: String,

    /// First date of the window (inclusive)
    #[serde(default = "default_start")]
    pub start: Date,
    /// Last date of the window (inclusive)
    #[serde(default = "default_end")]
    pub end: Date,

    #[serde(default = "default_risk_free_annual")]
    pub risk_free_annual: f64,
    /// Trading periods per year, used for annualization and the horizon
    #[serde(default = "default_frequency")]
    pub frequency: u32,

    /// Length of the trailing-return lookback, in trading periods
    #[serde(default = "default_trailing_window")]
    pub trailing_window: usize,

    #[serde(default = "default_monte_carlo_runs")]
    pub monte_carlo_runs: usize,
    #[serde(default = "default_block_size")]
    pub block_size: usize,
    #[serde(default = "default_horizon_years")]
    pub horizon_years: u32,
    #[serde(default = "default_seed")]
    pub seed: u64,

    #[serde(default)]
    pub failure_policy: FailurePolicy,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            universe: default_universe(),
            benchmark: default_benchmark(),
            start: default_start(),
            end: default_end(),
            risk_free_annual: default_risk_free_annual(),
            frequency: default_frequency(),
            trailing_window: default_trailing_window(),
            monte_carlo_runs: default_monte_carlo_runs(),
            block_size: default_block_size(),
            horizon_years: default_horizon_years(),
            seed: default_seed(),
            failure_policy: FailurePolicy::default(),
        }
    }
}

impl AnalysisConfig {
    /// Simulation horizon in trading periods
    #[must_use]
    pub fn horizon_periods(&self) -> usize {
        crate::bootstrap::horizon_periods(self.horizon_years, self.frequency)
    }

    /// Check the parameters that no stage can recover from
    pub fn validate(&self) -> Result<(), AnalysisError> {
        let fail = |msg: String| Err(AnalysisError::Config(msg));

        if self.universe.is_empty() {
            return fail("asset universe is empty".to_string());
        }
        if let Some(t) = self.universe.iter().find(|t| t.trim().is_empty()) {
            return fail(format!("asset universe contains a blank ticker {t:?}"));
        }
        let mut seen = FxHashSet::default();
        if let Some(dup) = self.universe.iter().find(|t| !seen.insert(t.as_str())) {
            return fail(format!("ticker {dup} appears twice in the universe"));
        }
        if self.benchmark.trim().is_empty() {
            return fail("benchmark ticker is empty".to_string());
        }
        if self.start > self.end {
            return fail(format!(
                "start date {} is after end date {}",
                self.start, self.end
            ));
        }
        if !self.risk_free_annual.is_finite() || self.risk_free_annual <= -1.0 {
            return fail(format!(
                "risk-free rate {} must be finite and above -100%",
                self.risk_free_annual
            ));
        }
        if self.frequency == 0 {
            return fail("trading-day frequency must be positive".to_string());
        }
        if self.block_size == 0 {
            return fail("block size must be positive".to_string());
        }
        if self.monte_carlo_runs == 0 {
            return fail("Monte Carlo run count must be positive".to_string());
        }
        Ok(())
    }
}
