//! Fluent construction of an `AnalysisConfig`

use jiff::civil::Date;

use super::{AnalysisConfig, FailurePolicy};
use crate::error::AnalysisError;

/// Builder starting from the default configuration
#[derive(Debug, Clone, Default)]
pub struct AnalysisBuilder {
    config: AnalysisConfig,
}

impl AnalysisBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing configuration, e.g. one loaded from disk
    #[must_use]
    pub fn from_config(config: AnalysisConfig) -> Self {
        Self { config }
    }

    // =========================================================================
    // Universe
    // =========================================================================

    #[must_use]
    pub fn universe<I, S>(mut self, tickers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.universe = tickers.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn benchmark(mut self, ticker: impl Into<String>) -> Self {
        self.config.benchmark = ticker.into();
        self
    }

    #[must_use]
    pub fn date_range(mut self, start: Date, end: Date) -> Self {
        self.config.start = start;
        self.config.end = end;
        self
    }

    // =========================================================================
    // Statistics
    // =========================================================================

    #[must_use]
    pub fn risk_free_annual(mut self, rate: f64) -> Self {
        self.config.risk_free_annual = rate;
        self
    }

    #[must_use]
    pub fn frequency(mut self, periods_per_year: u32) -> Self {
        self.config.frequency = periods_per_year;
        self
    }

    #[must_use]
    pub fn trailing_window(mut self, periods: usize) -> Self {
        self.config.trailing_window = periods;
        self
    }

    // =========================================================================
    // Simulation
    // =========================================================================

    #[must_use]
    pub fn monte_carlo_runs(mut self, runs: usize) -> Self {
        self.config.monte_carlo_runs = runs;
        self
    }

    #[must_use]
    pub fn block_size(mut self, periods: usize) -> Self {
        self.config.block_size = periods;
        self
    }

    #[must_use]
    pub fn horizon_years(mut self, years: u32) -> Self {
        self.config.horizon_years = years;
        self
    }

    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    #[must_use]
    pub fn failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.config.failure_policy = policy;
        self
    }

    /// Validate and return the configuration
    pub fn build(self) -> Result<AnalysisConfig, AnalysisError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
