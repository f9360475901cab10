//! Total-return performance analysis library
//!
//! This crate turns historical daily price and dividend series into a
//! total-return analysis of an equal-weighted portfolio:
//! - Dividend-reinvested cumulative indices per asset, with log-return,
//!   trailing-return and drawdown series
//! - An equal-weighted composite over the dates every constituent shares
//! - Beta, annualized alpha and Sharpe ratio against a benchmark, from a
//!   closed-form regression of log-returns
//! - A block-bootstrap Monte Carlo of long-horizon compounded multiples
//!
//! Market-data retrieval and report writing are left to the caller; data
//! comes in through the `PriceSource` trait.
//!
//! ```ignore
//! use totalreturn_core::{AnalysisBuilder, run_analysis};
//!
//! let config = AnalysisBuilder::new()
//!     .universe(["MSFT", "NVDA"])
//!     .benchmark("SPY")
//!     .build()?;
//! let report = run_analysis(&config, &my_source)?;
//! println!("beta {:.2}", report.summary.beta);
//! ```

#![warn(clippy::all)]

// ============================================================================
// Core modules
// ============================================================================

pub mod align;
pub mod analysis;
pub mod bootstrap;
pub mod error;
pub mod index_builder;
pub mod portfolio;
pub mod risk;
pub mod source;
pub mod stats;

// ============================================================================
// Type definition modules
// ============================================================================

pub mod config;
pub mod model;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use analysis::run_analysis;
pub use config::{AnalysisBuilder, AnalysisConfig, FailurePolicy};
pub use error::{AnalysisError, CoreError, Stage};
pub use source::{InMemorySource, LoadedSeries, PriceSource};
