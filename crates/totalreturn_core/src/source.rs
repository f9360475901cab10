//! Market-data seam
//!
//! Retrieval of prices and dividends lives outside this crate. The pipeline
//! only asks a `PriceSource` for one ticker's series over a date range.

use jiff::civil::Date;
use rustc_hash::FxHashMap;

use crate::error::{CoreError, Result};
use crate::model::PriceSeries;

/// A series as delivered by a source
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadedSeries {
    pub series: PriceSeries,
    /// Dividend events the source could not place on a trading date
    pub dropped_dividends: usize,
}

impl From<PriceSeries> for LoadedSeries {
    fn from(series: PriceSeries) -> Self {
        Self {
            series,
            dropped_dividends: 0,
        }
    }
}

pub trait PriceSource: Sync {
    /// Series for `ticker` restricted to `start..=end`, dividends already
    /// attached to trading dates.
    fn load(&self, ticker: &str, start: Date, end: Date) -> Result<LoadedSeries>;
}

/// A source backed by series already in memory
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    series: FxHashMap<String, PriceSeries>,
}

impl InMemorySource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, ticker: impl Into<String>, series: PriceSeries) -> Self {
        self.insert(ticker, series);
        self
    }

    pub fn insert(&mut self, ticker: impl Into<String>, series: PriceSeries) {
        self.series.insert(ticker.into(), series);
    }
}

impl PriceSource for InMemorySource {
    fn load(&self, ticker: &str, start: Date, end: Date) -> Result<LoadedSeries> {
        self.series
            .get(ticker)
            .map(|s| s.restrict(start, end).into())
            .ok_or_else(|| CoreError::Data(format!("no data for ticker {ticker}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::civil::date;

    #[test]
    fn test_in_memory_source_restricts_range() {
        let source = InMemorySource::new().with(
            "AAA",
            PriceSeries::from_closes(&[
                (date(2024, 1, 2), 10.0),
                (date(2024, 1, 3), 11.0),
                (date(2024, 1, 4), 12.0),
            ]),
        );

        let s = source
            .load("AAA", date(2024, 1, 3), date(2024, 1, 31))
            .unwrap();
        assert_eq!(s.series.len(), 2);
        assert_eq!(s.dropped_dividends, 0);

        let err = source
            .load("ZZZ", date(2024, 1, 1), date(2024, 1, 31))
            .unwrap_err();
        assert!(matches!(err, CoreError::Data(_)));
    }
}
