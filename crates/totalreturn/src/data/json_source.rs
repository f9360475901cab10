use std::fs;
use std::path::{Path, PathBuf};

use jiff::civil::Date;
use serde::{Deserialize, Serialize};
use totalreturn_core::error::{CoreError, Result};
use totalreturn_core::model::{DividendEvent, PriceSeries};
use totalreturn_core::{LoadedSeries, PriceSource};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceRecord {
    pub date: Date,
    pub close: f64,
}

/// Contents of one `<TICKER>.json` file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceFile {
    pub prices: Vec<PriceRecord>,
    #[serde(default)]
    pub dividends: Vec<DividendEvent>,
}

impl PriceFile {
    /// Closes in date order, restricted to `start..=end`, with the in-range
    /// dividends attached.
    pub fn into_loaded(mut self, start: Date, end: Date) -> Result<LoadedSeries> {
        self.prices.sort_by_key(|r| r.date);
        if let Some(pair) = self.prices.windows(2).find(|w| w[0].date == w[1].date) {
            return Err(CoreError::Data(format!(
                "duplicate price rows for {}",
                pair[0].date
            )));
        }

        let rows: Vec<(Date, f64)> = self
            .prices
            .iter()
            .filter(|r| r.date >= start && r.date <= end)
            .map(|r| (r.date, r.close))
            .collect();
        let dividends: Vec<DividendEvent> = self
            .dividends
            .into_iter()
            .filter(|d| d.date >= start && d.date <= end)
            .collect();

        let (series, dropped_dividends) = PriceSeries::from_closes(&rows).with_dividends(&dividends);
        Ok(LoadedSeries {
            series,
            dropped_dividends,
        })
    }
}

/// Reads `<dir>/<TICKER>.json` on demand
#[derive(Debug, Clone)]
pub struct JsonDirectorySource {
    root: PathBuf,
}

impl JsonDirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn ticker_path(&self, ticker: &str) -> Result<PathBuf> {
        let valid = !ticker.is_empty()
            && ticker
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '^' | '='))
            && !ticker.starts_with('.');
        if !valid {
            return Err(CoreError::Data(format!("invalid ticker symbol {ticker:?}")));
        }
        Ok(self.root.join(format!("{ticker}.json")))
    }
}

impl PriceSource for JsonDirectorySource {
    fn load(&self, ticker: &str, start: Date, end: Date) -> Result<LoadedSeries> {
        let path = self.ticker_path(ticker)?;
        let content = fs::read_to_string(&path)
            .map_err(|e| CoreError::Data(format!("failed to read {}: {e}", path.display())))?;
        let file: PriceFile = serde_json::from_str(&content)
            .map_err(|e| CoreError::Data(format!("failed to parse {}: {e}", path.display())))?;

        let loaded = file.into_loaded(start, end)?;
        tracing::debug!(
            ticker,
            rows = loaded.series.len(),
            dropped_dividends = loaded.dropped_dividends,
            "loaded price file"
        );
        Ok(loaded)
    }
}
