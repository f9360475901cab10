//! Cumulative index series and their per-date tables

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// A dated cumulative growth series.
///
/// Indices produced by the builder start at exactly 1.0. A portfolio
/// composite is the mean of its constituents on shared dates and starts at
/// 1.0 only when every constituent starts on the first shared date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TotalReturnIndex {
    dates: Vec<Date>,
    values: Vec<f64>,
}

impl TotalReturnIndex {
    /// Pair dates with values. Both must be non-empty and of equal length.
    pub fn from_parts(dates: Vec<Date>, values: Vec<f64>) -> Result<Self> {
        if dates.len() != values.len() {
            return Err(CoreError::Data(format!(
                "index has {} dates but {} values",
                dates.len(),
                values.len()
            )));
        }
        if dates.is_empty() {
            return Err(CoreError::Data("index is empty".to_string()));
        }
        Ok(Self { dates, values })
    }

    #[must_use]
    pub fn dates(&self) -> &[Date] {
        &self.dates
    }

    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always false for a constructed index
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[must_use]
    pub fn first_date(&self) -> Date {
        self.dates[0]
    }

    #[must_use]
    pub fn last_value(&self) -> f64 {
        self.values[self.values.len() - 1]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Date, f64)> + '_ {
        self.dates.iter().copied().zip(self.values.iter().copied())
    }
}

/// One row of an asset or portfolio table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndexRow {
    pub date: Date,
    /// Close price (asset tables only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    /// Dividend paid on this date (asset tables only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dividend: Option<f64>,
    pub total_return_index: f64,
    pub log_return: f64,
    /// Undefined for the first `window` rows
    pub trailing_return: Option<f64>,
    pub running_max: f64,
    pub drawdown: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexTable {
    pub trailing_window: usize,
    pub rows: Vec<IndexRow>,
}

impl IndexTable {
    /// Most negative drawdown over the table (0.0 for a monotone index)
    #[must_use]
    pub fn max_drawdown(&self) -> f64 {
        self.rows
            .iter()
            .map(|r| r.drawdown)
            .fold(0.0, f64::min)
    }

    /// Trailing return on the last row, if the history covers the window
    #[must_use]
    pub fn latest_trailing_return(&self) -> Option<f64> {
        self.rows.last().and_then(|r| r.trailing_return)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
