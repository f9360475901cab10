//! Raw per-asset input series
//!
//! A `PriceSeries` is what a market-data source hands to the core: one row
//! per trading date with the close and the dividend paid on that date.
//! Rows are expected in ascending, unique date order. That is a caller
//! precondition and is not re-checked here.

use jiff::civil::Date;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// One trading day of an asset
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: Date,
    pub close: f64,
    #[serde(default)]
    pub dividend: f64,
}

impl PricePoint {
    #[must_use]
    pub fn new(date: Date, close: f64, dividend: f64) -> Self {
        Self {
            date,
            close,
            dividend,
        }
    }
}

/// A dividend payment as reported by a data source, before it is attached
/// to a trading date
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DividendEvent {
    pub date: Date,
    pub amount: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    #[must_use]
    pub fn new(points: Vec<PricePoint>) -> Self {
        Self { points }
    }

    /// Build a series of closes with no dividends
    #[must_use]
    pub fn from_closes(rows: &[(Date, f64)]) -> Self {
        Self {
            points: rows
                .iter()
                .map(|&(date, close)| PricePoint::new(date, close, 0.0))
                .collect(),
        }
    }

    /// Attach dividend events to the matching trading dates.
    ///
    /// Amounts on the same trading date are summed. Events that fall on a
    /// date with no price row are dropped; the number dropped is returned
    /// alongside the new series.
    #[must_use]
    pub fn with_dividends(mut self, events: &[DividendEvent]) -> (Self, usize) {
        let by_date: FxHashMap<Date, usize> = self
            .points
            .iter()
            .enumerate()
            .map(|(i, p)| (p.date, i))
            .collect();

        let mut dropped = 0;
        for event in events {
            match by_date.get(&event.date) {
                Some(&i) => self.points[i].dividend += event.amount,
                None => dropped += 1,
            }
        }
        (self, dropped)
    }

    /// Rows with `start <= date <= end`
    #[must_use]
    pub fn restrict(&self, start: Date, end: Date) -> Self {
        Self {
            points: self
                .points
                .iter()
                .filter(|p| p.date >= start && p.date <= end)
                .copied()
                .collect(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[must_use]
    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn dates(&self) -> impl Iterator<Item = Date> + '_ {
        self.points.iter().map(|p| p.date)
    }

    #[must_use]
    pub fn first_date(&self) -> Option<Date> {
        self.points.first().map(|p| p.date)
    }

    #[must_use]
    pub fn last_date(&self) -> Option<Date> {
        self.points.last().map(|p| p.date)
    }
}
