//! Scenario tests for the analysis engine
//!
//! Tests are organized by topic:
//! - `properties` - Invariants of the index, aggregation, regression and
//!   bootstrap stages over generated series
//! - `pipeline` - End-to-end runs through `run_analysis`, including
//!   per-asset failure scoping

mod pipeline;

use jiff::ToSpan;
use jiff::civil::{Date, Weekday};
use rand::{Rng, SeedableRng, rngs::SmallRng};

use crate::model::{PricePoint, PriceSeries};

/// Weekdays starting at `start`, `n` of them
pub(crate) fn trading_days(start: Date, n: usize) -> Vec<Date> {
    let mut days = Vec::with_capacity(n);
    let mut d = start;
    while days.len() < n {
        if !matches!(d.weekday(), Weekday::Saturday | Weekday::Sunday) {
            days.push(d);
        }
        d = d.checked_add(1.day()).unwrap();
    }
    days
}

/// A random-walk price series with a quarterly dividend
pub(crate) fn synthetic_series(seed: u64, start: Date, n: usize, drift: f64) -> PriceSeries {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut price = 50.0 + rng.random_range(0.0..100.0);
    let points = trading_days(start, n)
        .into_iter()
        .enumerate()
        .map(|(i, date)| {
            if i > 0 {
                price *= 1.0 + drift + rng.random_range(-0.03..0.03);
            }
            let dividend = if i > 0 && i % 63 == 0 { price * 0.005 } else { 0.0 };
            PricePoint::new(date, price, dividend)
        })
        .collect();
    PriceSeries::new(points)
}
