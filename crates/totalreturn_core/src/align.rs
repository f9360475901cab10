//! Date-keyed inner joins
//!
//! Series from different assets rarely share every trading day (listings,
//! halts, exchange holidays). Joins here keep only dates present on every
//! side, never fill or interpolate, and report how many rows each side lost.
//! An empty intersection is an `Alignment` error.

use jiff::civil::Date;
use rustc_hash::FxHashMap;

use crate::error::{CoreError, Result};
use crate::model::TotalReturnIndex;

/// Result of a two-way join, in the left side's date order
#[derive(Debug, Clone, PartialEq)]
pub struct Alignment {
    pub dates: Vec<Date>,
    pub left: Vec<f64>,
    pub right: Vec<f64>,
    pub left_dropped: usize,
    pub right_dropped: usize,
}

impl Alignment {
    #[must_use]
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    #[must_use]
    pub fn dropped(&self) -> usize {
        self.left_dropped + self.right_dropped
    }
}

/// Result of an n-way join: one column per input, all of `dates.len()` rows
#[derive(Debug, Clone, PartialEq)]
pub struct MultiAlignment {
    pub dates: Vec<Date>,
    pub columns: Vec<Vec<f64>>,
}

/// Inner-join two dated value series.
pub fn inner_join(
    context: &'static str,
    left: (&[Date], &[f64]),
    right: (&[Date], &[f64]),
) -> Result<Alignment> {
    let right_by_date: FxHashMap<Date, f64> =
        right.0.iter().copied().zip(right.1.iter().copied()).collect();

    let mut dates = Vec::with_capacity(left.0.len().min(right.0.len()));
    let mut left_values = Vec::with_capacity(dates.capacity());
    let mut right_values = Vec::with_capacity(dates.capacity());

    for (&date, &value) in left.0.iter().zip(left.1) {
        if let Some(&other) = right_by_date.get(&date) {
            dates.push(date);
            left_values.push(value);
            right_values.push(other);
        }
    }

    if dates.is_empty() {
        return Err(CoreError::Alignment {
            context,
            left_len: left.0.len(),
            right_len: right.0.len(),
        });
    }

    let left_dropped = left.0.len() - dates.len();
    let right_dropped = right.0.len() - dates.len();
    if left_dropped + right_dropped > 0 {
        tracing::debug!(context, left_dropped, right_dropped, "inner join dropped rows");
    }

    Ok(Alignment {
        dates,
        left: left_values,
        right: right_values,
        left_dropped,
        right_dropped,
    })
}

/// Inner-join two indices on date
pub fn join_indices(
    context: &'static str,
    left: &TotalReturnIndex,
    right: &TotalReturnIndex,
) -> Result<Alignment> {
    inner_join(
        context,
        (left.dates(), left.values()),
        (right.dates(), right.values()),
    )
}

/// Dates present in every input, in the first input's order
#[must_use]
pub fn intersect_dates(series: &[&[Date]]) -> Vec<Date> {
    let Some((first, rest)) = series.split_first() else {
        return Vec::new();
    };
    let mut counts: FxHashMap<Date, usize> = FxHashMap::default();
    for dates in rest {
        for date in *dates {
            *counts.entry(*date).or_insert(0) += 1;
        }
    }
    first
        .iter()
        .copied()
        .filter(|d| counts.get(d).copied().unwrap_or(0) == rest.len())
        .collect()
}

/// Inner-join any number of indices on date
pub fn join_all(context: &'static str, indices: &[TotalReturnIndex]) -> Result<MultiAlignment> {
    if indices.is_empty() {
        return Err(CoreError::Alignment {
            context,
            left_len: 0,
            right_len: 0,
        });
    }

    let date_sets: Vec<&[Date]> = indices.iter().map(TotalReturnIndex::dates).collect();
    let dates = intersect_dates(&date_sets);

    if dates.is_empty() {
        let shortest = indices.iter().map(TotalReturnIndex::len).min().unwrap_or(0);
        let longest = indices.iter().map(TotalReturnIndex::len).max().unwrap_or(0);
        return Err(CoreError::Alignment {
            context,
            left_len: longest,
            right_len: shortest,
        });
    }

    let columns = indices
        .iter()
        .map(|index| {
            let by_date: FxHashMap<Date, f64> = index.iter().collect();
            dates.iter().map(|d| by_date[d]).collect()
        })
        .collect();

    Ok(MultiAlignment { dates, columns })
}
