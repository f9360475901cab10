//! Total-return index construction
//!
//! Dividends are reinvested at the close of the day they are paid. There is
//! no ex-date or settlement lag.

use crate::error::{CoreError, Result};
use crate::model::{IndexRow, IndexTable, PriceSeries, TotalReturnIndex};

/// Build the cumulative total-return index of one asset.
///
/// `index[0] = 1.0`; each later value compounds the price factor (1.0 when
/// the previous close is zero) and, on dividend days with a non-zero close,
/// the reinvestment factor `1 + dividend / close`.
///
/// Price factors are applied against the last anchor (start, reinvestment
/// or zero-close day) instead of being chained daily, so a stretch without
/// dividends evaluates to exactly `anchor_value * close[t] / close[anchor]`.
pub fn build_index(series: &PriceSeries) -> Result<TotalReturnIndex> {
    let points = series.points();
    if points.is_empty() {
        return Err(CoreError::Data("price series is empty".to_string()));
    }
    if let Some(bad) = points
        .iter()
        .find(|p| !p.close.is_finite() || !p.dividend.is_finite())
    {
        return Err(CoreError::Data(format!(
            "non-finite price or dividend on {}",
            bad.date
        )));
    }

    let mut values = Vec::with_capacity(points.len());
    values.push(1.0);

    // Every close from the anchor up to the previous day is non-zero
    // whenever the previous close is.
    let mut anchor_value = 1.0;
    let mut anchor_close = points[0].close;

    for w in points.windows(2) {
        let (prev, cur) = (&w[0], &w[1]);
        let mut reanchor = false;
        let mut cumulative = if prev.close != 0.0 {
            anchor_value * cur.close / anchor_close
        } else {
            reanchor = true;
            values[values.len() - 1]
        };
        if cur.dividend > 0.0 && cur.close != 0.0 {
            cumulative *= 1.0 + cur.dividend / cur.close;
            reanchor = true;
        }
        if reanchor {
            anchor_value = cumulative;
            anchor_close = cur.close;
        }
        values.push(cumulative);
    }

    TotalReturnIndex::from_parts(series.dates().collect(), values)
}

/// `ln(v[t] / v[t-1])`, with 0.0 in the first slot
#[must_use]
pub fn log_returns(values: &[f64]) -> Vec<f64> {
    if values.is_empty() {
        return Vec::new();
    }
    let mut out = Vec::with_capacity(values.len());
    out.push(0.0);
    out.extend(values.windows(2).map(|w| (w[1] / w[0]).ln()));
    out
}

/// `v[t] / v[t-window] - 1` where the lookback exists, `None` otherwise
#[must_use]
pub fn trailing_returns(values: &[f64], window: usize) -> Vec<Option<f64>> {
    values
        .iter()
        .enumerate()
        .map(|(t, v)| {
            t.checked_sub(window)
                .map(|start| v / values[start] - 1.0)
        })
        .collect()
}

#[must_use]
pub fn running_max(values: &[f64]) -> Vec<f64> {
    values
        .iter()
        .scan(f64::NEG_INFINITY, |peak, &v| {
            *peak = peak.max(v);
            Some(*peak)
        })
        .collect()
}

/// `v[t] / running_max[t] - 1`; never positive, exactly 0.0 at a new peak
#[must_use]
pub fn drawdowns(values: &[f64]) -> Vec<f64> {
    values
        .iter()
        .zip(running_max(values))
        .map(|(v, peak)| v / peak - 1.0)
        .collect()
}

/// Derived series of an index, without price columns
#[must_use]
pub fn index_table(index: &TotalReturnIndex, trailing_window: usize) -> IndexTable {
    derive_table(index, trailing_window, None)
}

/// Derived series of an index together with the asset's price and
/// dividend columns
#[must_use]
pub fn asset_table(
    series: &PriceSeries,
    index: &TotalReturnIndex,
    trailing_window: usize,
) -> IndexTable {
    derive_table(index, trailing_window, Some(series))
}

fn derive_table(
    index: &TotalReturnIndex,
    trailing_window: usize,
    series: Option<&PriceSeries>,
) -> IndexTable {
    let values = index.values();
    let logs = log_returns(values);
    let trailing = trailing_returns(values, trailing_window);
    let peaks = running_max(values);

    let rows = index
        .iter()
        .enumerate()
        .map(|(t, (date, value))| {
            let point = series.and_then(|s| s.points().get(t));
            IndexRow {
                date,
                price: point.map(|p| p.close),
                dividend: point.map(|p| p.dividend),
                total_return_index: value,
                log_return: logs[t],
                trailing_return: trailing[t],
                running_max: peaks[t],
                drawdown: value / peaks[t] - 1.0,
            }
        })
        .collect();

    IndexTable {
        trailing_window,
        rows,
    }
}
