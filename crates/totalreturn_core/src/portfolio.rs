//! Equal-weighted portfolio composite

use crate::align::join_all;
use crate::error::Result;
use crate::index_builder::index_table;
use crate::model::{IndexTable, TotalReturnIndex};

/// An equal-weighted composite and how it was assembled
#[derive(Debug, Clone, PartialEq)]
pub struct Portfolio {
    pub index: TotalReturnIndex,
    pub table: IndexTable,
    /// Rows of the longest constituent that did not survive the join
    pub dropped_dates: usize,
}

/// Mean of the constituent index values on every date they all share.
///
/// Fails with `Alignment` when there are no constituents or no common date.
pub fn equal_weighted_index(constituents: &[TotalReturnIndex]) -> Result<TotalReturnIndex> {
    let joined = join_all("portfolio constituents", constituents)?;
    let n = joined.columns.len() as f64;

    let values = (0..joined.dates.len())
        .map(|t| joined.columns.iter().map(|col| col[t]).sum::<f64>() / n)
        .collect();

    TotalReturnIndex::from_parts(joined.dates, values)
}

/// Build the composite and derive its table with the same formulas used
/// for single assets.
pub fn aggregate(constituents: &[TotalReturnIndex], trailing_window: usize) -> Result<Portfolio> {
    let index = equal_weighted_index(constituents)?;
    let longest = constituents
        .iter()
        .map(TotalReturnIndex::len)
        .max()
        .unwrap_or(0);
    let dropped_dates = longest - index.len();

    tracing::debug!(
        constituents = constituents.len(),
        rows = index.len(),
        dropped_dates,
        "aggregated equal-weighted portfolio"
    );

    let table = index_table(&index, trailing_window);
    Ok(Portfolio {
        index,
        table,
        dropped_dates,
    })
}
