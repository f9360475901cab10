//! On-disk market data
//!
//! Directory layout:
//! <data-dir>/
//!   MSFT.json
//!   SPY.json
//!   ...
//!
//! Each file holds one ticker's closes and dividend events:
//! `{"prices": [{"date": "2024-01-02", "close": 370.87}],
//!   "dividends": [{"date": "2024-02-14", "amount": 0.75}]}`

mod json_source;

pub use json_source::{JsonDirectorySource, PriceFile, PriceRecord};
