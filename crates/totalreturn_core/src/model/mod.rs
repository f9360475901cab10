mod index;
mod results;
mod series;

pub use index::{IndexRow, IndexTable, TotalReturnIndex};
pub use results::{
    AnalysisReport, AnalysisWarning, AssetFailure, AssetReport, BootstrapOutcome,
    PortfolioSummary, RegressionDiagnostics, RegressionResult, WarningKind,
};
pub use series::{DividendEvent, PricePoint, PriceSeries};
