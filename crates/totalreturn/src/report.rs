//! Report output: the JSON artifact and the console summary

use std::fmt::Write as _;
use std::io;
use std::path::Path;

use totalreturn_core::AnalysisConfig;
use totalreturn_core::model::AnalysisReport;

use crate::util::format::{format_multiple, format_percentage, format_ratio};
use crate::util::io::atomic_write;

/// Write the full report as pretty-printed JSON
pub fn write_report(path: &Path, report: &AnalysisReport) -> io::Result<()> {
    let json = serde_json::to_vec_pretty(report).map_err(io::Error::other)?;
    atomic_write(path, &json)
}

/// Human-readable summary for the console
pub fn summary_text(config: &AnalysisConfig, report: &AnalysisReport) -> String {
    let summary = &report.summary;
    let mut out = String::new();

    let tickers: Vec<&str> = report.assets.iter().map(|a| a.ticker.as_str()).collect();
    let _ = writeln!(
        out,
        "Equal-weighted portfolio of {} assets: {}",
        tickers.len(),
        tickers.join(", ")
    );
    if let (Some(first), Some(last)) = (report.portfolio.rows.first(), report.portfolio.rows.last())
    {
        let _ = writeln!(
            out,
            "Common history: {} to {} ({} rows)",
            first.date,
            last.date,
            report.portfolio.len()
        );
    }
    let _ = writeln!(out, "Benchmark: {}", report.benchmark.ticker);
    let _ = writeln!(out);

    let _ = writeln!(out, "Beta:                 {}", format_ratio(summary.beta));
    let _ = writeln!(
        out,
        "Alpha (annualized):   {}",
        format_percentage(summary.alpha_annualized)
    );
    let _ = writeln!(out, "Sharpe:               {}", format_ratio(summary.sharpe));
    let _ = writeln!(
        out,
        "Max drawdown:         {}",
        format_percentage(summary.max_drawdown)
    );
    let trailing = summary
        .latest_trailing_return
        .map_or_else(|| "n/a".to_string(), format_percentage);
    let _ = writeln!(
        out,
        "Trailing {}-period:   {}",
        report.portfolio.trailing_window, trailing
    );
    let _ = writeln!(out);

    let _ = writeln!(
        out,
        "Monte Carlo ({} runs, {}-year horizon, block {}):",
        report.monte_carlo.len(),
        config.horizon_years,
        config.block_size
    );
    let _ = writeln!(
        out,
        "  p5 {}   median {}   p95 {}",
        format_multiple(summary.mc_p5),
        format_multiple(summary.mc_median),
        format_multiple(summary.mc_p95)
    );

    if !report.failures.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Skipped assets:");
        for failure in &report.failures {
            let _ = writeln!(
                out,
                "  {} ({}): {}",
                failure.ticker, failure.stage, failure.error
            );
        }
    }

    if !report.warnings.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Warnings:");
        for warning in &report.warnings {
            let _ = writeln!(out, "  - {}", warning.message);
        }
    }

    out
}
