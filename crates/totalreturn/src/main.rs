use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::WrapErr;
use totalreturn::{JsonDirectorySource, Overrides, init_logging, load_config, summary_text, write_report};
use totalreturn_core::{AnalysisConfig, run_analysis};

#[derive(Parser, Debug)]
#[command(name = "totalreturn")]
#[command(about = "Total-return, risk and block-bootstrap analysis of an equal-weighted portfolio")]
struct Args {
    /// Scenario file (YAML); defaults are used for anything it leaves out
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory holding one <TICKER>.json price file per ticker
    #[arg(short, long, default_value = "data")]
    data_dir: PathBuf,

    /// Where to write the JSON report
    #[arg(short, long, default_value = "totalreturn_report.json")]
    output: PathBuf,

    /// Monte Carlo seed (overrides the scenario)
    #[arg(long)]
    seed: Option<u64>,

    /// Number of Monte Carlo runs (overrides the scenario)
    #[arg(long)]
    runs: Option<usize>,

    /// Log level (debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Directory for totalreturn.log (default: ~/.totalreturn/)
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

fn default_log_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".totalreturn")
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    let log_dir = args.log_dir.clone().unwrap_or_else(default_log_dir);
    init_logging(&log_dir, &args.log_level)?;

    let scenario = match &args.config {
        Some(path) => load_config(path)
            .wrap_err_with(|| format!("loading scenario {}", path.display()))?,
        None => AnalysisConfig::default(),
    };
    let overrides = Overrides {
        seed: args.seed,
        runs: args.runs,
    };
    let config = overrides.apply(scenario)?;

    tracing::info!(
        assets = config.universe.len(),
        benchmark = %config.benchmark,
        start = %config.start,
        end = %config.end,
        runs = config.monte_carlo_runs,
        seed = config.seed,
        "starting analysis"
    );

    let source = JsonDirectorySource::new(&args.data_dir);
    let report = run_analysis(&config, &source).wrap_err("analysis failed")?;

    write_report(&args.output, &report)
        .wrap_err_with(|| format!("writing report to {}", args.output.display()))?;
    tracing::info!(output = %args.output.display(), "report written");

    print!("{}", summary_text(&config, &report));
    println!();
    println!("Report written to {}", args.output.display());

    Ok(())
}
