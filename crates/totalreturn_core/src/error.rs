use std::fmt;

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

/// Errors raised by the individual computations (index build, joins,
/// regression, bootstrap). Each one is terminal to the computation that
/// produced it.
#[derive(Debug, Clone, PartialEq)]
pub enum CoreError {
    /// Empty or malformed input series
    Data(String),
    /// A required date intersection came out empty
    Alignment {
        context: &'static str,
        left_len: usize,
        right_len: usize,
    },
    /// Too few paired samples for the regression
    InsufficientData { required: usize, actual: usize },
    /// History shorter than one bootstrap block
    InsufficientHistory {
        block_size: usize,
        history_len: usize,
    },
    /// Invalid parameter passed to a computation
    Config(String),
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoreError::Data(msg) => write!(f, "data error: {msg}"),
            CoreError::Alignment {
                context,
                left_len,
                right_len,
            } => write!(
                f,
                "alignment error: {context} has no shared dates ({left_len} vs {right_len} rows)"
            ),
            CoreError::InsufficientData { required, actual } => write!(
                f,
                "insufficient data: {actual} paired samples, at least {required} required"
            ),
            CoreError::InsufficientHistory {
                block_size,
                history_len,
            } => write!(
                f,
                "insufficient history: {history_len} returns is shorter than block size {block_size}"
            ),
            CoreError::Config(msg) => write!(f, "configuration error: {msg}"),
        }
    }
}

impl std::error::Error for CoreError {}

pub type Result<T> = std::result::Result<T, CoreError>;

/// Pipeline stage a failure is attributed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stage {
    Load,
    BuildIndex,
    Aggregate,
    RiskStatistics,
    Simulate,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Load => "load",
            Stage::BuildIndex => "build index",
            Stage::Aggregate => "aggregate",
            Stage::RiskStatistics => "risk statistics",
            Stage::Simulate => "simulate",
        };
        f.write_str(name)
    }
}

/// Errors from the full analysis pipeline, attributed to an asset, the
/// benchmark or a portfolio-level stage.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisError {
    Asset {
        ticker: String,
        start: Date,
        end: Date,
        stage: Stage,
        source: CoreError,
    },
    Benchmark {
        ticker: String,
        start: Date,
        end: Date,
        stage: Stage,
        source: CoreError,
    },
    Portfolio {
        start: Date,
        end: Date,
        stage: Stage,
        source: CoreError,
    },
    /// Every constituent of the universe failed
    NoUsableAssets { attempted: usize },
    Config(String),
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisError::Asset {
                ticker,
                start,
                end,
                stage,
                source,
            } => write!(f, "asset {ticker} ({start}..={end}) failed at {stage}: {source}"),
            AnalysisError::Benchmark {
                ticker,
                start,
                end,
                stage,
                source,
            } => write!(
                f,
                "benchmark {ticker} ({start}..={end}) failed at {stage}: {source}"
            ),
            AnalysisError::Portfolio {
                start,
                end,
                stage,
                source,
            } => write!(f, "portfolio ({start}..={end}) failed at {stage}: {source}"),
            AnalysisError::NoUsableAssets { attempted } => {
                write!(f, "none of the {attempted} assets produced a usable index")
            }
            AnalysisError::Config(msg) => write!(f, "configuration error: {msg}"),
        }
    }
}

impl std::error::Error for AnalysisError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AnalysisError::Asset { source, .. }
            | AnalysisError::Benchmark { source, .. }
            | AnalysisError::Portfolio { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl AnalysisError {
    /// The underlying computation error, if any
    #[must_use]
    pub fn core_error(&self) -> Option<&CoreError> {
        match self {
            AnalysisError::Asset { source, .. }
            | AnalysisError::Benchmark { source, .. }
            | AnalysisError::Portfolio { source, .. } => Some(source),
            _ => None,
        }
    }

    /// Stage the failure is attributed to
    #[must_use]
    pub fn stage(&self) -> Option<Stage> {
        match self {
            AnalysisError::Asset { stage, .. }
            | AnalysisError::Benchmark { stage, .. }
            | AnalysisError::Portfolio { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}
