//! Scenario files
//!
//! A scenario is a YAML rendering of `AnalysisConfig`. Every field is
//! optional; missing fields take their defaults, and command-line flags are
//! applied on top.
//!
//! ```yaml
//! universe: [MSFT, NVDA, GOOGL]
//! benchmark: SPY
//! start: 2010-01-01
//! end: 2024-12-31
//! monte_carlo_runs: 1000
//! failure_policy: abort
//! ```

use std::fs;
use std::path::Path;

use totalreturn_core::{AnalysisBuilder, AnalysisConfig, AnalysisError};

#[derive(Debug)]
pub enum ConfigError {
    Io(String),
    Parse(String),
    Invalid(AnalysisError),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(msg) => write!(f, "IO error: {msg}"),
            ConfigError::Parse(msg) => write!(f, "Parse error: {msg}"),
            ConfigError::Invalid(err) => write!(f, "Invalid scenario: {err}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Invalid(err) => Some(err),
            _ => None,
        }
    }
}

/// Parse a scenario from YAML text
pub fn parse_config(yaml: &str) -> Result<AnalysisConfig, ConfigError> {
    serde_saphyr::from_str(yaml).map_err(|e| ConfigError::Parse(e.to_string()))
}

/// Read a scenario file
pub fn load_config(path: &Path) -> Result<AnalysisConfig, ConfigError> {
    let content = fs::read_to_string(path)
        .map_err(|e| ConfigError::Io(format!("Failed to read {}: {e}", path.display())))?;
    parse_config(&content)
}

/// Command-line values that take precedence over the scenario file
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub seed: Option<u64>,
    pub runs: Option<usize>,
}

impl Overrides {
    /// Apply the overrides and validate the result
    pub fn apply(&self, config: AnalysisConfig) -> Result<AnalysisConfig, ConfigError> {
        let mut builder = AnalysisBuilder::from_config(config);
        if let Some(seed) = self.seed {
            builder = builder.seed(seed);
        }
        if let Some(runs) = self.runs {
            builder = builder.monte_carlo_runs(runs);
        }
        builder.build().map_err(ConfigError::Invalid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::civil::date;
    use tempfile::tempdir;
    use totalreturn_core::FailurePolicy;

    #[test]
    fn test_partial_scenario_keeps_defaults() {
        let config = parse_config(
            "universe: [AAA, BBB]\nbenchmark: IDX\nstart: 2010-01-04\nfailure_policy: abort\n",
        )
        .unwrap();

        assert_eq!(config.universe, vec!["AAA", "BBB"]);
        assert_eq!(config.benchmark, "IDX");
        assert_eq!(config.start, date(2010, 1, 4));
        assert_eq!(config.failure_policy, FailurePolicy::Abort);

        let defaults = AnalysisConfig::default();
        assert_eq!(config.end, defaults.end);
        assert_eq!(config.block_size, defaults.block_size);
        assert_eq!(config.monte_carlo_runs, defaults.monte_carlo_runs);
    }

    #[test]
    fn test_load_config_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("scenario.yaml");
        fs::write(&path, "monte_carlo_runs: 50\nseed: 9\n").unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.monte_carlo_runs, 50);
        assert_eq!(config.seed, 9);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempdir().unwrap();
        let err = load_config(&dir.path().join("nope.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_malformed_yaml_is_parse_error() {
        let err = parse_config("block_size: [1, 2").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_overrides_win_and_are_validated() {
        let overrides = Overrides {
            seed: Some(1234),
            runs: Some(10),
        };
        let config = overrides.apply(AnalysisConfig::default()).unwrap();
        assert_eq!(config.seed, 1234);
        assert_eq!(config.monte_carlo_runs, 10);

        let zero_runs = Overrides {
            seed: None,
            runs: Some(0),
        };
        let err = zero_runs.apply(AnalysisConfig::default()).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }
}
