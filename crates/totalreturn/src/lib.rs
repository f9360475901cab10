//! Command-line front end for `totalreturn_core`
//!
//! Reads a YAML scenario and a directory of per-ticker JSON price files,
//! runs the analysis, and writes the full report as a single JSON artifact.

pub mod config;
pub mod data;
pub mod logging;
pub mod report;
pub mod util;

pub use config::{ConfigError, Overrides, load_config};
pub use data::JsonDirectorySource;
pub use logging::init_logging;
pub use report::{summary_text, write_report};
