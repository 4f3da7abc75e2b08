//! PairLab Runner: universe acquisition, the screening pipeline, and output.
//!
//! This crate builds on `pairlab-core` to provide:
//! - TOML pipeline configuration with validation
//! - Concurrent, order-preserving symbol acquisition
//! - The staged screen (cointegration, Hurst, half-life, mean crossings)
//! - Atomic pairs-file and JSON report output

pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod scan;
pub mod universe;

pub use config::{ConfigError, DataConfig, PipelineConfig, RunSettings};
pub use error::RunError;
pub use output::{write_pairs, write_report, PairReport, RunReport, REPORT_SCHEMA_VERSION};
pub use pipeline::{run_pipeline, PipelineOutcome, StageCounts, StageTally};
pub use scan::{run_scan, ScanRequest, ScanSummary};
pub use universe::{acquire_universe, ExcludedSymbol, Universe};
