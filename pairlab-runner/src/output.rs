//! Result output: the pairs file and the optional JSON run report.
//!
//! Both are written atomically (write to a sibling .tmp, rename into place),
//! so a reader never sees a partial file and each run replaces the last one.

use crate::config::PipelineConfig;
use crate::error::RunError;
use crate::pipeline::{PipelineOutcome, StageCounts};
use crate::universe::{ExcludedSymbol, Universe};
use pairlab_core::domain::{PairStats, ScreenResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Current schema version of the JSON report.
pub const REPORT_SCHEMA_VERSION: u32 = 1;

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), RunError> {
    let output_error = |source| RunError::Output {
        path: path.to_path_buf(),
        source,
    };
    let tmp = tmp_path(path);

    let written = fs::File::create(&tmp).and_then(|mut file| {
        file.write_all(bytes)?;
        file.sync_all()
    });
    if let Err(e) = written {
        let _ = fs::remove_file(&tmp);
        return Err(output_error(e));
    }

    fs::rename(&tmp, path).map_err(|e| {
        let _ = fs::remove_file(&tmp);
        output_error(e)
    })
}

/// One `symbol_a,symbol_b` line per surviving pair, in survivor order.
pub fn format_pairs(survivors: &[ScreenResult]) -> String {
    survivors
        .iter()
        .map(|r| format!("{}\n", r.pair))
        .collect()
}

pub fn write_pairs(path: &Path, survivors: &[ScreenResult]) -> Result<(), RunError> {
    write_atomic(path, format_pairs(survivors).as_bytes())
}

/// A surviving pair with its statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairReport {
    pub symbol_a: String,
    pub symbol_b: String,
    #[serde(flatten)]
    pub stats: PairStats,
}

/// Everything needed to audit or reproduce a run. Contains no timestamps,
/// so identical inputs give byte-identical reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub schema_version: u32,
    /// BLAKE3 over the admitted price data.
    pub dataset_hash: String,
    /// BLAKE3 over the configuration.
    pub config_hash: String,
    pub symbols_requested: usize,
    pub symbols_admitted: Vec<String>,
    pub excluded: Vec<ExcludedSymbol>,
    pub counts: StageCounts,
    pub pairs: Vec<PairReport>,
    pub config: PipelineConfig,
}

/// Deterministic hash of a configuration.
pub fn config_hash(config: &PipelineConfig) -> Result<String, RunError> {
    let json = serde_json::to_string(config)?;
    Ok(blake3::hash(json.as_bytes()).to_hex().to_string())
}

impl RunReport {
    pub fn new(
        universe: &Universe,
        outcome: &PipelineOutcome,
        config: &PipelineConfig,
    ) -> Result<Self, RunError> {
        Ok(Self {
            schema_version: REPORT_SCHEMA_VERSION,
            dataset_hash: universe.store.fingerprint(),
            config_hash: config_hash(config)?,
            symbols_requested: universe.requested,
            symbols_admitted: universe.store.symbols().into_iter().map(String::from).collect(),
            excluded: universe.excluded.clone(),
            counts: outcome.counts.clone(),
            pairs: outcome
                .survivors
                .iter()
                .map(|r| PairReport {
                    symbol_a: r.pair.symbol_a.clone(),
                    symbol_b: r.pair.symbol_b.clone(),
                    stats: r.stats.clone(),
                })
                .collect(),
            config: config.clone(),
        })
    }
}

pub fn write_report(path: &Path, report: &RunReport) -> Result<(), RunError> {
    let mut json = serde_json::to_string_pretty(report)?;
    json.push('\n');
    write_atomic(path, json.as_bytes())
}
