//! End-to-end scan: symbol list → universe → pipeline → pairs file.
//!
//! All inputs arrive explicitly (paths, config, provider, as-of date); there
//! is no hidden global state. Outputs are only written after screening
//! finishes, so a fatal error leaves any previous results untouched.

use crate::config::PipelineConfig;
use crate::error::RunError;
use crate::output::{write_pairs, write_report, RunReport};
use crate::pipeline::{run_pipeline, PipelineOutcome};
use crate::universe::{acquire_universe, Universe};
use chrono::NaiveDate;
use pairlab_core::data::{read_symbols, DataProvider, DownloadProgress};
use std::path::PathBuf;
use tracing::info;

/// Where to read and write, and the last date of the price window.
#[derive(Debug, Clone)]
pub struct ScanRequest {
    pub symbols_path: PathBuf,
    pub output_path: PathBuf,
    pub report_path: Option<PathBuf>,
    pub as_of: NaiveDate,
}

/// Everything a scan produced, for callers that want more than the files.
#[derive(Debug, Clone)]
pub struct ScanSummary {
    pub universe: Universe,
    pub outcome: PipelineOutcome,
}

impl ScanSummary {
    pub fn pair_count(&self) -> usize {
        self.outcome.survivors.len()
    }
}

pub fn run_scan(
    request: &ScanRequest,
    config: &PipelineConfig,
    provider: &dyn DataProvider,
    progress: &dyn DownloadProgress,
) -> Result<ScanSummary, RunError> {
    config.validate()?;

    let symbols = read_symbols(&request.symbols_path).map_err(|source| RunError::SymbolList {
        path: request.symbols_path.clone(),
        source,
    })?;
    info!(
        symbols = symbols.len(),
        provider = provider.name(),
        as_of = %request.as_of,
        "starting scan"
    );

    let universe = acquire_universe(&symbols, provider, &config.data, request.as_of, progress)?;
    let outcome = run_pipeline(&universe.store, config)?;

    // The report goes first: if it fails, the pairs file is left as it was.
    if let Some(report_path) = &request.report_path {
        let report = RunReport::new(&universe, &outcome, config)?;
        write_report(report_path, &report)?;
    }
    write_pairs(&request.output_path, &outcome.survivors)?;

    info!(
        pairs = outcome.survivors.len(),
        output = %request.output_path.display(),
        "scan complete"
    );

    Ok(ScanSummary { universe, outcome })
}
