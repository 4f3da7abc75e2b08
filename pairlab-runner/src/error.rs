//! Fatal run errors. Per-pair and per-symbol failures never surface here.

use crate::config::ConfigError;
use pairlab_core::data::DataError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RunError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("cannot read symbol list {path}: {source}")]
    SymbolList {
        path: PathBuf,
        #[source]
        source: DataError,
    },

    #[error("no symbol was admitted ({requested} requested); nothing to screen")]
    EmptyUniverse { requested: usize },

    #[error("cannot write {path}: {source}")]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot serialize run report: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("cannot build worker pool: {0}")]
    ThreadPool(String),
}
