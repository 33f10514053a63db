use std::path::PathBuf;

use thiserror::Error;

use crate::store::StoreError;

/// Failures that end a run. Per-file and per-point problems are logged and
/// skipped instead.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("no gpx files found in {} matching {}", .dir.display(), .filters.join(", "))]
    NoInputFiles { dir: PathBuf, filters: Vec<String> },

    #[error("invalid file filter: {0}")]
    InvalidFilter(#[from] glob::PatternError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("failed to start worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
}
