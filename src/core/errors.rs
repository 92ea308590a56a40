/*!
# Error System for Path Context Extractor

Setup-failure taxonomy for the extraction pipeline. Per-file I/O problems
are logged and skipped by the worker pool and never surface here; only
errors that must abort the run before any worker starts are modeled.
*/

use std::path::PathBuf;
use thiserror::Error;

/// Fatal errors detected during startup, before the worker pool runs.
///
/// Every variant maps to process exit code 1.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("root directory does not exist: {0}")]
    MissingRoot(PathBuf),

    #[error("no C/C++ source files found under {0}")]
    NoEligibleFiles(PathBuf),

    #[error("path vocabulary is empty; run a build pass first")]
    EmptyPathVocabulary,
}
