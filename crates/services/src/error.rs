//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::AverageError;
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted while folding a run into the persisted average.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AggregationError {
    #[error("run has {positives} positive answers but only {counted} questions are counted per run")]
    RunTooLarge { positives: u32, counted: u32 },
    /// Listing the stored rows failed; passed through untouched.
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("unable to persist current average: {0}")]
    Persist(#[source] StorageError),
    #[error("unable to retrieve persisted totals: {0}")]
    Retrieve(#[source] StorageError),
    #[error("unable to update average: {0}")]
    Update(#[source] StorageError),
    #[error(transparent)]
    Fold(#[from] AverageError),
}

/// Errors emitted while presenting ratings to the user.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PresentationError {
    #[error("something went wrong calculating your average score: {0}")]
    Average(#[source] AggregationError),
    #[error("failed to write ratings: {0}")]
    Output(#[from] std::io::Error),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
}
