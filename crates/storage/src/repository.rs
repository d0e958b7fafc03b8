use async_trait::async_trait;
use quiz_core::model::AverageRecord;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Key of the single row that holds the cumulative totals.
pub const AVERAGE_ROW_ID: i64 = 1;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// A scanned row of the averages table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AverageRow {
    pub id: i64,
    pub record: AverageRecord,
}

impl AverageRow {
    #[must_use]
    pub fn new(id: i64, record: AverageRecord) -> Self {
        Self { id, record }
    }
}

/// Repository contract for the cumulative rating totals.
///
/// Exactly one row (keyed by [`AVERAGE_ROW_ID`]) is expected to exist once
/// the first run has been recorded.
#[cfg_attr(feature = "mock", mockall::automock)]
#[async_trait]
pub trait AverageRepository: Send + Sync {
    /// Fetch every row currently stored, ordered by id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the rows cannot be read.
    async fn fetch_all_records(&self) -> Result<Vec<AverageRow>, StorageError>;

    /// Consume rows returned by `fetch_all_records`, reporting whether there were none.
    fn is_empty(&self, rows: Vec<AverageRow>) -> bool {
        rows.into_iter().next().is_none()
    }

    /// Seed the totals row. Only valid while no history exists.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Conflict` if the row already exists, or other storage errors.
    async fn insert_record(
        &self,
        questions_total: u32,
        positives_total: u32,
    ) -> Result<(), StorageError>;

    /// Read the persisted totals. When several rows exist the last one scanned wins.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if no row exists, or other storage errors.
    async fn fetch_persisted_totals(&self) -> Result<AverageRecord, StorageError>;

    /// Overwrite the totals of the row keyed by [`AVERAGE_ROW_ID`].
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the row does not exist, or other storage errors.
    async fn update_totals(
        &self,
        questions_total: u32,
        positives_total: u32,
    ) -> Result<(), StorageError>;
}

pub(crate) fn record_from_totals(
    questions_total: u32,
    positives_total: u32,
) -> Result<AverageRecord, StorageError> {
    AverageRecord::new(questions_total, positives_total)
        .map_err(|e| StorageError::Serialization(e.to_string()))
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    totals: Arc<Mutex<Option<AverageRecord>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self {
            totals: Arc::new(Mutex::new(None)),
        }
    }
}

#[async_trait]
impl AverageRepository for InMemoryRepository {
    async fn fetch_all_records(&self) -> Result<Vec<AverageRow>, StorageError> {
        let guard = self
            .totals
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard
            .iter()
            .map(|record| AverageRow::new(AVERAGE_ROW_ID, *record))
            .collect())
    }

    async fn insert_record(
        &self,
        questions_total: u32,
        positives_total: u32,
    ) -> Result<(), StorageError> {
        let record = record_from_totals(questions_total, positives_total)?;
        let mut guard = self
            .totals
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        if guard.is_some() {
            return Err(StorageError::Conflict);
        }
        *guard = Some(record);
        Ok(())
    }

    async fn fetch_persisted_totals(&self) -> Result<AverageRecord, StorageError> {
        let guard = self
            .totals
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.ok_or(StorageError::NotFound)
    }

    async fn update_totals(
        &self,
        questions_total: u32,
        positives_total: u32,
    ) -> Result<(), StorageError> {
        let record = record_from_totals(questions_total, positives_total)?;
        let mut guard = self
            .totals
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        match guard.as_mut() {
            Some(existing) => {
                *existing = record;
                Ok(())
            }
            None => Err(StorageError::NotFound),
        }
    }
}

/// Aggregates repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub averages: Arc<dyn AverageRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let averages: Arc<dyn AverageRepository> = Arc::new(InMemoryRepository::new());
        Self { averages }
    }
}
