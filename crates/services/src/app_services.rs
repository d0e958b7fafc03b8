use std::sync::Arc;

use storage::repository::Storage;
use storage::sqlite::SqliteRepository;

use crate::error::AppServicesError;
use crate::rating_service::RatingService;

/// Assembles app-facing services and owns the storage connection.
#[derive(Clone)]
pub struct AppServices {
    rating: Arc<RatingService>,
    sqlite: Option<SqliteRepository>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the connection or migrations fail.
    pub async fn new_sqlite(db_url: &str) -> Result<Self, AppServicesError> {
        let repo = SqliteRepository::connect(db_url).await?;
        repo.migrate().await?;
        let storage = Storage::from_sqlite(repo.clone());

        Ok(Self {
            rating: Arc::new(RatingService::new(Arc::clone(&storage.averages))),
            sqlite: Some(repo),
        })
    }

    /// Build services over volatile in-memory storage.
    #[must_use]
    pub fn in_memory() -> Self {
        let storage = Storage::in_memory();
        Self {
            rating: Arc::new(RatingService::new(storage.averages)),
            sqlite: None,
        }
    }

    #[must_use]
    pub fn rating(&self) -> Arc<RatingService> {
        Arc::clone(&self.rating)
    }

    /// Release the storage connection.
    pub async fn shutdown(self) {
        if let Some(repo) = self.sqlite {
            repo.close().await;
        }
    }
}
