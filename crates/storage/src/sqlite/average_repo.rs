use quiz_core::model::AverageRecord;

use super::SqliteRepository;
use super::mapping::{conn_err, map_average_row};
use crate::repository::{
    AVERAGE_ROW_ID, AverageRepository, AverageRow, StorageError, record_from_totals,
};

#[async_trait::async_trait]
impl AverageRepository for SqliteRepository {
    async fn fetch_all_records(&self) -> Result<Vec<AverageRow>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT uuid, questions, positives
            FROM averages
            ORDER BY uuid ASC
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(conn_err)?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            out.push(map_average_row(&row)?);
        }
        tracing::debug!(rows = out.len(), "fetched average rows");
        Ok(out)
    }

    async fn insert_record(
        &self,
        questions_total: u32,
        positives_total: u32,
    ) -> Result<(), StorageError> {
        record_from_totals(questions_total, positives_total)?;
        sqlx::query(
            r"
            INSERT INTO averages (uuid, questions, positives)
            VALUES (?1, ?2, ?3)
            ",
        )
        .bind(AVERAGE_ROW_ID)
        .bind(i64::from(questions_total))
        .bind(i64::from(positives_total))
        .execute(&self.pool)
        .await
        .map_err(conn_err)?;

        tracing::debug!(questions_total, positives_total, "inserted average row");
        Ok(())
    }

    async fn fetch_persisted_totals(&self) -> Result<AverageRecord, StorageError> {
        let rows = self.fetch_all_records().await?;
        rows.last()
            .map(|row| row.record)
            .ok_or(StorageError::NotFound)
    }

    async fn update_totals(
        &self,
        questions_total: u32,
        positives_total: u32,
    ) -> Result<(), StorageError> {
        record_from_totals(questions_total, positives_total)?;
        let res = sqlx::query(
            r"
            UPDATE averages
            SET questions = ?1, positives = ?2
            WHERE uuid = ?3
            ",
        )
        .bind(i64::from(questions_total))
        .bind(i64::from(positives_total))
        .bind(AVERAGE_ROW_ID)
        .execute(&self.pool)
        .await
        .map_err(conn_err)?;

        if res.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }
        tracing::debug!(questions_total, positives_total, "updated average row");
        Ok(())
    }
}
