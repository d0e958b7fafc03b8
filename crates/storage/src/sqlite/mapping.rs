use sqlx::Row;

use crate::repository::{AverageRow, StorageError, record_from_totals};

fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

fn u32_from_i64(field: &'static str, v: i64) -> Result<u32, StorageError> {
    u32::try_from(v).map_err(|_| StorageError::Serialization(format!("invalid {field}: {v}")))
}

pub(crate) fn map_average_row(row: &sqlx::sqlite::SqliteRow) -> Result<AverageRow, StorageError> {
    let id: i64 = row.try_get("uuid").map_err(ser)?;
    let questions = u32_from_i64("questions", row.try_get::<i64, _>("questions").map_err(ser)?)?;
    let positives = u32_from_i64("positives", row.try_get::<i64, _>("positives").map_err(ser)?)?;
    Ok(AverageRow::new(id, record_from_totals(questions, positives)?))
}

pub(crate) fn conn_err(e: sqlx::Error) -> StorageError {
    if e.as_database_error().is_some_and(|db| db.is_unique_violation()) {
        return StorageError::Conflict;
    }
    StorageError::Connection(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_counts_are_rejected() {
        let err = u32_from_i64("questions", -1).unwrap_err();
        assert!(matches!(err, StorageError::Serialization(msg) if msg == "invalid questions: -1"));
    }

    #[test]
    fn pool_errors_map_to_connection() {
        let err = conn_err(sqlx::Error::PoolTimedOut);
        assert!(matches!(err, StorageError::Connection(_)));
    }
}
