use mockall::predicate::eq;
use quiz_core::model::{AverageRecord, Question};
use quiz_core::rating::compute_immediate_score;
use services::{AggregationError, PresentationError, RatingService, compute_average_rating};
use storage::repository::{
    AverageRepository, AverageRow, InMemoryRepository, MockAverageRepository, StorageError,
};
use std::sync::Arc;

fn run(positives: usize) -> Vec<Question> {
    (0..5)
        .map(|i| Question::new(format!("Q{i}")).unwrap().answered(i < positives))
        .collect()
}

fn totals(q: u32, p: u32) -> AverageRecord {
    AverageRecord::new(q, p).unwrap()
}

#[tokio::test]
async fn first_run_seeds_history_and_keeps_current_score() {
    let repo = InMemoryRepository::new();
    let current = compute_immediate_score(&run(3));
    assert_eq!(current.immediate_score, "60");

    let average = compute_average_rating(&repo, &current.immediate_score, current.positive_count)
        .await
        .unwrap();

    assert_eq!(average, "60");
    let rows = repo.fetch_all_records().await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].record, totals(5, 3));
}

#[tokio::test]
async fn second_run_folds_into_history() {
    let repo = InMemoryRepository::new();
    repo.insert_record(5, 3).await.unwrap();

    let average = compute_average_rating(&repo, "80", 4).await.unwrap();

    assert_eq!(average, "70");
    assert_eq!(repo.fetch_persisted_totals().await.unwrap(), totals(10, 7));
}

#[tokio::test]
async fn perfect_run_over_existing_history_rounds_up() {
    let repo = InMemoryRepository::new();
    repo.insert_record(10, 8).await.unwrap();

    let average = compute_average_rating(&repo, "100", 5).await.unwrap();

    assert_eq!(average, "87");
    assert_eq!(repo.fetch_persisted_totals().await.unwrap(), totals(15, 13));
}

#[tokio::test]
async fn fold_matches_rounded_percentage_for_many_histories() {
    for (q, p) in [(5, 0), (5, 5), (20, 13), (35, 1), (100, 99)] {
        for run_positives in 0..=5 {
            let repo = InMemoryRepository::new();
            repo.insert_record(q, p).await.unwrap();

            let average = compute_average_rating(&repo, "0", run_positives)
                .await
                .unwrap();

            let expected =
                100.0 * (f64::from(p + run_positives) / f64::from(q + 5));
            assert_eq!(average, format!("{expected:.0}"));
            assert_eq!(
                repo.fetch_persisted_totals().await.unwrap(),
                totals(q + 5, p + run_positives)
            );
        }
    }
}

#[tokio::test]
async fn fetch_failure_propagates_without_mutation() {
    let mut mock = MockAverageRepository::new();
    mock.expect_fetch_all_records()
        .times(1)
        .returning(|| Err(StorageError::Connection("connection severed".into())));
    mock.expect_insert_record().never();
    mock.expect_update_totals().never();

    let err = compute_average_rating(&mock, "60", 3).await.unwrap_err();

    assert!(matches!(
        err,
        AggregationError::Storage(StorageError::Connection(_))
    ));
    assert_eq!(err.to_string(), "connection error: connection severed");
}

#[tokio::test]
async fn insert_failure_is_wrapped() {
    let mut mock = MockAverageRepository::new();
    mock.expect_fetch_all_records().returning(|| Ok(Vec::new()));
    mock.expect_is_empty().returning(|rows| rows.is_empty());
    mock.expect_insert_record()
        .with(eq(5), eq(3))
        .times(1)
        .returning(|_, _| Err(StorageError::Connection("disk full".into())));

    let err = compute_average_rating(&mock, "60", 3).await.unwrap_err();

    assert!(matches!(err, AggregationError::Persist(_)));
    assert_eq!(
        err.to_string(),
        "unable to persist current average: connection error: disk full"
    );
}

#[tokio::test]
async fn retrieve_failure_is_wrapped_and_skips_update() {
    let mut mock = MockAverageRepository::new();
    mock.expect_fetch_all_records()
        .returning(|| Ok(vec![AverageRow::new(1, AverageRecord::new(5, 3).unwrap())]));
    mock.expect_is_empty().returning(|rows| rows.is_empty());
    mock.expect_fetch_persisted_totals()
        .times(1)
        .returning(|| Err(StorageError::Serialization("bad row".into())));
    mock.expect_update_totals().never();

    let err = compute_average_rating(&mock, "60", 3).await.unwrap_err();

    assert!(matches!(err, AggregationError::Retrieve(_)));
}

#[tokio::test]
async fn update_failure_is_wrapped() {
    let mut mock = MockAverageRepository::new();
    mock.expect_fetch_all_records()
        .returning(|| Ok(vec![AverageRow::new(1, AverageRecord::new(5, 3).unwrap())]));
    mock.expect_is_empty().returning(|rows| rows.is_empty());
    mock.expect_fetch_persisted_totals()
        .returning(|| Ok(AverageRecord::new(5, 3).unwrap()));
    mock.expect_update_totals()
        .with(eq(10), eq(7))
        .times(1)
        .returning(|_, _| Err(StorageError::NotFound));

    let err = compute_average_rating(&mock, "80", 4).await.unwrap_err();

    assert!(matches!(err, AggregationError::Update(StorageError::NotFound)));
    assert_eq!(err.to_string(), "unable to update average: not found");
}

#[tokio::test]
async fn presentation_shows_immediate_score_even_when_persisting_fails() {
    let mut mock = MockAverageRepository::new();
    mock.expect_fetch_all_records().returning(|| Ok(Vec::new()));
    mock.expect_is_empty().returning(|rows| rows.is_empty());
    mock.expect_insert_record()
        .returning(|_, _| Err(StorageError::Connection("read-only".into())));

    let service = RatingService::new(Arc::new(mock));
    let mut out = Vec::new();
    let err = service
        .present_ratings(&run(3), &mut out)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        PresentationError::Average(AggregationError::Persist(_))
    ));
    assert_eq!(String::from_utf8(out).unwrap(), "Your rating is: 60/100\n");
}

#[tokio::test]
async fn oversized_run_is_rejected_before_storage_on_both_branches() {
    let mut mock = MockAverageRepository::new();
    mock.expect_fetch_all_records().never();
    mock.expect_insert_record().never();
    mock.expect_fetch_persisted_totals().never();
    mock.expect_update_totals().never();

    let err = compute_average_rating(&mock, "80", 8).await.unwrap_err();
    assert!(matches!(
        err,
        AggregationError::RunTooLarge {
            positives: 8,
            counted: 5
        }
    ));

    let empty = InMemoryRepository::new();
    let err = compute_average_rating(&empty, "80", 8).await.unwrap_err();
    assert!(matches!(err, AggregationError::RunTooLarge { .. }));
    assert!(empty.fetch_all_records().await.unwrap().is_empty());

    let seeded = InMemoryRepository::new();
    seeded.insert_record(5, 3).await.unwrap();
    let err = compute_average_rating(&seeded, "80", 8).await.unwrap_err();
    assert!(matches!(err, AggregationError::RunTooLarge { .. }));
    assert_eq!(
        err.to_string(),
        "run has 8 positive answers but only 5 questions are counted per run"
    );
    assert_eq!(seeded.fetch_persisted_totals().await.unwrap(), totals(5, 3));
}
