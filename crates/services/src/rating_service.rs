use std::io::Write;
use std::sync::Arc;

use async_trait::async_trait;
use quiz_core::model::{AverageRecord, Question, RunResult};
use quiz_core::rating::{QUESTIONS_PER_RUN, compute_immediate_score};
use storage::repository::AverageRepository;

use crate::error::{AggregationError, PresentationError};

//
// ─── AVERAGE ───────────────────────────────────────────────────────────────────
//

/// Fold the current run into the persisted totals and return the new average.
///
/// - With no history, seeds the totals with this run and returns `current_score` unchanged.
/// - Otherwise adds [`QUESTIONS_PER_RUN`] questions and `curr_positives` positives to the
///   persisted totals, stores them and returns the recomputed percentage.
///
/// The read-modify-write sequence is not transactional; callers are expected to
/// run sequentially from a single process.
///
/// # Errors
///
/// Returns `AggregationError::RunTooLarge` before touching storage when
/// `curr_positives` exceeds [`QUESTIONS_PER_RUN`], `AggregationError::Storage`
/// if the rows cannot be listed, and the step-specific variants (`Persist`,
/// `Retrieve`, `Update`) for later failures.
/// No totals are written when any step before the final update fails.
pub async fn compute_average_rating(
    averages: &dyn AverageRepository,
    current_score: &str,
    curr_positives: u32,
) -> Result<String, AggregationError> {
    if curr_positives > QUESTIONS_PER_RUN {
        return Err(AggregationError::RunTooLarge {
            positives: curr_positives,
            counted: QUESTIONS_PER_RUN,
        });
    }

    let rows = averages.fetch_all_records().await?;

    if averages.is_empty(rows) {
        averages
            .insert_record(QUESTIONS_PER_RUN, curr_positives)
            .await
            .map_err(AggregationError::Persist)?;
        tracing::info!(positives = curr_positives, "seeded rating history");
        return Ok(current_score.to_owned());
    }

    let persisted = averages
        .fetch_persisted_totals()
        .await
        .map_err(AggregationError::Retrieve)?;
    let folded = persisted.fold(curr_positives, QUESTIONS_PER_RUN)?;

    averages
        .update_totals(folded.questions_total(), folded.positives_total())
        .await
        .map_err(AggregationError::Update)?;

    tracing::info!(
        questions_total = folded.questions_total(),
        positives_total = folded.positives_total(),
        "folded run into rating history"
    );
    Ok(folded.average().to_string())
}

//
// ─── CALCULATOR ────────────────────────────────────────────────────────────────
//

/// The two scoring steps, injectable so presentation can be tested in isolation.
#[async_trait]
pub trait RatingCalculator: Send + Sync {
    fn immediate(&self, answers: &[Question]) -> RunResult;

    async fn average(
        &self,
        averages: &dyn AverageRepository,
        current_score: &str,
        curr_positives: u32,
    ) -> Result<String, AggregationError>;
}

/// Calculator backed by [`compute_immediate_score`] and [`compute_average_rating`].
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardCalculator;

#[async_trait]
impl RatingCalculator for StandardCalculator {
    fn immediate(&self, answers: &[Question]) -> RunResult {
        compute_immediate_score(answers)
    }

    async fn average(
        &self,
        averages: &dyn AverageRepository,
        current_score: &str,
        curr_positives: u32,
    ) -> Result<String, AggregationError> {
        compute_average_rating(averages, current_score, curr_positives).await
    }
}

//
// ─── PRESENTATION ──────────────────────────────────────────────────────────────
//

/// Both ratings produced for a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RatingReport {
    pub run: RunResult,
    pub average: String,
}

/// Compute and print the immediate and average ratings.
///
/// The immediate rating is written before the average is computed, so it is
/// shown even when persisting the run fails.
///
/// # Errors
///
/// Returns `PresentationError::Average` if the average cannot be computed and
/// `PresentationError::Output` if writing fails.
pub async fn present_ratings<W: Write>(
    calculator: &dyn RatingCalculator,
    averages: &dyn AverageRepository,
    answers: &[Question],
    out: &mut W,
) -> Result<RatingReport, PresentationError> {
    if answers.len() != QUESTIONS_PER_RUN as usize {
        tracing::warn!(
            asked = answers.len(),
            counted = QUESTIONS_PER_RUN,
            "run length differs from the question count folded into the average"
        );
    }

    let run = calculator.immediate(answers);
    writeln!(out, "Your rating is: {}/100", run.immediate_score)?;

    let average = calculator
        .average(averages, &run.immediate_score, run.positive_count)
        .await
        .map_err(PresentationError::Average)?;
    writeln!(out, "The average rating is: {average}/100")?;

    Ok(RatingReport { run, average })
}

//
// ─── SERVICE ───────────────────────────────────────────────────────────────────
//

/// Scores quiz runs against the persisted rating history.
#[derive(Clone)]
pub struct RatingService {
    averages: Arc<dyn AverageRepository>,
    calculator: Arc<dyn RatingCalculator>,
}

impl RatingService {
    #[must_use]
    pub fn new(averages: Arc<dyn AverageRepository>) -> Self {
        Self {
            averages,
            calculator: Arc::new(StandardCalculator),
        }
    }

    /// Replace the scoring steps (usually for testing).
    #[must_use]
    pub fn with_calculator(mut self, calculator: Arc<dyn RatingCalculator>) -> Self {
        self.calculator = calculator;
        self
    }

    /// Score a finished run, print both ratings and persist the new totals.
    ///
    /// # Errors
    ///
    /// See [`present_ratings`].
    pub async fn present_ratings<W: Write>(
        &self,
        answers: &[Question],
        out: &mut W,
    ) -> Result<RatingReport, PresentationError> {
        present_ratings(
            self.calculator.as_ref(),
            self.averages.as_ref(),
            answers,
            out,
        )
        .await
    }

    /// Read the persisted totals without recording a run.
    ///
    /// Returns `None` before the first run has been recorded.
    ///
    /// # Errors
    ///
    /// Returns `AggregationError` if the store cannot be read.
    pub async fn current_average(&self) -> Result<Option<AverageRecord>, AggregationError> {
        let rows = self.averages.fetch_all_records().await?;
        if self.averages.is_empty(rows) {
            return Ok(None);
        }
        self.averages
            .fetch_persisted_totals()
            .await
            .map(Some)
            .map_err(AggregationError::Retrieve)
    }
}
