use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::rating::Rating;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AverageError {
    #[error("positives ({positives}) exceed questions ({questions})")]
    PositivesExceedQuestions { questions: u32, positives: u32 },

    #[error("cumulative totals overflow")]
    Overflow,
}

/// Cumulative totals across every recorded run.
///
/// `positives_total` never exceeds `questions_total`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AverageRecord {
    questions_total: u32,
    positives_total: u32,
}

impl AverageRecord {
    /// # Errors
    ///
    /// Returns `AverageError::PositivesExceedQuestions` if the totals are inconsistent.
    pub fn new(questions_total: u32, positives_total: u32) -> Result<Self, AverageError> {
        if positives_total > questions_total {
            return Err(AverageError::PositivesExceedQuestions {
                questions: questions_total,
                positives: positives_total,
            });
        }
        Ok(Self {
            questions_total,
            positives_total,
        })
    }

    #[must_use]
    pub fn questions_total(&self) -> u32 {
        self.questions_total
    }

    #[must_use]
    pub fn positives_total(&self) -> u32 {
        self.positives_total
    }

    /// Adds one run's counts to the totals.
    ///
    /// # Errors
    ///
    /// Returns `AverageError::Overflow` if either total would overflow, or
    /// `AverageError::PositivesExceedQuestions` if the result is inconsistent.
    pub fn fold(self, run_positives: u32, run_questions: u32) -> Result<Self, AverageError> {
        let questions = self
            .questions_total
            .checked_add(run_questions)
            .ok_or(AverageError::Overflow)?;
        let positives = self
            .positives_total
            .checked_add(run_positives)
            .ok_or(AverageError::Overflow)?;
        Self::new(questions, positives)
    }

    /// Percentage of positive answers across the whole history.
    #[must_use]
    pub fn average(&self) -> Rating {
        Rating::from_counts(self.positives_total, self.questions_total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_more_positives_than_questions() {
        assert_eq!(
            AverageRecord::new(5, 6),
            Err(AverageError::PositivesExceedQuestions {
                questions: 5,
                positives: 6
            })
        );
    }

    #[test]
    fn fold_adds_run_counts() {
        let record = AverageRecord::new(5, 3).unwrap().fold(4, 5).unwrap();
        assert_eq!(record.questions_total(), 10);
        assert_eq!(record.positives_total(), 7);
        assert_eq!(record.average().to_string(), "70");
    }

    #[test]
    fn fold_detects_overflow() {
        let record = AverageRecord::new(u32::MAX, 0).unwrap();
        assert_eq!(record.fold(0, 1), Err(AverageError::Overflow));
    }

    #[test]
    fn fold_rejects_run_with_too_many_positives() {
        let record = AverageRecord::new(0, 0).unwrap();
        assert!(matches!(
            record.fold(6, 5),
            Err(AverageError::PositivesExceedQuestions { .. })
        ));
    }
}
