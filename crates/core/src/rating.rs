//! Pure rating math: percentage scores for a single run and for the
//! cumulative history.

use std::fmt;

use crate::model::{Question, RunResult};

/// Number of questions every run is assumed to contain when folding a run
/// into the persisted totals.
///
/// The fold always adds this value, whatever the actual run length was.
/// Callers that ask a different number of questions skew the average.
pub const QUESTIONS_PER_RUN: u32 = 5;

/// A percentage rating in `0.0..=100.0`.
///
/// `Display` renders the value with zero decimal places (ties round to even).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Rating(f64);

impl Rating {
    pub const ZERO: Rating = Rating(0.0);

    /// Percentage of `positives` over `questions`, computed in floating point.
    ///
    /// Returns `Rating::ZERO` when `questions` is zero.
    #[must_use]
    pub fn from_counts(positives: u32, questions: u32) -> Self {
        if questions == 0 {
            return Self::ZERO;
        }
        Self(100.0 * (f64::from(positives) / f64::from(questions)))
    }

    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.0}", self.0)
    }
}

/// Scores a single run.
///
/// An empty run scores `"0"` with no positives. Otherwise every question
/// contributes its value and the score is the percentage of positives.
///
/// ```
/// use quiz_core::model::Question;
/// use quiz_core::rating::compute_immediate_score;
///
/// let answers: Vec<Question> = [true, true, true, false, false]
///     .into_iter()
///     .map(|yes| Question::new("Q").unwrap().answered(yes))
///     .collect();
/// let run = compute_immediate_score(&answers);
/// assert_eq!(run.immediate_score, "60");
/// assert_eq!(run.positive_count, 3);
/// ```
#[must_use]
pub fn compute_immediate_score(answers: &[Question]) -> RunResult {
    if answers.is_empty() {
        return RunResult::empty();
    }

    let positive_count: u32 = answers.iter().map(Question::value).sum();
    let question_count = u32::try_from(answers.len()).unwrap_or(u32::MAX);

    RunResult {
        immediate_score: Rating::from_counts(positive_count, question_count).to_string(),
        positive_count,
        question_count,
    }
}
