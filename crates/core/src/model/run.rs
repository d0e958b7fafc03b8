/// Outcome of a single quiz run. Not persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunResult {
    /// Percentage score of this run, formatted with zero decimals.
    pub immediate_score: String,
    pub positive_count: u32,
    pub question_count: u32,
}

impl RunResult {
    #[must_use]
    pub fn empty() -> Self {
        Self {
            immediate_score: "0".to_owned(),
            positive_count: 0,
            question_count: 0,
        }
    }
}
