use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question prompt cannot be empty")]
    EmptyPrompt,
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A yes/no skill question together with the user's answer.
///
/// A positive answer contributes a value of `1` to the run's score, anything
/// else contributes `0`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    prompt: String,
    positive: bool,
}

impl Question {
    /// Creates an unanswered question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::EmptyPrompt` if the prompt is blank.
    pub fn new(prompt: impl Into<String>) -> Result<Self, QuestionError> {
        let prompt = prompt.into().trim().to_owned();
        if prompt.is_empty() {
            return Err(QuestionError::EmptyPrompt);
        }
        Ok(Self {
            prompt,
            positive: false,
        })
    }

    /// Records the user's answer.
    pub fn answer(&mut self, positive: bool) {
        self.positive = positive;
    }

    /// Builder-style variant of [`Question::answer`].
    #[must_use]
    pub fn answered(mut self, positive: bool) -> Self {
        self.answer(positive);
        self
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.positive
    }

    /// Points contributed to the run's score.
    #[must_use]
    pub fn value(&self) -> u32 {
        u32::from(self.positive)
    }
}

const DEFAULT_PROMPTS: [&str; 5] = [
    "Do you write automated tests for the code you ship?",
    "Do you review other people's code at least once a week?",
    "Can you explain the last production incident you were involved in?",
    "Do you keep your build reproducible from a clean checkout?",
    "Have you read the documentation of the tools you use daily?",
];

/// The built-in question set asked by the quiz.
#[must_use]
pub fn default_questions() -> Vec<Question> {
    DEFAULT_PROMPTS
        .iter()
        .map(|prompt| Question {
            prompt: (*prompt).to_owned(),
            positive: false,
        })
        .collect()
}
