mod average;
mod question;
mod run;

pub use average::{AverageError, AverageRecord};
pub use question::{Question, QuestionError, default_questions};
pub use run::RunResult;
