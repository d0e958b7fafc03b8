use std::fmt;
use std::io::{BufRead, Write};

use quiz_core::model::Question;

#[derive(Debug)]
pub enum QuizError {
    Io(std::io::Error),
    InputClosed { answered: usize },
}

impl fmt::Display for QuizError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuizError::Io(err) => write!(f, "failed to read answer: {err}"),
            QuizError::InputClosed { answered } => {
                write!(f, "input closed after {answered} answers")
            }
        }
    }
}

impl std::error::Error for QuizError {}

impl From<std::io::Error> for QuizError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

fn parse_answer(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" => Some(true),
        "n" | "no" => Some(false),
        _ => None,
    }
}

/// Ask every question on `out`, reading y/n answers from `input`.
///
/// Unrecognised answers are asked again.
pub fn ask_questions<R: BufRead, W: Write>(
    questions: Vec<Question>,
    input: &mut R,
    out: &mut W,
) -> Result<Vec<Question>, QuizError> {
    let total = questions.len();
    let mut answered = Vec::with_capacity(total);

    for (idx, mut question) in questions.into_iter().enumerate() {
        loop {
            write!(out, "[{}/{total}] {} (y/n): ", idx + 1, question.prompt())?;
            out.flush()?;

            let mut line = String::new();
            if input.read_line(&mut line)? == 0 {
                return Err(QuizError::InputClosed {
                    answered: answered.len(),
                });
            }
            if let Some(positive) = parse_answer(&line) {
                question.answer(positive);
                break;
            }
            writeln!(out, "Please answer y or n.")?;
        }
        answered.push(question);
    }

    Ok(answered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn questions(n: usize) -> Vec<Question> {
        (0..n)
            .map(|i| Question::new(format!("Question {i}?")).unwrap())
            .collect()
    }

    #[test]
    fn records_each_answer() {
        let mut input = Cursor::new("y\nno\nYES\nn\ny\n");
        let mut out = Vec::new();

        let answers = ask_questions(questions(5), &mut input, &mut out).unwrap();

        let values: Vec<u32> = answers.iter().map(Question::value).collect();
        assert_eq!(values, vec![1, 0, 1, 0, 1]);
        let shown = String::from_utf8(out).unwrap();
        assert!(shown.contains("[1/5] Question 0? (y/n): "));
        assert!(shown.contains("[5/5] Question 4? (y/n): "));
    }

    #[test]
    fn asks_again_on_unrecognised_answer() {
        let mut input = Cursor::new("maybe\n  Y  \n");
        let mut out = Vec::new();

        let answers = ask_questions(questions(1), &mut input, &mut out).unwrap();

        assert!(answers[0].is_positive());
        let shown = String::from_utf8(out).unwrap();
        assert_eq!(shown.matches("Please answer y or n.").count(), 1);
    }

    #[test]
    fn closed_input_is_an_error() {
        let mut input = Cursor::new("y\n");
        let mut out = Vec::new();

        let err = ask_questions(questions(3), &mut input, &mut out).unwrap_err();

        assert!(matches!(err, QuizError::InputClosed { answered: 1 }));
    }
}
