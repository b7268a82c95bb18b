use crate::client::{AnswerResponse, AskApi};

pub const EMPTY_QUESTION_WARNING: &str = "Please enter a question before submitting.";

/// Result of one submit action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Input was blank; nothing was sent.
    Warning(String),
    Failed(String),
    Answered(AnswerResponse),
}

/// Trims the input and, if anything is left, asks the service once.
pub async fn submit<A>(api: &A, raw_question: &str) -> Outcome
where
    A: AskApi + ?Sized,
{
    let question = raw_question.trim();
    if question.is_empty() {
        return Outcome::Warning(EMPTY_QUESTION_WARNING.to_string());
    }

    match api.ask(question).await {
        Ok(response) => Outcome::Answered(response),
        Err(err) => {
            log::debug!("ask failed: {:#}", err);
            Outcome::Failed(format!("Request to RAG API failed: {err}"))
        }
    }
}

pub fn render(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Warning(message) => format!("warning: {message}\n"),
        Outcome::Failed(message) => format!("error: {message}\n"),
        Outcome::Answered(response) => format!(
            "\n## Answer\n{}\n\n## Context (retrieved from the paper)\n{}\n",
            response.answer, response.context
        ),
    }
}
