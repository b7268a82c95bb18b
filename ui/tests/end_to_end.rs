use async_trait::async_trait;
use paper_rag::{Answer, AnswerEngine, EngineError};
use rag_api::{router, AppState};
use rag_ui::{render, submit, ApiClient, Outcome};
use std::path::PathBuf;
use std::sync::Arc;

struct PaperEngine;

#[async_trait]
impl AnswerEngine for PaperEngine {
    async fn answer_question(&self, question: &str) -> Result<Answer, EngineError> {
        Ok(Answer {
            answer: format!("You asked: {question}"),
            context: "Attention Is All You Need".to_string(),
        })
    }
}

async fn serve(state: AppState) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router(state)).await.unwrap();
    });
    format!("http://{addr}/ask")
}

#[tokio::test]
async fn renders_answer_from_running_service() {
    let url = serve(AppState::ready(Arc::new(PaperEngine))).await;
    let client = ApiClient::new(url).unwrap();

    let outcome = submit(&client, "  What is the BLEU score?  ").await;
    let Outcome::Answered(response) = &outcome else {
        panic!("expected an answer, got {outcome:?}");
    };

    assert_eq!(response.question, "What is the BLEU score?");
    assert_eq!(response.answer, "You asked: What is the BLEU score?");
    assert!(render(&outcome).contains("Attention Is All You Need"));
}

#[tokio::test]
async fn unavailable_engine_shows_error_inline() {
    let url = serve(AppState::unavailable(EngineError::DocumentNotFound(PathBuf::from(
        "data/attention.pdf",
    ))))
    .await;
    let client = ApiClient::new(url).unwrap();

    let outcome = submit(&client, "What is the BLEU score?").await;
    let rendered = render(&outcome);

    assert!(matches!(outcome, Outcome::Failed(_)));
    assert!(rendered.contains("Request to RAG API failed"));
    assert!(rendered.contains("503"));
    assert!(!rendered.contains("## Answer"));
}
