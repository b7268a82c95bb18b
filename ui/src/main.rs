use anyhow::Result;
use rag_ui::{render, submit, ApiClient, UiConfig};
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let config = UiConfig::from_env();
    let client = ApiClient::new(config.api_url)?;

    println!("Chat with your Document using RAG powered by Gemini");
    println!("Ask questions about the research paper 'Attention Is All You Need'.");
    println!("RAG API URL: {}", client.api_url());
    println!("Type a question and press Enter (\"quit\" to exit).\n");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        if matches!(line.trim(), "quit" | "exit") {
            break;
        }

        if !line.trim().is_empty() {
            println!("Querying RAG API and generating answer...");
        }
        let outcome = submit(&client, &line).await;
        println!("{}", render(&outcome));
    }

    Ok(())
}
