//! Interactive chat session over a local data directory.
//!
//! Usage: GROQ_API_KEY=... cargo run --example chat_session --features groq -- [data-dir]

use std::io::{self, BufRead, Write};
use std::path::Path;

use bank_data_assistant::{ChatSession, CompletionClient, DataStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let api_key = std::env::var("GROQ_API_KEY")
        .map_err(|_| anyhow::anyhow!("GROQ_API_KEY must be set (see .env)"))?;

    let data_dir = std::env::args().nth(1).unwrap_or_else(|| "public".to_string());
    let store = DataStore::load_from_dir(Path::new(&data_dir))?;

    let mut session = ChatSession::with_store(CompletionClient::new(api_key), store);

    println!("{}", session.transcript()[0].text);
    println!("Try one of:");
    for question in ChatSession::predefined_questions() {
        println!("  - {question}");
    }

    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;
        let Some(line) = stdin.lock().lines().next() else {
            break;
        };
        let line = line?;
        if line.trim() == "exit" {
            break;
        }
        if let Some(reply) = session.send(&line).await {
            println!("{}", reply.text);
        }
    }

    Ok(())
}
