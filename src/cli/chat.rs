use anyhow::{Context, Result};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use crate::ai::RetrieverQueryEngine;
use crate::chat::{SessionState, on_user_message};
use crate::core::AppConfig;

pub async fn run(config: AppConfig) -> Result<()> {
    super::init_cli_tracing();

    let engine = RetrieverQueryEngine::from_config(&config)
        .with_context(|| format!("Failed to load index from {}", config.store_path))?;
    let mut rl = DefaultEditor::new().context("Editor failed")?;

    println!("Sono RachelBot, l'assistente AI del Kontiki. Cosa vuoi sapere?");
    let mut session = SessionState::new();

    loop {
        let readline = rl.readline(">>> ");
        match readline {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(line.as_str());

                match on_user_message(&engine, &session, &line).await {
                    Ok(next) => {
                        session = next;
                        if let Some(answer) = session.last_answer() {
                            println!("{}", answer.content());
                        }
                        for link in session.last_links() {
                            println!("  {}", link.markdown());
                        }
                    }
                    // Keep the session as it was so the question can
                    // be asked again
                    Err(e) => println!("Error: {}", e),
                }
            }
            Err(ReadlineError::Interrupted) => break,
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        }
    }

    Ok(())
}
