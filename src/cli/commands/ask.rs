//! Ask command implementation.

use super::chat_session;
use crate::chat::ChatEvent;
use crate::cli::Output;
use crate::config::Settings;
use anyhow::Result;

/// Run a single query and print the answer.
pub async fn run_ask(query: &str, model: Option<String>, settings: Settings) -> Result<()> {
    let session = chat_session(model, settings)?;

    let spinner = Output::spinner("Thinking...");
    let result = session
        .process_query(query, |event| {
            if let ChatEvent::ToolCall { name, .. } = event {
                spinner.set_message(format!("Running {}...", name));
            }
        })
        .await;
    spinner.finish_and_clear();

    match result {
        Ok(outcome) => {
            println!("\n{}\n", outcome.text);

            if !outcome.tool_calls.is_empty() {
                Output::header("Tool calls");
                for call in &outcome.tool_calls {
                    Output::list_item(&call.to_string());
                }
            }
        }
        Err(e) => {
            Output::error(&format!("Failed to answer: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}
