//! Interactive chat command.

use super::chat_session;
use crate::chat::ChatEvent;
use crate::cli::Output;
use crate::config::Settings;
use anyhow::Result;
use console::style;
use std::io::{self, BufRead, Write};

/// Run the interactive chat command.
pub async fn run_chat(model: Option<String>, settings: Settings) -> Result<()> {
    let session = chat_session(model, settings)?;

    println!("\n{}", style("Lese Chat").bold().cyan());
    println!(
        "{}\n",
        style(format!(
            "Using {}. Type your queries, or 'quit' to exit.",
            session.model_name()
        ))
        .dim()
    );

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("{} ", style("Query:").green().bold());
        stdout.flush()?;

        let mut input = String::new();
        if stdin.lock().read_line(&mut input)? == 0 {
            println!();
            break;
        }

        let input = input.trim();

        if input.is_empty() {
            continue;
        }

        if input.eq_ignore_ascii_case("quit") || input.eq_ignore_ascii_case("exit") {
            Output::info("Goodbye!");
            break;
        }

        println!();
        if let Err(e) = session.process_query(input, print_event).await {
            Output::error(&format!("Error: {}", e));
        }
        println!();
    }

    Ok(())
}

fn print_event(event: ChatEvent) {
    match event {
        ChatEvent::Text(text) => println!("{}", text),
        ChatEvent::ToolCall { name, input } => {
            println!(
                "{}",
                style(format!("  [Calling tool {} with args {}]", name, input)).dim()
            );
        }
        ChatEvent::ToolResult {
            name,
            output,
            is_error: true,
        } => Output::warning(&format!("{} failed: {}", name, output)),
        ChatEvent::ToolResult { .. } => {}
    }
}
