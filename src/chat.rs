use anyhow::{Context, Result};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use crate::agents::coordinator::Coordinator;
use crate::config::RuntimeConfig;
use crate::error::format_cli_error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCommand {
    Exit,
    Help,
    Status,
    Capabilities,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedChatCommand {
    NotACommand,
    Command(ChatCommand),
    UnknownCommand(String),
}

pub fn parse_chat_command(input: &str) -> ParsedChatCommand {
    let trimmed = input.trim();

    if trimmed.eq_ignore_ascii_case("exit") || trimmed.eq_ignore_ascii_case("/exit") {
        return ParsedChatCommand::Command(ChatCommand::Exit);
    }

    if !trimmed.starts_with('/') {
        return ParsedChatCommand::NotACommand;
    }

    let slashless = trimmed.trim_start_matches('/');
    if slashless.is_empty() {
        return ParsedChatCommand::UnknownCommand("/".to_string());
    }

    match slashless.to_ascii_lowercase().as_str() {
        "exit" | "quit" => ParsedChatCommand::Command(ChatCommand::Exit),
        "help" => ParsedChatCommand::Command(ChatCommand::Help),
        "status" => ParsedChatCommand::Command(ChatCommand::Status),
        "capabilities" => ParsedChatCommand::Command(ChatCommand::Capabilities),
        other => ParsedChatCommand::UnknownCommand(format!("/{other}")),
    }
}

pub fn print_chat_help() {
    println!("Chat commands:");
    println!("- /help: show command quick reference");
    println!("- /status: show active profile/model/endpoints");
    println!("- /capabilities: list workers and what they can do");
    println!("- /quit or /exit: leave chat mode");
}

pub fn print_chat_status(cfg: &RuntimeConfig) {
    println!("Profile: {} (config: {})", cfg.profile, cfg.config_path);
    println!("Model: {}", cfg.model);
    println!("Completion base URL: {}", cfg.completion_base_url);
    println!("Capability endpoints:");
    for endpoint in &cfg.capability_endpoints {
        println!(
            "- {} -> {} (enabled={})",
            endpoint.name,
            endpoint.endpoint,
            endpoint.enabled.unwrap_or(true)
        );
    }
}

pub fn print_chat_capabilities(coordinator: &Coordinator) {
    println!("Workers:");
    for (name, capabilities) in coordinator.worker_summaries() {
        println!("- {name}: {capabilities}");
    }
}

/// Interactive loop. Request-level failures are printed and the loop
/// continues with the same coordinator; only terminal errors end the loop.
pub async fn run_chat(cfg: &RuntimeConfig, coordinator: &mut Coordinator) -> Result<()> {
    let mut editor = DefaultEditor::new().context("failed to start chat line editor")?;

    println!("\nCoordinator ready. Type your requests, or /help for commands.\n");

    loop {
        let line = match editor.readline("You: ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(err) => return Err(err).context("failed to read chat input"),
        };

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let _ = editor.add_history_entry(trimmed);

        match parse_chat_command(trimmed) {
            ParsedChatCommand::Command(ChatCommand::Exit) => break,
            ParsedChatCommand::Command(ChatCommand::Help) => print_chat_help(),
            ParsedChatCommand::Command(ChatCommand::Status) => print_chat_status(cfg),
            ParsedChatCommand::Command(ChatCommand::Capabilities) => {
                print_chat_capabilities(coordinator)
            }
            ParsedChatCommand::UnknownCommand(command) => {
                println!("Unknown command {command}. Try /help.");
            }
            ParsedChatCommand::NotACommand => {
                match coordinator.process_request(trimmed).await {
                    Ok(answer) => println!("\nAgent: {answer}\n"),
                    Err(err) => eprintln!("{}", format_cli_error(&err)),
                }
            }
        }
    }

    println!("Shutting down...");
    coordinator.close();
    Ok(())
}
