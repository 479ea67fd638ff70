mod stream;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use serde::Deserialize;
use std::io::Write;
use taskflow_models::ChatMessage;

#[derive(Parser)]
#[command(name = "taskflow", about = "TaskFlow terminal client", version)]
struct Cli {
    /// Base URL of the TaskFlow server
    #[arg(
        long,
        env = "TASKFLOW_SERVER_URL",
        default_value = "http://localhost:3000"
    )]
    server: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Interactive chat with the AI assistant
    Chat,
    /// List models available on the server
    Models,
}

#[derive(Deserialize)]
struct ModelsResponse {
    models: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Chat => run_chat(&cli.server).await,
        Command::Models => run_models(&cli.server).await,
    }
}

async fn run_models(server: &str) -> Result<()> {
    let client = reqwest::Client::new();
    let response = client
        .get(format!("{}/api/chat/models", server.trim_end_matches('/')))
        .send()
        .await?
        .error_for_status()?;

    let body: ModelsResponse = response.json().await?;
    for model in body.models {
        println!("{}", model);
    }
    Ok(())
}

async fn run_chat(server: &str) -> Result<()> {
    let client = reqwest::Client::new();
    let mut history: Vec<ChatMessage> = Vec::new();

    println!(
        "{}",
        "TaskFlow chat - type a message, or 'exit' to quit.".bold()
    );

    // One request in flight at a time: the next prompt is only shown after a
    // terminal callback has fired for the previous turn.
    loop {
        print!("{} ", "you>".green().bold());
        std::io::stdout().flush()?;

        let mut line = String::new();
        if std::io::stdin().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "exit" || line == "quit" {
            break;
        }

        history.push(ChatMessage::user(line));

        print!("{} ", "ai>".cyan().bold());
        std::io::stdout().flush()?;

        let mut reply = String::new();
        let mut failed = false;

        stream::stream_chat(
            &client,
            server,
            &history,
            |fragment| {
                print!("{}", fragment);
                let _ = std::io::stdout().flush();
                reply.push_str(fragment);
            },
            || println!(),
            |error| {
                println!();
                eprintln!("{} {}", "error:".red().bold(), error);
                failed = true;
            },
        )
        .await;

        if failed {
            // Drop the failed turn so a retry resends a clean history.
            history.pop();
        } else if !reply.is_empty() {
            history.push(ChatMessage::assistant(reply));
        }
    }

    Ok(())
}
