use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use rustyline::Editor;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use tracing_subscriber::EnvFilter;

use propassist_application::{PropertyAssistant, TurnOutcome};
use propassist_core::state::PipelineStage;
use propassist_infrastructure::{ConfigOverrides, ConfigService};

mod commands;
mod helper;
mod render;

use commands::{Command, HELP};
use helper::CliHelper;

#[derive(Parser)]
#[command(name = "propassist")]
#[command(about = "Property Assistant - chat with your property's data", long_about = None)]
struct Cli {
    /// Backend base URL (overrides API_BASE_URL and the config file)
    #[arg(long)]
    api_base_url: Option<String>,

    /// Property to chat about (overrides PROPERTY_ID and the config file)
    #[arg(long)]
    property_id: Option<String>,

    /// Config file to use instead of ~/.config/propassist/config.toml
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG is set
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let service = match &cli.config {
        Some(path) => ConfigService::new(path),
        None => ConfigService::discover(),
    };
    let overrides = ConfigOverrides {
        api_base_url: cli.api_base_url.clone(),
        property_id: cli.property_id.clone(),
    }
    .or(ConfigOverrides::from_env());
    let config = service.load(&overrides).context("Failed to load configuration")?;
    let assistant = PropertyAssistant::from_config(config).context("Failed to set up the chat backend")?;

    let mut rl: Editor<CliHelper, DefaultHistory> = Editor::new()?;
    rl.set_helper(Some(CliHelper::new()));

    println!("{}", "=== Property Assistant ===".bright_magenta().bold());
    println!(
        "{}",
        format!(
            "Property '{}' at {}. Type /help for commands.",
            assistant.backend_config().property_id,
            assistant.backend_config().api_base_url
        )
        .bright_black()
    );
    println!();

    loop {
        match rl.readline(">> ") {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(trimmed);

                let command = match Command::parse(trimmed) {
                    Ok(command) => command,
                    Err(err) => {
                        println!("{}", err.to_string().yellow());
                        continue;
                    }
                };
                if command == Command::Quit {
                    println!("{}", "Goodbye!".bright_green());
                    break;
                }
                if let Err(err) = execute(&assistant, &service, command).await {
                    println!("{}", format!("Error: {err:#}").red());
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type /quit to exit.".yellow());
            }
            Err(ReadlineError::Eof) => {
                println!("{}", "CTRL-D detected. Exiting...".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {err:?}").red());
                break;
            }
        }
    }

    Ok(())
}

async fn execute(assistant: &PropertyAssistant, service: &ConfigService, command: Command) -> Result<()> {
    let settings = assistant.settings();
    match command {
        Command::Submit(text) => run_turn(assistant, &text).await?,
        Command::Sources(None) => {
            let snapshot = settings.snapshot().await;
            println!("{}", render::sources(&snapshot.knowledge_sources));
        }
        Command::Sources(Some(tags)) => {
            let summary = settings
                .update(|s| {
                    s.knowledge_sources
                        .set(tags)
                        .map(|()| s.knowledge_sources.summary())
                })
                .await?;
            println!("{}", format!("Knowledge sources: {summary}").green());
        }
        Command::Web(value) => {
            let include = settings
                .update(|s| {
                    if let Some(include) = value {
                        s.web_search.set_include_web_search(include);
                    }
                    s.web_search.include_web_search()
                })
                .await;
            println!("{}", format!("Web search: {}", if include { "on" } else { "off" }).green());
        }
        Command::Bias(value) => {
            let enabled = settings
                .update(|s| {
                    if let Some(enabled) = value {
                        s.bias_evaluation_enabled = enabled;
                    }
                    s.bias_evaluation_enabled
                })
                .await;
            println!(
                "{}",
                format!("Bias evaluation: {}", if enabled { "on" } else { "off" }).green()
            );
        }
        Command::Model { stage, model } => {
            settings.update(|s| s.models.set_model(stage, model.as_str())).await?;
            if propassist_interaction::supported_models::is_offered(stage, &model) {
                println!("{}", format!("{}: {model}", stage.label()).green());
            } else {
                println!(
                    "{}",
                    format!("{}: {model} (not in the offered list for {stage})", stage.label()).yellow()
                );
            }
        }
        Command::Prompt { stage, text } => {
            settings.update(|s| s.models.set_system_prompt(stage, text)).await?;
            println!("{}", format!("{} system prompt updated", stage.label()).green());
        }
        Command::Models(stage) => {
            let snapshot = settings.snapshot().await;
            println!("{}", render::models(&snapshot.models, stage));
            if let Some(stage) = stage {
                show_prompt(stage, &snapshot.models.stage(stage).system_prompt);
            }
        }
        Command::Info => {
            println!("{}", render::info_panel(&assistant.response_state().snapshot()));
        }
        Command::Config => {
            let snapshot = settings.snapshot().await;
            println!("{}", render::config(assistant.backend_config(), service.path(), &snapshot));
        }
        Command::Clear => {
            assistant.clear().await?;
            println!("{}", "Started a new conversation.".bright_black());
        }
        Command::Help => println!("{HELP}"),
        Command::Quit => {}
    }
    Ok(())
}

fn show_prompt(stage: PipelineStage, prompt: &str) {
    println!("{}", format!("{} system prompt:", stage.label()).bright_magenta());
    for line in prompt.lines() {
        println!("  {}", line.bright_black());
    }
}

/// Runs one turn, cancelling it on Ctrl-C.
async fn run_turn(assistant: &PropertyAssistant, text: &str) -> Result<()> {
    let thread = assistant.thread();
    println!("{}", "Thinking... (Ctrl-C to cancel)".bright_black());

    let submit = thread.submit(text);
    tokio::pin!(submit);
    let outcome = tokio::select! {
        outcome = &mut submit => outcome,
        signal = tokio::signal::ctrl_c() => {
            match signal {
                Ok(()) => thread.cancel().await,
                Err(err) => tracing::warn!(error = %err, "Cannot listen for Ctrl-C"),
            }
            (&mut submit).await
        }
    }?;

    match outcome {
        TurnOutcome::Completed(reply) => {
            for line in reply.text().lines() {
                println!("{}", line.bright_blue());
            }
            let read_model = assistant.response_state().snapshot();
            if let Some(refusal) = read_model
                .guardrails_evaluation
                .as_ref()
                .and_then(|g| g.refusal_message())
            {
                println!("{}", format!("Guardrails: {refusal}").yellow());
            }
            if !read_model.is_empty() {
                println!("{}", "Supporting info available: /info".bright_black());
            }
        }
        TurnOutcome::Failed(err) => {
            println!("{}", format!("Error: {err}").red());
        }
        TurnOutcome::Cancelled => {
            println!("{}", "Cancelled.".yellow());
        }
    }
    println!();
    Ok(())
}
