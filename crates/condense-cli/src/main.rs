//! Condense - conversation compaction CLI

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use condense_context::CompactionPolicy;
use condense_providers::{CompactionClient, CompactionResult};
use serde_json::json;

mod commands;
mod config;
mod history;

use commands::{Cli, Commands};
use config::CliConfig;
use history::History;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("{}: {:#}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => CliConfig::load_from(path)?,
        None => CliConfig::load(),
    };

    let telemetry = if cli.verbose {
        config.telemetry.clone().with_level("debug")
    } else {
        config.telemetry.clone()
    };
    condense_telemetry::init_subscriber(&telemetry);

    let model = config.model(cli.model.as_deref()).to_string();
    tracing::debug!(model = %model, command = ?cli.command, "starting");

    match &cli.command {
        Commands::Estimate { file } => {
            let history = History::load(file, None)?;
            run_estimate(&cli, &history)
        }
        Commands::Check { file, instructions } => {
            let history = History::load(file, instructions.clone())?;
            run_check(&cli, &config, &model, &history)
        }
        Commands::Compact { file, instructions } => {
            let history = History::load(file, instructions.clone())?;
            run_compact(&cli, &config, &model, &history).await
        }
    }
}

fn run_estimate(cli: &Cli, history: &History) -> Result<()> {
    let tokens =
        condense_context::estimate_messages_tokens(&history.messages, history.instructions());

    if cli.json {
        let output = json!({"messages": history.messages.len(), "tokens": tokens});
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!(
            "{}: {}",
            "Messages".cyan(),
            history.messages.len().to_string().yellow()
        );
        println!("{}: {}", "Estimated tokens".cyan(), tokens.to_string().yellow());
    }

    Ok(())
}

fn run_check(cli: &Cli, config: &CliConfig, model: &str, history: &History) -> Result<()> {
    config.compaction.validate()?;

    let tokens =
        condense_context::estimate_messages_tokens(&history.messages, history.instructions());
    let policy = CompactionPolicy::for_model(model, config.compaction.clone());
    let decision = policy.evaluate(tokens);

    if cli.json {
        let output = json!({
            "model": model,
            "tokens": tokens,
            "context_window": policy.context_window(),
            "supports_compaction": policy.supports_compaction(),
            "threshold_tokens": policy.threshold_tokens(),
            "usage_ratio": policy.usage_ratio(tokens),
            "decision": decision,
            "should_compact": decision.is_triggered(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("{}", "─".repeat(50).dimmed());
    println!("{}: {}", "Model".cyan(), model.yellow());
    println!(
        "{}: {} ({:.1}% of {})",
        "Estimated tokens".cyan(),
        tokens.to_string().yellow(),
        policy.usage_ratio(tokens) * 100.0,
        policy.context_window()
    );
    println!(
        "{}: {:.0}",
        "Threshold".cyan(),
        policy.threshold_tokens()
    );
    println!("{}", "─".repeat(50).dimmed());

    if decision.is_triggered() {
        println!("{} {}", "✓".green().bold(), decision);
    } else {
        println!("{} {}", "·".dimmed(), decision.to_string().dimmed());
    }

    Ok(())
}

async fn run_compact(cli: &Cli, config: &CliConfig, model: &str, history: &History) -> Result<()> {
    let client = CompactionClient::new(config.client_config(model)?)?;
    let result = client
        .compact(&history.messages, history.instructions())
        .await;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    match &result {
        CompactionResult::NotCompacted { original_tokens } => {
            println!(
                "{} {} ({} tokens)",
                "·".dimmed(),
                "Not compacted".dimmed(),
                original_tokens
            );
        }
        CompactionResult::Compacted {
            compacted_input,
            original_tokens,
            compacted_tokens,
        } => {
            println!(
                "{} {}: {} → {} tokens ({} items)",
                "✓".green().bold(),
                "Compacted".green(),
                original_tokens.to_string().yellow(),
                compacted_tokens.to_string().yellow(),
                compacted_input.len()
            );
        }
    }

    Ok(())
}
