// ABOUTME: Relay CLI - command-line harness for the assistant core.
// ABOUTME: Registers the built-in tools against an in-memory CRM and dispatches calls.
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Relay CRM Intelligence
//!
//! Usage:
//! ```bash
//! # List the tool schemas advertised to the model
//! relay-cli tools list
//!
//! # Execute a tool call against an in-memory CRM
//! relay-cli tools call --name create_organization \
//!     --args '{"name": "Acme Corp"}' --conversation demo
//!
//! # Run the response enhancement pipeline over a transcript
//! relay-cli parse --text "Created deal for $50,000" \
//!     --thought '{"id": "d1", "name": "Acme Renewal", "amount": 50000}'
//! ```

use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::info;
use uuid::Uuid;

use relay_crm_assistant::config::AgentConfig;
use relay_crm_assistant::errors::AppResult;
use relay_crm_assistant::parser::{enhance_response, ToolThought};
use relay_crm_assistant::services::CrmServices;
use relay_crm_assistant::tools::{ToolExecutionContext, ToolRegistry};
use relay_crm_assistant::{errors::AppError, logging};

#[derive(Parser)]
#[command(
    name = "relay-cli",
    about = "Relay CRM Assistant CLI",
    long_about = "Command-line harness for the Relay CRM assistant core: tool discovery, dispatch, and response enhancement."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[non_exhaustive]
#[derive(Subcommand)]
enum Command {
    /// Tool discovery and dispatch
    Tools {
        #[command(subcommand)]
        action: ToolsCommand,
    },

    /// Run the response enhancement pipeline
    Parse {
        /// Free-text response to scan
        #[arg(long)]
        text: String,

        /// Tool-call payloads (JSON), oldest first; repeatable
        #[arg(long = "thought")]
        thoughts: Vec<String>,
    },
}

#[non_exhaustive]
#[derive(Subcommand)]
enum ToolsCommand {
    /// List the schemas of all registered tools
    List,

    /// Execute one tool call
    Call {
        /// Tool name
        #[arg(long)]
        name: String,

        /// Tool arguments as a JSON object
        #[arg(long, default_value = "{}")]
        args: String,

        /// Conversation id
        #[arg(long, default_value = "cli")]
        conversation: String,

        /// Run without credentials to exercise the auth precondition
        #[arg(long)]
        anonymous: bool,
    },
}

#[tokio::main]
async fn main() -> AppResult<()> {
    let cli = Cli::parse();

    if cli.verbose {
        std::env::set_var("RUST_LOG", "debug");
    }
    logging::init_from_env().map_err(|e| AppError::config(e.to_string()))?;

    let config = AgentConfig::from_env();
    info!(environment = %config.environment, "Starting relay-cli");

    let mut registry = ToolRegistry::new();
    registry.register_builtin_tools();

    let services = Arc::new(CrmServices::in_memory());

    match cli.command {
        Command::Tools { action } => match action {
            ToolsCommand::List => {
                let schemas = registry.tool_schemas();
                println!("{}", serde_json::to_string_pretty(&schemas)?);
            }
            ToolsCommand::Call {
                name,
                args,
                conversation,
                anonymous,
            } => {
                let args: serde_json::Value = serde_json::from_str(&args)
                    .map_err(|e| AppError::invalid_input(format!("--args is not valid JSON: {e}")))?;

                let mut ctx = ToolExecutionContext::new(conversation, services);
                if !anonymous {
                    ctx = ctx.with_auth("cli-token", Uuid::new_v4());
                }

                let report = registry.execute(&name, args, &ctx).await?;
                println!("{}", serde_json::to_string_pretty(&report.to_json())?);
            }
        },
        Command::Parse { text, thoughts } => {
            let thoughts: Vec<ToolThought> = thoughts
                .iter()
                .map(|raw| {
                    serde_json::from_str(raw)
                        .map(|payload| ToolThought::new(None, payload))
                        .map_err(|e| {
                            AppError::invalid_input(format!("--thought is not valid JSON: {e}"))
                        })
                })
                .collect::<AppResult<_>>()?;

            let enhancements = enhance_response(&text, &thoughts);
            println!("{}", serde_json::to_string_pretty(&enhancements)?);
        }
    }

    Ok(())
}
