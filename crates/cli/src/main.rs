//! uneventful CLI - Command-line client for the uneventful daemon
//!
//! Talks JSON-RPC to the local daemon. Authenticated commands take the
//! session token via --session or UNEVENTFUL_SESSION.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tabled::{Table, Tabled};

const DEFAULT_RPC_URL: &str = "http://127.0.0.1:2999";

#[derive(Parser)]
#[command(name = "uneventful")]
#[command(about = "Event planning daemon CLI", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// RPC server URL
    #[arg(long, env = "UNEVENTFUL_RPC_URL", default_value = DEFAULT_RPC_URL)]
    rpc_url: String,

    /// Session token for authenticated commands
    #[arg(long, env = "UNEVENTFUL_SESSION", global = true)]
    session: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Request a magic login link via SMS
    Login {
        /// Phone number (any common format)
        phone: String,
    },

    /// Register a new account and send the first login link
    Register {
        /// Phone number
        phone: String,

        #[arg(long)]
        first_name: String,

        #[arg(long)]
        last_name: String,
    },

    /// Exchange a magic-link token for a session token
    Verify {
        /// Token from the SMS link
        token: String,
    },

    /// Show the logged-in user
    Whoami,

    /// List your events
    Events,

    /// Show one event's data and checklist progress
    Event {
        /// Event ID
        event_id: String,
    },

    /// Create an event from a JSON data blob
    Create {
        /// Event form data as JSON (e.g. '{"eventName":"Party","eventDate":"06/15/2026"}')
        data: String,
    },

    /// Enable SMS reminders for an event
    Subscribe {
        /// Event ID
        event_id: String,
    },

    /// Disable SMS reminders for an event
    Unsubscribe {
        /// Event ID
        event_id: String,
    },

    /// Show daemon status
    Status,
}

#[derive(Serialize)]
struct JsonRpcRequest {
    jsonrpc: String,
    method: String,
    params: serde_json::Value,
    id: u64,
}

#[derive(Deserialize)]
struct JsonRpcResponse {
    #[allow(dead_code)]
    jsonrpc: String,
    #[allow(dead_code)]
    id: u64,
    result: Option<serde_json::Value>,
    error: Option<JsonRpcError>,
}

#[derive(Deserialize)]
struct JsonRpcError {
    code: i32,
    message: String,
}

#[derive(Tabled)]
struct EventRow {
    id: String,
    #[tabled(rename = "event")]
    event_name: String,
    #[tabled(rename = "date")]
    event_date: String,
    created_at: String,
}

#[derive(Deserialize, Tabled)]
struct ProgressRow {
    task_name: String,
    completed_subtasks: usize,
    total_subtasks: usize,
    completed: bool,
}

async fn call_rpc(url: &str, method: &str, params: serde_json::Value) -> Result<serde_json::Value> {
    let request = JsonRpcRequest {
        jsonrpc: "2.0".to_string(),
        method: method.to_string(),
        params,
        id: 1,
    };

    let client = reqwest::Client::new();
    let response: JsonRpcResponse = client
        .post(url)
        .json(&request)
        .send()
        .await
        .context("Failed to connect to daemon")?
        .json()
        .await
        .context("Failed to parse response")?;

    if let Some(error) = response.error {
        anyhow::bail!("RPC error ({}): {}", error.code, error.message);
    }

    response
        .result
        .ok_or_else(|| anyhow::anyhow!("No result in response"))
}

fn require_session(session: &Option<String>) -> Result<String> {
    session
        .clone()
        .ok_or_else(|| anyhow::anyhow!("Session token required (--session or UNEVENTFUL_SESSION)"))
}

fn event_row(event: &serde_json::Value) -> EventRow {
    EventRow {
        id: event["id"].as_str().unwrap_or_default().to_string(),
        event_name: event["data"]["eventName"]
            .as_str()
            .unwrap_or("(unnamed)")
            .to_string(),
        event_date: event["data"]["eventDate"].as_str().unwrap_or("-").to_string(),
        created_at: event["created_at"].as_str().unwrap_or_default().to_string(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Login { phone } => {
            let result = call_rpc(&cli.rpc_url, "auth.request.v1", json!({ "phone": phone })).await?;

            match result["status"].as_str() {
                Some("link_sent") => {
                    println!("{}", "✓ Magic link sent, check your phone".green().bold())
                }
                Some("registration_required") => {
                    println!("{}", "No account for this phone number".yellow());
                    println!("Run: uneventful register <phone> --first-name ... --last-name ...");
                }
                _ => println!("{}", "Unexpected response".red()),
            }
        }

        Commands::Register {
            phone,
            first_name,
            last_name,
        } => {
            let params = json!({
                "phone": phone,
                "first_name": first_name,
                "last_name": last_name,
            });
            let result = call_rpc(&cli.rpc_url, "auth.register.v1", params).await?;

            println!("{}", "✓ Account created, magic link sent".green().bold());
            println!("  {} {}", "User ID:".bold(), result["user"]["id"]);
        }

        Commands::Verify { token } => {
            let result = call_rpc(&cli.rpc_url, "auth.verify.v1", json!({ "token": token })).await?;

            println!("{}", "✓ Logged in".green().bold());
            println!();
            println!("export UNEVENTFUL_SESSION={}", result["session_token"].as_str().unwrap_or_default());
        }

        Commands::Whoami => {
            let session = require_session(&cli.session)?;
            let result =
                call_rpc(&cli.rpc_url, "auth.me.v1", json!({ "session_token": session })).await?;
            let user = &result["user"];

            println!(
                "{} {} ({})",
                user["first_name"].as_str().unwrap_or_default(),
                user["last_name"].as_str().unwrap_or_default(),
                user["phone"].as_str().unwrap_or_default()
            );
            if user["is_admin"].as_bool().unwrap_or(false) {
                println!("{}", "admin".cyan());
            }
        }

        Commands::Events => {
            let session = require_session(&cli.session)?;
            let result = call_rpc(
                &cli.rpc_url,
                "events.list.v1",
                json!({ "session_token": session }),
            )
            .await?;

            let rows: Vec<EventRow> = result["events"]
                .as_array()
                .map(|events| events.iter().map(event_row).collect())
                .unwrap_or_default();

            if rows.is_empty() {
                println!("{}", "No events yet".yellow());
            } else {
                println!("{}", Table::new(rows));
            }
        }

        Commands::Event { event_id } => {
            let session = require_session(&cli.session)?;
            let event = call_rpc(
                &cli.rpc_url,
                "events.get.v1",
                json!({ "session_token": session, "event_id": event_id }),
            )
            .await?;

            println!("{}", serde_json::to_string_pretty(&event["data"])?);
            println!();

            let progress = call_rpc(
                &cli.rpc_url,
                "tasks.progress.v1",
                json!({ "session_token": session, "event_id": event_id }),
            )
            .await?;

            let rows: Vec<ProgressRow> = serde_json::from_value(progress["progress"].clone())?;
            if rows.is_empty() {
                println!("{}", "No checklist tasks apply".yellow());
            } else {
                println!("{}", Table::new(rows));
            }
        }

        Commands::Create { data } => {
            let session = require_session(&cli.session)?;
            let data_json: serde_json::Value =
                serde_json::from_str(&data).context("Invalid JSON data")?;

            let event = call_rpc(
                &cli.rpc_url,
                "events.create.v1",
                json!({ "session_token": session, "data": data_json }),
            )
            .await?;

            println!("{}", "✓ Event created".green().bold());
            println!("  {} {}", "Event ID:".bold(), event["id"]);
        }

        Commands::Subscribe { event_id } => {
            let session = require_session(&cli.session)?;
            call_rpc(
                &cli.rpc_url,
                "events.subscribe.v1",
                json!({ "session_token": session, "event_id": event_id }),
            )
            .await?;

            println!("{}", "✓ Daily reminders enabled".green().bold());
        }

        Commands::Unsubscribe { event_id } => {
            let session = require_session(&cli.session)?;
            call_rpc(
                &cli.rpc_url,
                "events.unsubscribe.v1",
                json!({ "session_token": session, "event_id": event_id }),
            )
            .await?;

            println!("{}", "✓ Daily reminders disabled".green().bold());
        }

        Commands::Status => {
            println!("{}", "Daemon Status".cyan().bold());
            println!();

            match call_rpc(&cli.rpc_url, "health.check.v1", json!({})).await {
                Ok(health) => {
                    println!("  {} {}", "RPC URL:".bold(), cli.rpc_url);
                    println!("  {} {}", "Status:".bold(), "ONLINE".green());
                    println!("  {} {}", "Version:".bold(), health["version"]);
                    println!(
                        "  {} {} seconds",
                        "Uptime:".bold(),
                        health["uptime_seconds"]
                    );
                }
                Err(e) => {
                    println!("  {} {}", "Status:".bold(), "ERROR".red());
                    println!("  {} {}", "Error:".bold(), e);
                }
            }
        }
    }

    Ok(())
}
