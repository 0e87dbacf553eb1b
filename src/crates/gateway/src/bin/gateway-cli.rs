//! Command-line client for the gateway
//!
//! Keeps no state on disk: the token comes from `--token`/`GATEWAY_TOKEN`
//! and the session id from `--session`, generated when absent.

use anyhow::Context;
use clap::{Parser, Subcommand};
use gateway::api::models::{OrchestrateRequest, RunListQuery, RunResponse};
use gateway::client::{GatewayClient, DEFAULT_SERVER_URL};
use gateway::SessionId;
use tooling::logging::truncate_for_logging;

#[derive(Parser)]
#[command(name = "gateway-cli")]
#[command(about = "Ask several LLMs the same question and see them ranked", long_about = None)]
#[command(version)]
struct Cli {
    /// Gateway base URL
    #[arg(long, env = "GATEWAY_URL", default_value = DEFAULT_SERVER_URL, global = true)]
    server: String,

    /// Bearer token from `login`
    #[arg(long, env = "GATEWAY_TOKEN", global = true, hide_env_values = true)]
    token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account
    Signup {
        username: String,
        #[arg(long, env = "GATEWAY_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Log in and print a token
    Login {
        username: String,
        #[arg(long, env = "GATEWAY_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Ask the configured providers a question
    Ask {
        /// Question text; omit to let the server generate one
        question: Option<String>,

        /// Session to continue; a new one is generated when omitted
        #[arg(short, long)]
        session: Option<String>,

        /// Only ask the first N providers
        #[arg(short = 'n', long)]
        competitors: Option<usize>,

        #[arg(short, long)]
        temperature: Option<f32>,

        /// Do not send earlier turns of the session as context
        #[arg(long)]
        no_context: bool,
    },

    /// List runs, newest first
    Runs {
        #[arg(short, long)]
        session: Option<String>,

        #[arg(short, long, default_value_t = 20)]
        limit: u32,
    },

    /// Show a single run
    Show { run_id: String },

    /// Check server health
    Health {
        /// Also probe the database and providers
        #[arg(long)]
        detailed: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut client = GatewayClient::new(&cli.server)?;
    if let Some(token) = &cli.token {
        client = client.with_token(token);
    }

    match cli.command {
        Commands::Signup { username, password } => {
            let user = client.signup(&username, &password).await?;
            println!("Created user {} ({})", user.username, user.user_id);
        }
        Commands::Login { username, password } => {
            let login = client.login(&username, &password).await?;
            println!("{}", login.token);
            eprintln!("Token expires at {}. Export it as GATEWAY_TOKEN.", login.expires_at);
        }
        Commands::Ask {
            question,
            session,
            competitors,
            temperature,
            no_context,
        } => {
            let session_id = match session {
                Some(raw) => SessionId::parse(raw)?,
                None => {
                    let generated = SessionId::generate();
                    eprintln!("Session: {} (pass --session to continue it)", generated);
                    generated
                }
            };

            let conversation = if no_context {
                Vec::new()
            } else {
                let query = RunListQuery {
                    session_id: Some(session_id.to_string()),
                    limit: Some(5),
                };
                let history = client.runs(&query).await.context("failed to load session history")?;
                // server returns newest first; context wants oldest first
                history.runs.iter().rev().map(RunResponse::to_turn).collect()
            };

            let request = OrchestrateRequest {
                session_id: session_id.to_string(),
                question,
                conversation,
                num_competitors: competitors,
                temperature,
            };
            let run = client.orchestrate(&request).await?;
            print_run(&run);
        }
        Commands::Runs { session, limit } => {
            let query = RunListQuery {
                session_id: session,
                limit: Some(limit),
            };
            let list = client.runs(&query).await?;
            if list.runs.is_empty() {
                println!("No runs.");
            }
            for run in &list.runs {
                println!(
                    "{}  {}  session={}  winner={}  {}ms  {}",
                    run.created_at,
                    run.run_id,
                    run.session_id,
                    run.ranking.first().map(String::as_str).unwrap_or("-"),
                    run.latency_ms,
                    truncate_for_logging(&run.question, 60)
                );
            }
        }
        Commands::Show { run_id } => {
            let run = client.run(&run_id).await?;
            print_run(&run);
        }
        Commands::Health { detailed } => {
            if detailed {
                let health = client.health_detailed().await?;
                println!("status: {}  database: {}", health.status, health.database);
                for (name, up) in &health.providers {
                    println!("  {:<20} {}", name, if *up { "up" } else { "down" });
                }
            } else {
                let health = client.health().await?;
                println!("status: {}  version: {}", health.status, health.version);
            }
        }
    }

    Ok(())
}

fn print_run(run: &RunResponse) {
    println!("Question: {}", run.question);
    println!("Session:  {}   Run: {}   {}ms", run.session_id, run.run_id, run.latency_ms);
    println!();

    for (rank, provider) in run.ranking.iter().enumerate() {
        if let Some(response) = run.responses.iter().find(|r| &r.provider == provider) {
            println!("#{} {} (score {:.1})", rank + 1, response.provider, response.score);
            println!("{}", response.text);
            println!();
        }
    }

    for (key, value) in run.metadata.iter().filter(|(k, _)| k.starts_with("provider_error.")) {
        println!("! {} {}", key.trim_start_matches("provider_error."), value);
    }
}
