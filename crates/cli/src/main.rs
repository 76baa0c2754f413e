use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use events::Event;
use serde_json::json;
use server::config::{AppConfig, DEFAULT_CONFIG_FILE};
use server::{create_router, state::AppState};
use tot_core::{RunResult, TaskInput};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "tot-server")]
#[command(about = "Tree-of-thoughts beam search over an LLM oracle", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file; missing files fall back to defaults
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP, SSE and WebSocket service
    Serve {
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Run one search and print its result
    Solve {
        #[command(subcommand)]
        task: SolveTask,

        /// Print every progress event as a JSON line first
        #[arg(long, global = true)]
        events: bool,
    },
    /// Write the default configuration file
    InitConfig {
        path: Option<PathBuf>,

        #[arg(long)]
        force: bool,
    },
}

#[derive(Subcommand)]
enum SolveTask {
    /// Combine four numbers into 24
    Game24 {
        #[arg(required = true, allow_negative_numbers = true)]
        numbers: Vec<f64>,
    },
    /// Continue a story from four seed sentences
    CreativeWriting {
        #[arg(required = true)]
        sentences: Vec<String>,
    },
}

impl SolveTask {
    fn input(&self) -> Result<TaskInput> {
        let input = match self {
            SolveTask::Game24 { numbers } => TaskInput::game24(&json!({ "numbers": numbers })),
            SolveTask::CreativeWriting { sentences } => {
                TaskInput::creative_writing(&json!({ "sentences": sentences }))
            }
        };
        Ok(input?)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Serve { port }) => serve(&cli.config, port).await,
        Some(Commands::Solve { task, events }) => solve(&cli.config, &task, events).await,
        Some(Commands::InitConfig { path, force }) => {
            init_config(path.as_deref().unwrap_or(&cli.config), force).await
        }
        None => serve(&cli.config, None).await,
    }
}

async fn serve(config_path: &Path, port: Option<u16>) -> Result<()> {
    init_tracing();

    let mut config = AppConfig::load(Some(config_path))
        .await
        .context("Failed to load configuration")?;
    if let Some(port) = port {
        config.server.port = port;
    }

    let addr = config.bind_address();
    tracing::info!(
        model = %config.oracle.model,
        beam_width = config.search.beam_width,
        max_depth = config.search.max_depth,
        "Configuration loaded"
    );

    let state = AppState::from_config(config)?;
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    println!();
    println!("Tree-of-Thoughts search service");
    println!("════════════════════════════════════════");
    println!();
    println!("  HTTP API:   http://{}/api", addr);
    println!("  WebSocket:  ws://{}/ws", addr);
    println!("  OpenAPI:    http://{}/api/openapi.json", addr);
    println!();
    println!("Press Ctrl+C to stop");
    println!();

    axum::serve(listener, app).await?;

    Ok(())
}

async fn solve(config_path: &Path, task: &SolveTask, print_events: bool) -> Result<()> {
    init_tracing();

    let input = task.input()?;
    let config = AppConfig::load(Some(config_path))
        .await
        .context("Failed to load configuration")?;
    let state = AppState::from_config(config)?;

    let result = if print_events {
        let mut stream = state.service.spawn(input);
        let mut outcome: Option<Result<RunResult>> = None;

        while let Some(envelope) = stream.next().await {
            println!("{}", serde_json::to_string(&envelope)?);
            match envelope.event {
                Event::Solution { result } => outcome = Some(Ok(result)),
                Event::Error { message } => outcome = Some(Err(anyhow!(message))),
                _ => {}
            }
        }

        outcome.unwrap_or_else(|| Err(anyhow!("Run ended without a result")))?
    } else {
        state
            .service
            .run_detached(&input)
            .await
            .map_err(|e| anyhow!(e.public_message()))?
    };

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

async fn init_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!(
            "{} already exists; pass --force to overwrite it",
            path.display()
        );
    }

    let content = AppConfig::default().to_toml()?;
    tokio::fs::write(path, content)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;

    println!("Wrote default configuration to {}", path.display());
    println!("Set OPENAI_API_KEY or oracle.api_key before running searches.");
    Ok(())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "tot_server=info,server=info,engine=info,oracle=info,tower_http=info".into()
            }),
        )
        .init();
}
