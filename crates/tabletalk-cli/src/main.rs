//! CLI binary for the tabletalk CSV question-answering server.

use std::sync::Arc;

use clap::{Parser, Subcommand};

use tabletalk_gateway::{providers, Gateway, GatewayConfig};

#[derive(Parser)]
#[command(name = "tabletalk", version, about = "Ask questions about CSV files via LLM providers")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Address to bind
        #[arg(long, default_value = "0.0.0.0")]
        host: String,

        /// Port to listen on
        #[arg(long, default_value_t = 5000)]
        port: u16,
    },

    /// Show supported providers and their credential status
    Providers,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .init();

    match cli.command {
        Commands::Serve { host, port } => {
            cmd_serve(&host, port).await?;
        }
        Commands::Providers => {
            cmd_providers();
        }
    }

    Ok(())
}

async fn cmd_serve(host: &str, port: u16) -> anyhow::Result<()> {
    let config = GatewayConfig::from_env();

    let configured: Vec<&str> = config
        .configured_kinds()
        .iter()
        .map(|k| k.as_str())
        .collect();
    if configured.is_empty() {
        tracing::warn!(
            "no LLM provider credentials found; set ANTHROPIC_API_KEY, OPENAI_API_KEY, \
             or GOOGLE_API_KEY, otherwise /chat will fail"
        );
    } else {
        tracing::info!(providers = ?configured, "provider credentials detected");
    }

    let gateway = Arc::new(Gateway::new(config));
    let app = tabletalk_server::router(gateway);

    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "tabletalk listening");
    axum::serve(listener, app).await?;

    Ok(())
}

fn cmd_providers() {
    let config = GatewayConfig::from_env();

    println!("{:<12} {:<22} {:<18} status", "provider", "credential", "default model");
    for descriptor in providers() {
        let status = if config.api_key_for(descriptor.kind).is_some() {
            "configured"
        } else {
            "missing"
        };
        println!(
            "{:<12} {:<22} {:<18} {}",
            descriptor.kind, descriptor.credential_env, descriptor.default_model, status
        );
    }
}
