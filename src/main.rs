use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use call_agent::api::ApiServerBuilder;
use call_agent::{Config, ReplyResolver};

/// Call Agent - reply service for a browser voice call demo
#[derive(Parser)]
#[command(name = "call-agent", version, about)]
struct Cli {
    /// Path to config file (defaults to ~/.config/call-agent/config.toml)
    #[arg(short, long, env = "CALL_AGENT_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP API server (default)
    Serve {
        /// Port to listen on
        #[arg(long)]
        port: Option<u16>,

        /// Host to bind
        #[arg(long)]
        host: Option<String>,
    },
    /// Resolve a single utterance and print the reply
    Ask {
        /// What the caller said
        utterance: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "info,call_agent=info",
        1 => "info,call_agent=debug",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::load(cli.config.as_deref());
    tracing::debug!(?config, "loaded configuration");

    let resolver = ReplyResolver::from_config(&config)?;

    match cli.command.unwrap_or(Command::Serve {
        port: None,
        host: None,
    }) {
        Command::Serve { port, host } => {
            let mut builder = ApiServerBuilder::new(resolver).server_config(&config.api_server);
            if let Some(port) = port {
                builder = builder.port(port);
            }
            if let Some(host) = host {
                builder = builder.host(host);
            }

            tracing::info!("starting call agent");
            builder.build().run().await?;
        }
        Command::Ask { utterance } => {
            let reply = resolver.resolve_reply(&utterance, &[]).await;
            tracing::debug!(source = ?reply.source, "resolved reply");
            println!("{}", reply.text);
        }
    }

    Ok(())
}
