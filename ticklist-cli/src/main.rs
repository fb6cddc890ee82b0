//! Ticklist CLI - MCP server and stub HTTP API for the TODO catalog

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;
use ticklist_core::config::TicklistConfig;
use ticklist_core::mcp::{McpServer, StdioTransport};
use ticklist_core::messages::{Locale, Messages};
use tracing::info;

#[derive(Parser)]
#[command(name = "ticklist")]
#[command(about = "In-memory TODO catalog served over MCP", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the catalog over MCP on stdin/stdout
    Serve {
        /// Configuration file (defaults to ticklist.toml plus TICKLIST_* variables)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Locale for client-visible text (en, ja)
        #[arg(short, long, env = "TICKLIST_LOCALE")]
        locale: Option<Locale>,
    },
    /// Run the stub HTTP API
    Http {
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Address to bind, e.g. 127.0.0.1:8787
        #[arg(short, long)]
        bind: Option<SocketAddr>,
    },
    /// Print the catalog as seeded at startup
    List {
        #[arg(short, long)]
        config: Option<PathBuf>,

        #[arg(short, long, env = "TICKLIST_LOCALE")]
        locale: Option<Locale>,
    },
    /// Version information
    Version,
}

fn load_config(path: Option<PathBuf>) -> Result<TicklistConfig> {
    let config = match path {
        Some(path) => TicklistConfig::from_file(&path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => TicklistConfig::load()?,
    };
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    // stdout carries MCP traffic, so logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Version => {
            println!("ticklist {}", env!("CARGO_PKG_VERSION"));
            println!("ticklist-core {}", ticklist_core::VERSION);
        }
        Commands::Serve { config, locale } => {
            let mut config = load_config(config)?;
            if let Some(locale) = locale {
                config.server.locale = locale;
            }

            let catalog = config.catalog.build_catalog()?.into_shared();
            let server = McpServer::for_catalog(&config, catalog)?;
            info!(
                name = %config.server.name,
                version = %config.server.version,
                locale = %config.server.locale,
                "MCP server running on stdio"
            );
            server.run(StdioTransport::new()).await?;
        }
        Commands::Http { config, bind } => {
            let mut config = load_config(config)?;
            if let Some(bind) = bind {
                config.http.bind = bind;
            }
            ticklist_core::http::serve(&config.http).await?;
        }
        Commands::List { config, locale } => {
            let config = load_config(config)?;
            let messages = Messages::new(locale.unwrap_or(config.server.locale));
            let catalog = config.catalog.build_catalog()?;

            for item in catalog.iter() {
                println!("{:>4}  {}", item.id.as_str(), messages.resource_name(item));
            }
            println!(
                "{} total, {} pending, {} completed",
                catalog.len(),
                catalog.pending_count(),
                catalog.completed_count()
            );
        }
    }

    Ok(())
}
