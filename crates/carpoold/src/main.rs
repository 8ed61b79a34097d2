//! carpoold — the carpool daemon.
//!
//! Single binary that loads `carpool.toml`, builds the matching service
//! and serves the HTTP API until Ctrl-C.
//!
//! # Usage
//!
//! ```text
//! carpoold serve --config /etc/carpool/carpool.toml --port 9091
//! carpoold check-config --config /etc/carpool/carpool.toml
//! ```

use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;

use carpool_core::CarpoolConfig;
use carpool_scheduler::MatchingService;

#[derive(Parser)]
#[command(name = "carpoold", about = "Carpool matching daemon")]
struct Cli {
    /// Log output format.
    #[arg(long, value_enum, default_value_t = LogFormat::Text, global = true)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the matching API.
    Serve {
        /// Path to carpool.toml. Defaults apply when omitted.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Port to listen on (overrides the config file).
        #[arg(long)]
        port: Option<u16>,

        /// Address to bind (overrides the config file).
        #[arg(long)]
        bind: Option<IpAddr>,
    },
    /// Parse and validate a config file, then print the effective config.
    CheckConfig {
        #[arg(long)]
        config: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_format);

    match cli.command {
        Command::Serve { config, port, bind } => {
            let mut config = load_config(config.as_deref())?;
            if let Some(port) = port {
                config.server.port = port;
            }
            if let Some(bind) = bind {
                config.server.bind = bind;
            }
            serve(config)
        }
        Command::CheckConfig { config } => {
            let config = CarpoolConfig::from_file(&config)?;
            print!("{}", config.to_toml_string()?);
            Ok(())
        }
    }
}

fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new("info,carpoold=debug,carpool_scheduler=debug,carpool_api=debug")
    });

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<CarpoolConfig> {
    match path {
        Some(path) => {
            let config = CarpoolConfig::from_file(path)?;
            info!(path = ?path, "config loaded");
            Ok(config)
        }
        None => Ok(CarpoolConfig::default()),
    }
}

#[tokio::main]
async fn serve(config: CarpoolConfig) -> anyhow::Result<()> {
    info!("carpool daemon starting");

    let service = MatchingService::with_config(config.cars.iter().copied(), &config.matching)?;
    let state = carpool_api::ApiState::new(service, config.matching.clone());
    let router = carpool_api::build_router(state);

    let addr: SocketAddr = config.server.socket_addr();
    info!(%addr, "API server starting");

    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Graceful shutdown on Ctrl-C.
    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("shutdown signal received");
            }
        })
        .await?;

    info!("carpool daemon stopped");
    Ok(())
}
