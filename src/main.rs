//! Multiplayer Tetris server (default binary).
//!
//! Binds the TCP listener, serves up to five concurrent games, and keeps
//! the top-10 score list on disk. Ctrl-C starts a graceful shutdown.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tokio::sync::watch;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use net_tetris::server::{parse_port, run_server, ServerConfig, DEFAULT_SCORES_FILE};

#[derive(Parser, Debug)]
#[command(name = "net-tetris-server", about = "Multiplayer Tetris over TCP")]
struct Args {
    /// Address to listen on.
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to listen on.
    #[arg(short, long, default_value = "30001", value_parser = parse_port)]
    port: u16,

    /// Where the high-score list is persisted.
    #[arg(long, default_value = DEFAULT_SCORES_FILE)]
    scores_file: PathBuf,

    /// Log filter, e.g. `info` or `net_tetris=debug`.
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level)),
        )
        .init();

    let config = ServerConfig {
        host: args.host,
        port: args.port,
        scores_path: args.scores_file,
    };

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("interrupt received");
            let _ = shutdown_tx.send(true);
        }
    });

    if let Err(e) = run_server(config, shutdown_rx, None).await {
        error!(error = %e, "server exited with error");
        return Err(e.into());
    }
    Ok(())
}
