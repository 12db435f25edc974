//! TCP front end: listener, slot-bounded accept loop, shutdown sequencing.
//!
//! Each accepted connection claims a slot before a worker is spawned; a
//! full house is turned away at the door. On shutdown the accept loop
//! stops first, live sessions get a short grace period to notice the
//! flag, stragglers are aborted, and the score aggregator drains last so
//! every reported score lands in the persisted list.

mod scores;
mod session;
mod slots;

pub use scores::{
    load_scores, persist_scores, score_channel, ScoreAggregator, ScoreBoard, ScoreQueue,
};
pub use session::run_session;
pub use slots::{SlotGuard, SlotRegistry};

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::sync::{oneshot, watch};
use tokio::task::JoinSet;
use tracing::{info, warn};

use crate::error::Result;

const SHUTDOWN_GRACE: Duration = Duration::from_secs(1);

pub const DEFAULT_PORT: u16 = 30001;
pub const DEFAULT_SCORES_FILE: &str = "high_scores.txt";

/// Reserved by the historical desktop build of the game; refuse it so a
/// misconfigured client and server never silently share the number.
const RESERVED_PORT: u16 = 31457;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub scores_path: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
            scores_path: PathBuf::from(DEFAULT_SCORES_FILE),
        }
    }
}

/// Port parser shared by the server and client command lines. Ports at
/// or below 1024 need privileges and 65535 is kept free for the OS.
pub fn parse_port(raw: &str) -> std::result::Result<u16, String> {
    let port: u16 = raw
        .parse()
        .map_err(|_| format!("`{raw}` is not a port number"))?;
    if !(1025..=65534).contains(&port) {
        return Err(format!("port {port} is outside 1025..=65534"));
    }
    if port == RESERVED_PORT {
        return Err(format!("port {port} is reserved"));
    }
    Ok(port)
}

/// Run the server until the shutdown flag flips.
///
/// `ready` fires with the bound address once the listener is up, which
/// lets tests bind port 0 and learn the real port.
pub async fn run_server(
    config: ServerConfig,
    mut shutdown: watch::Receiver<bool>,
    ready: Option<oneshot::Sender<SocketAddr>>,
) -> Result<()> {
    let (aggregator, queue) = ScoreAggregator::start(config.scores_path.clone()).await?;
    let board = aggregator.board();
    let slots = SlotRegistry::new();

    let listener = TcpListener::bind((config.host.as_str(), config.port)).await?;
    let bound = listener.local_addr()?;
    info!(%bound, scores = %config.scores_path.display(), "listening");
    if let Some(tx) = ready {
        let _ = tx.send(bound);
    }

    let mut sessions = JoinSet::new();

    loop {
        tokio::select! {
            accepted = listener.accept() => {
                let (stream, peer) = accepted?;
                match SlotRegistry::acquire(&slots) {
                    Ok(slot) => {
                        info!(%peer, slot = slot.id(), "session accepted");
                        let board = Arc::clone(&board);
                        let queue = queue.clone();
                        let shutdown = shutdown.clone();
                        sessions.spawn(async move {
                            if let Err(e) =
                                session::run_session(stream, slot, board, queue, shutdown).await
                            {
                                warn!(%peer, error = %e, "session failed");
                            }
                        });
                    }
                    Err(e) => {
                        warn!(%peer, error = %e, "turning away connection");
                        drop(stream);
                    }
                }
            }
            Some(joined) = sessions.join_next(), if !sessions.is_empty() => {
                if let Err(e) = joined {
                    warn!(error = %e, "session task panicked");
                }
            }
            _ = shutdown.changed() => break,
        }
    }

    info!(live = sessions.len(), "shutting down");
    let drained = tokio::time::timeout(SHUTDOWN_GRACE, async {
        while sessions.join_next().await.is_some() {}
    })
    .await;
    if drained.is_err() {
        warn!(live = sessions.len(), "grace period over, aborting sessions");
        sessions.abort_all();
        while sessions.join_next().await.is_some() {}
    }

    // The accept loop's producer handle was the last one; dropping it
    // closes the channel so the aggregator drains and persists.
    drop(queue);
    aggregator.shutdown().await;
    Ok(())
}
