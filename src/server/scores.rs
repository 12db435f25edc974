//! Score aggregator - bounded submission queue feeding a shared top-N list.
//!
//! Session workers produce final scores into a bounded channel; `produce`
//! waits while the queue is full and the single consumer task waits while
//! it is empty, so no score is lost or reordered. The sorted list lives
//! behind its own lock so handshake reads never contend with queue
//! traffic. When the last producer hangs up the consumer drains what is
//! left and rewrites the score file atomically.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::{mpsc, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::types::{SCOREBOARD_SIZE, SCORE_QUEUE_DEPTH};

/// The shared ranked list: always sorted descending, fixed capacity.
///
/// Absent entries are zero, which no submission can displace with less.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreBoard {
    entries: [u32; SCOREBOARD_SIZE],
}

impl ScoreBoard {
    pub fn new() -> Self {
        Self {
            entries: [0; SCOREBOARD_SIZE],
        }
    }

    /// Build from persisted values in unknown order; sorts and truncates.
    pub fn from_entries(values: impl IntoIterator<Item = u32>) -> Self {
        let mut board = Self::new();
        for value in values {
            board.submit(value);
        }
        board
    }

    /// Record a score if it beats the current minimum retained entry.
    ///
    /// Returns whether the list changed. The update is monotone: the set
    /// of retained scores never gets worse.
    pub fn submit(&mut self, score: u32) -> bool {
        let min = self.entries[SCOREBOARD_SIZE - 1];
        if score <= min {
            return false;
        }
        self.entries[SCOREBOARD_SIZE - 1] = score;
        self.entries.sort_unstable_by(|a, b| b.cmp(a));
        true
    }

    /// Entries, best first.
    pub fn entries(&self) -> &[u32; SCOREBOARD_SIZE] {
        &self.entries
    }
}

impl Default for ScoreBoard {
    fn default() -> Self {
        Self::new()
    }
}

/// Producer handle to the bounded submission queue.
#[derive(Debug, Clone)]
pub struct ScoreQueue {
    tx: mpsc::Sender<u32>,
}

impl ScoreQueue {
    /// Submit a final session score; waits while the queue is full.
    pub async fn produce(&self, score: u32) {
        if self.tx.send(score).await.is_err() {
            // Consumer gone during shutdown; the score is dropped.
            debug!(score, "score queue closed, submission dropped");
        }
    }
}

/// Create a bounded score channel of the given depth.
pub fn score_channel(depth: usize) -> (ScoreQueue, mpsc::Receiver<u32>) {
    let (tx, rx) = mpsc::channel(depth);
    (ScoreQueue { tx }, rx)
}

/// The aggregator: shared list plus the background consumer task.
pub struct ScoreAggregator {
    board: Arc<RwLock<ScoreBoard>>,
    consumer: JoinHandle<()>,
}

impl ScoreAggregator {
    /// Seed the list from the score file and start the consumer.
    ///
    /// Returns the aggregator and the producer handle. The consumer runs
    /// until every `ScoreQueue` clone is dropped, then persists the list.
    pub async fn start(path: PathBuf) -> std::io::Result<(Self, ScoreQueue)> {
        let board = Arc::new(RwLock::new(load_scores(&path).await?));
        let (queue, rx) = score_channel(SCORE_QUEUE_DEPTH);

        let consumer_board = Arc::clone(&board);
        let consumer = tokio::spawn(consume_loop(consumer_board, rx, path));

        Ok((Self { board, consumer }, queue))
    }

    /// Shared handle for scoreboard reads (handshake broadcasts).
    pub fn board(&self) -> Arc<RwLock<ScoreBoard>> {
        Arc::clone(&self.board)
    }

    /// Wait for the consumer to drain and persist.
    ///
    /// All `ScoreQueue` clones must be dropped first or this never returns.
    pub async fn shutdown(self) {
        if let Err(e) = self.consumer.await {
            warn!(error = %e, "score consumer task failed");
        }
    }
}

/// Single consumer: serializes every mutation of the shared list.
async fn consume_loop(board: Arc<RwLock<ScoreBoard>>, mut rx: mpsc::Receiver<u32>, path: PathBuf) {
    while let Some(score) = rx.recv().await {
        if board.write().await.submit(score) {
            info!(score, "high score recorded");
        }
    }

    let snapshot = board.read().await.clone();
    match persist_scores(&path, &snapshot).await {
        Ok(()) => info!(path = %path.display(), "score file written"),
        Err(e) => warn!(path = %path.display(), error = %e, "failed to persist scores"),
    }
}

/// Load persisted scores: newline-delimited decimal integers, any order.
///
/// A missing file is an empty board; unparsable lines are skipped.
pub async fn load_scores(path: &Path) -> std::io::Result<ScoreBoard> {
    let contents = match tokio::fs::read_to_string(path).await {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(ScoreBoard::new()),
        Err(e) => return Err(e),
    };

    let values = contents.lines().filter_map(|line| {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        match line.parse::<u32>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(line, "skipping unparsable score line");
                None
            }
        }
    });

    Ok(ScoreBoard::from_entries(values))
}

/// Rewrite the score file atomically: temp file in place, then rename.
pub async fn persist_scores(path: &Path, board: &ScoreBoard) -> std::io::Result<()> {
    let mut contents = String::new();
    for score in board.entries() {
        contents.push_str(&score.to_string());
        contents.push('\n');
    }

    let tmp = path.with_extension("tmp");
    tokio::fs::write(&tmp, contents).await?;
    tokio::fs::rename(&tmp, path).await
}
