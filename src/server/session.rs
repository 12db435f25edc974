//! Session worker - drives one connected client end to end.
//!
//! The worker owns its slot and its game exclusively. The loop waits for
//! the next input byte with a timeout bounded by the gravity granularity,
//! so ticks are never starved by a quiet client, then sends the resulting
//! state frame. Only a finished game (LOSE or WIN) reports a score;
//! sessions abandoned mid-game leave none. The slot guard releases on
//! drop regardless of how the loop ended.

use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::{watch, RwLock};
use tokio::time::Instant;
use tracing::{debug, info};

use crate::core::Game;
use crate::error::{Error, Result};
use crate::types::STEP_TIME_GRANULARITY_MS;
use crate::wire::{decode_input, encode_scoreboard, StateFrame};

use super::scores::{ScoreBoard, ScoreQueue};
use super::slots::SlotGuard;

/// Run one client session to completion.
pub async fn run_session(
    mut stream: TcpStream,
    slot: SlotGuard,
    board: Arc<RwLock<ScoreBoard>>,
    queue: ScoreQueue,
    mut shutdown: watch::Receiver<bool>,
) -> Result<()> {
    let slot_id = slot.id();

    handshake(&mut stream, &board).await?;

    let mut game = Game::from_entropy(slot_id as u32);
    let outcome = drive(&mut stream, &mut game, &mut shutdown).await;

    info!(
        slot = slot_id,
        points = game.points(),
        level = game.level(),
        phase = ?game.phase(),
        "session over"
    );
    // A disconnect, protocol error or shutdown mid-game drops the score;
    // only a game that actually ended counts.
    if game.phase().is_terminal() {
        queue.produce(game.points()).await;
    }

    outcome
}

/// Send the current top-N scoreboard and wait for the one-byte reply.
async fn handshake(stream: &mut TcpStream, board: &Arc<RwLock<ScoreBoard>>) -> Result<()> {
    let entries = *board.read().await.entries();
    stream.write_all(&encode_scoreboard(&entries)).await?;
    stream.flush().await?;

    let mut ack = [0u8; 1];
    stream.read_exact(&mut ack).await?;
    Ok(())
}

/// The request/response loop: input, gravity, frame, repeat.
async fn drive(
    stream: &mut TcpStream,
    game: &mut Game,
    shutdown: &mut watch::Receiver<bool>,
) -> Result<()> {
    let granularity = Duration::from_millis(STEP_TIME_GRANULARITY_MS as u64);
    let mut last_step = Instant::now();
    let mut input_buf = [0u8; 1];

    // Initial frame so the client can draw before its first input.
    stream.write_all(&StateFrame::of_game(game).encode()).await?;

    loop {
        if *shutdown.borrow() {
            debug!("session winding down on shutdown");
            return Ok(());
        }

        let next_step = last_step + granularity;

        tokio::select! {
            read = stream.read(&mut input_buf) => match read {
                Ok(0) => {
                    debug!("peer disconnected");
                    return Ok(());
                }
                Ok(_) => {
                    let input = decode_input(input_buf[0])?;
                    game.handle_input(input);
                }
                Err(e) => return Err(Error::Io(e)),
            },
            _ = tokio::time::sleep_until(next_step) => {}
            _ = shutdown.changed() => {
                debug!("session winding down on shutdown");
                return Ok(());
            }
        }

        if last_step.elapsed() >= granularity {
            game.handle_substep();
            last_step = Instant::now();
        }

        stream.write_all(&StateFrame::of_game(game).encode()).await?;

        if game.phase().is_terminal() {
            return Ok(());
        }
    }
}
