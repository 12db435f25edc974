//! Wire codec - fixed-size binary frames, transport-agnostic.
//!
//! Client to server: a single input byte. Server to client: a 196-byte
//! state frame, and once per connection a scoreboard handshake frame.
//! All multi-byte fields are little-endian; one canonical encode/decode
//! pair is used symmetrically by both sides.
//!
//! State frame layout:
//!
//! ```text
//! offset  size  field
//! 0       1     phase
//! 1       3     reserved (zero)
//! 4       4     points       (u32 LE)
//! 8       4     level        (u32 LE)
//! 12      4     lines-to-go  (u32 LE)
//! 16      180   cells, row-major, space = empty, else the piece glyph
//! ```

use crate::core::{Canvas, Game};
use crate::error::{Error, Result};
use crate::types::{Phase, TetInput, FIELD_SIZE, SCOREBOARD_SIZE};

/// Bytes before the cell grid in a state frame.
pub const FRAME_HEADER_LEN: usize = 16;

/// Total length of a server-to-client state frame.
pub const STATE_FRAME_LEN: usize = FRAME_HEADER_LEN + FIELD_SIZE;

/// Length of the scoreboard handshake frame.
pub const SCOREBOARD_FRAME_LEN: usize = SCOREBOARD_SIZE * 4;

/// Decode a client input byte; out-of-range values are a protocol error.
pub fn decode_input(byte: u8) -> Result<TetInput> {
    TetInput::from_byte(byte)
        .ok_or_else(|| Error::Protocol(format!("input byte {byte:#04x} out of range")))
}

/// One server-to-client game state frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateFrame {
    pub phase: Phase,
    pub points: u32,
    pub level: u32,
    pub lines_to_go: u32,
    pub canvas: Canvas,
}

impl StateFrame {
    /// Snapshot a frame from the engine.
    pub fn of_game(game: &Game) -> Self {
        Self {
            phase: game.phase(),
            points: game.points(),
            level: game.level(),
            lines_to_go: game.lines_to_go(),
            canvas: game.canvas(),
        }
    }

    pub fn encode(&self) -> [u8; STATE_FRAME_LEN] {
        let mut buf = [0u8; STATE_FRAME_LEN];
        buf[0] = self.phase.to_byte();
        // buf[1..4] reserved, already zero
        buf[4..8].copy_from_slice(&self.points.to_le_bytes());
        buf[8..12].copy_from_slice(&self.level.to_le_bytes());
        buf[12..16].copy_from_slice(&self.lines_to_go.to_le_bytes());
        buf[FRAME_HEADER_LEN..].copy_from_slice(self.canvas.cells());
        buf
    }

    pub fn decode(buf: &[u8]) -> Result<Self> {
        if buf.len() != STATE_FRAME_LEN {
            return Err(Error::Protocol(format!(
                "state frame is {} bytes, expected {STATE_FRAME_LEN}",
                buf.len()
            )));
        }
        let phase = Phase::from_byte(buf[0])
            .ok_or_else(|| Error::Protocol(format!("phase byte {:#04x} out of range", buf[0])))?;

        let word = |at: usize| {
            let mut b = [0u8; 4];
            b.copy_from_slice(&buf[at..at + 4]);
            u32::from_le_bytes(b)
        };

        let mut cells = [0u8; FIELD_SIZE];
        cells.copy_from_slice(&buf[FRAME_HEADER_LEN..]);

        Ok(Self {
            phase,
            points: word(4),
            level: word(8),
            lines_to_go: word(12),
            canvas: Canvas::from(cells),
        })
    }
}

/// Encode the handshake scoreboard: top-N scores as u32 LE, best first.
pub fn encode_scoreboard(scores: &[u32; SCOREBOARD_SIZE]) -> [u8; SCOREBOARD_FRAME_LEN] {
    let mut buf = [0u8; SCOREBOARD_FRAME_LEN];
    for (slot, score) in buf.chunks_exact_mut(4).zip(scores.iter()) {
        slot.copy_from_slice(&score.to_le_bytes());
    }
    buf
}

pub fn decode_scoreboard(buf: &[u8]) -> Result<[u32; SCOREBOARD_SIZE]> {
    if buf.len() != SCOREBOARD_FRAME_LEN {
        return Err(Error::Protocol(format!(
            "scoreboard frame is {} bytes, expected {SCOREBOARD_FRAME_LEN}",
            buf.len()
        )));
    }
    let mut scores = [0u32; SCOREBOARD_SIZE];
    for (score, chunk) in scores.iter_mut().zip(buf.chunks_exact(4)) {
        let mut b = [0u8; 4];
        b.copy_from_slice(chunk);
        *score = u32::from_le_bytes(b);
    }
    Ok(scores)
}
