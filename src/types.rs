//! Core types shared across the crate
//! This module contains pure data types with no external dependencies

/// Field dimensions
pub const FIELD_WIDTH: u8 = 10;
pub const FIELD_HEIGHT: u8 = 18;
pub const FIELD_SIZE: usize = (FIELD_WIDTH as usize) * (FIELD_HEIGHT as usize);

/// Maximum number of concurrent game sessions
pub const CLIENTS_MAX: usize = 5;

/// Difficulty and scoring constants
pub const MAX_LEVEL: u32 = 5;
pub const INIT_LINES_PER_LEVEL: u32 = 1;
pub const TIME_FACTOR_PER_LEVEL: f32 = 0.7;

/// Gravity timing (milliseconds)
pub const STEP_TIME_GRANULARITY_MS: u32 = 100;
pub const STEP_TIME_INIT_MS: u32 = 1000;
pub const STEP_TIME_MAX_MS: u32 = 2000;

/// High-score table size and submission queue depth
pub const SCOREBOARD_SIZE: usize = 10;
pub const SCORE_QUEUE_DEPTH: usize = 50;

/// Client inputs, one byte each on the wire.
///
/// Discriminants are the wire encoding; any other byte is a protocol error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum TetInput {
    /// Ignored; keeps the session loop turning without a real input.
    Void = 0,
    Left = 1,
    Right = 2,
    Down = 3,
    DownInstant = 4,
    RotateCw = 5,
    RotateCcw = 6,
    /// Swap the falling piece for another random shape in place.
    Cheat = 7,
    Pause = 8,
    Restart = 9,
    Faster = 10,
    Slower = 11,
}

impl TetInput {
    pub fn to_byte(self) -> u8 {
        self as u8
    }

    /// Decode a wire byte. `None` for out-of-range values.
    pub fn from_byte(b: u8) -> Option<Self> {
        match b {
            0 => Some(TetInput::Void),
            1 => Some(TetInput::Left),
            2 => Some(TetInput::Right),
            3 => Some(TetInput::Down),
            4 => Some(TetInput::DownInstant),
            5 => Some(TetInput::RotateCw),
            6 => Some(TetInput::RotateCcw),
            7 => Some(TetInput::Cheat),
            8 => Some(TetInput::Pause),
            9 => Some(TetInput::Restart),
            10 => Some(TetInput::Faster),
            11 => Some(TetInput::Slower),
            _ => None,
        }
    }
}

/// Overall session status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Lose,
    Win,
    Stopped,
    InProgress,
}

impl Phase {
    /// `true` once the session can never return to play without a restart.
    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Lose | Phase::Win)
    }

    /// Wire byte. LOSE is the original protocol's `-1` truncated to a byte.
    pub fn to_byte(self) -> u8 {
        match self {
            Phase::Lose => 0xff,
            Phase::Win => 0x00,
            Phase::Stopped => 0x01,
            Phase::InProgress => 0x02,
        }
    }

    pub fn from_byte(b: u8) -> Option<Self> {
        match b {
            0xff => Some(Phase::Lose),
            0x00 => Some(Phase::Win),
            0x01 => Some(Phase::Stopped),
            0x02 => Some(Phase::InProgress),
            _ => None,
        }
    }
}

/// Tetromino piece kinds, in the original shape-table order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Z,
    L,
    T,
    O,
    J,
    S,
    I,
}

impl PieceKind {
    pub const ALL: [PieceKind; 7] = [
        PieceKind::Z,
        PieceKind::L,
        PieceKind::T,
        PieceKind::O,
        PieceKind::J,
        PieceKind::S,
        PieceKind::I,
    ];

    /// Cell byte used for this piece on the wire and in the client display.
    pub fn glyph(self) -> u8 {
        match self {
            PieceKind::Z => b'Z',
            PieceKind::L => b'L',
            PieceKind::T => b'T',
            PieceKind::O => b'O',
            PieceKind::J => b'J',
            PieceKind::S => b'S',
            PieceKind::I => b'I',
        }
    }
}

/// Cell on the field (None = empty, Some = locked piece)
pub type Cell = Option<PieceKind>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_byte_round_trip() {
        for b in 0u8..=11 {
            let input = TetInput::from_byte(b).expect("in-range byte");
            assert_eq!(input.to_byte(), b);
        }
        assert_eq!(TetInput::from_byte(12), None);
        assert_eq!(TetInput::from_byte(0xff), None);
    }

    #[test]
    fn test_phase_byte_round_trip() {
        for phase in [Phase::Lose, Phase::Win, Phase::Stopped, Phase::InProgress] {
            assert_eq!(Phase::from_byte(phase.to_byte()), Some(phase));
        }
        assert_eq!(Phase::from_byte(0x03), None);
    }
}
