//! Game engine - the per-session state machine.
//!
//! Pure, deterministic given its RNG seed: inputs and gravity substeps are
//! the only ways the state advances. Every update computes a candidate
//! placement first and validates it against the board; the board itself is
//! mutated only when a piece locks. Callers render from [`Game::canvas`],
//! never from the raw board, so a rejected placement can never be shown as
//! committed state.

use crate::types::{
    Phase, TetInput, FIELD_WIDTH, INIT_LINES_PER_LEVEL, MAX_LEVEL, STEP_TIME_GRANULARITY_MS,
    STEP_TIME_INIT_MS, STEP_TIME_MAX_MS, TIME_FACTOR_PER_LEVEL,
};

use super::board::{Board, Canvas};
use super::pieces::{get_shape, shape_width, PieceShape, Rotation};
use super::rng::SimpleRng;

/// The falling piece: a shape, a discrete rotation and a top-left anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tetromino {
    pub kind: crate::types::PieceKind,
    pub rotation: Rotation,
    pub x: i8,
    pub y: i8,
}

impl Tetromino {
    /// Occupied-cell offsets for the current rotation.
    pub fn shape(&self) -> PieceShape {
        get_shape(self.kind, self.rotation)
    }

    /// Same piece shifted by (dx, dy).
    pub fn offset(self, dx: i8, dy: i8) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..self
        }
    }

    /// All four cells in bounds and not occupied by locked cells.
    pub fn is_valid(&self, board: &Board) -> bool {
        self.shape()
            .iter()
            .all(|&(dx, dy)| board.is_vacant(self.x + dx, self.y + dy))
    }
}

/// Complete state of one game session.
#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    piece: Tetromino,
    phase: Phase,
    points: u32,
    level: u32,
    lines_to_go: u32,
    /// Remaining time until the next gravity step, counted down in
    /// granularity units by `handle_substep`.
    step_timer_ms: u32,
    /// Interval the timer reloads from; adjusted by pace inputs and level.
    step_interval_ms: u32,
    rng: SimpleRng,
}

impl Game {
    /// Create a new game with the given RNG seed.
    pub fn new(seed: u32) -> Self {
        Self::with_rng(SimpleRng::new(seed))
    }

    /// Create a new game seeded from the wall clock.
    pub fn from_entropy(salt: u32) -> Self {
        Self::with_rng(SimpleRng::from_entropy(salt))
    }

    fn with_rng(mut rng: SimpleRng) -> Self {
        let piece = Self::random_piece(&mut rng);
        Self {
            board: Board::new(),
            piece,
            phase: Phase::InProgress,
            points: 0,
            level: 1,
            lines_to_go: INIT_LINES_PER_LEVEL,
            step_timer_ms: STEP_TIME_INIT_MS,
            step_interval_ms: STEP_TIME_INIT_MS,
            rng,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn points(&self) -> u32 {
        self.points
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn lines_to_go(&self) -> u32 {
        self.lines_to_go
    }

    pub fn step_interval_ms(&self) -> u32 {
        self.step_interval_ms
    }

    pub fn piece(&self) -> Tetromino {
        self.piece
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    #[cfg(test)]
    pub(crate) fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    #[cfg(test)]
    pub(crate) fn set_piece(&mut self, piece: Tetromino) {
        self.piece = piece;
    }

    /// Render view: committed board with the falling piece overlaid.
    pub fn canvas(&self) -> Canvas {
        let mut canvas = Canvas::of_board(&self.board);
        canvas.overlay(&self.piece.shape(), self.piece.x, self.piece.y, self.piece.kind);
        canvas
    }

    /// Apply one client input.
    pub fn handle_input(&mut self, input: TetInput) {
        match self.phase {
            Phase::Stopped => {
                // Only the pause toggle and a restart are honored while paused.
                match input {
                    TetInput::Pause => self.phase = Phase::InProgress,
                    TetInput::Restart => self.restart(),
                    _ => {}
                }
                return;
            }
            Phase::Lose | Phase::Win => {
                if input == TetInput::Restart {
                    self.restart();
                }
                return;
            }
            Phase::InProgress => {}
        }

        match input {
            TetInput::Void => {}
            TetInput::Left => {
                self.try_candidate(self.piece.offset(-1, 0));
            }
            TetInput::Right => {
                self.try_candidate(self.piece.offset(1, 0));
            }
            TetInput::Down => self.step_down(),
            TetInput::DownInstant => {
                // Advance to the lowest valid row, then lock there.
                loop {
                    let next = self.piece.offset(0, 1);
                    if !next.is_valid(&self.board) {
                        break;
                    }
                    self.piece = next;
                }
                self.lock_and_respawn();
            }
            TetInput::RotateCw => {
                let mut candidate = self.piece;
                candidate.rotation = candidate.rotation.rotate_cw();
                self.try_candidate(candidate);
            }
            TetInput::RotateCcw => {
                let mut candidate = self.piece;
                candidate.rotation = candidate.rotation.rotate_ccw();
                self.try_candidate(candidate);
            }
            TetInput::Cheat => {
                // New shape, same anchor and rotation, no lock.
                let mut candidate = self.piece;
                candidate.kind = self.rng.next_piece();
                self.try_candidate(candidate);
            }
            TetInput::Pause => self.phase = Phase::Stopped,
            TetInput::Restart => self.restart(),
            TetInput::Faster => self.change_step_time(0.5),
            TetInput::Slower => self.change_step_time(2.0),
        }
    }

    /// Advance the gravity countdown by one granularity tick.
    ///
    /// Called roughly every `STEP_TIME_GRANULARITY_MS` of wall-clock time;
    /// the piece falls one row whenever the countdown runs out.
    pub fn handle_substep(&mut self) {
        if self.phase != Phase::InProgress {
            return;
        }
        if self.step_timer_ms > STEP_TIME_GRANULARITY_MS {
            self.step_timer_ms -= STEP_TIME_GRANULARITY_MS;
            return;
        }
        self.step_timer_ms = self.step_interval_ms;
        self.step_down();
    }

    /// Reinitialize to a fresh session; the RNG sequence keeps rolling.
    pub fn restart(&mut self) {
        self.board.clear();
        self.points = 0;
        self.level = 1;
        self.lines_to_go = INIT_LINES_PER_LEVEL;
        self.step_timer_ms = STEP_TIME_INIT_MS;
        self.step_interval_ms = STEP_TIME_INIT_MS;
        self.phase = Phase::InProgress;
        // A fresh board cannot reject a spawn.
        self.piece = Self::random_piece(&mut self.rng);
    }

    /// Move to the candidate placement if it validates; reject silently
    /// without touching board or piece otherwise.
    fn try_candidate(&mut self, candidate: Tetromino) -> bool {
        if candidate.is_valid(&self.board) {
            self.piece = candidate;
            true
        } else {
            false
        }
    }

    /// One row of gravity; a rejected drop locks the piece in place.
    fn step_down(&mut self) {
        if !self.try_candidate(self.piece.offset(0, 1)) {
            self.lock_and_respawn();
        }
    }

    fn lock_and_respawn(&mut self) {
        self.board
            .lock(&self.piece.shape(), self.piece.x, self.piece.y, self.piece.kind);
        self.score_cleared_rows();
        if self.phase != Phase::InProgress {
            return;
        }
        self.piece = Self::random_piece(&mut self.rng);
        if !self.piece.is_valid(&self.board) {
            self.phase = Phase::Lose;
        }
    }

    /// Clear full rows, award points and handle leveling.
    ///
    /// With `k` rows cleared and `m` = 1 + the number of immediately
    /// adjacent cleared pairs, the award is `(2^(m-1) + k) * level`.
    fn score_cleared_rows(&mut self) {
        let cleared = self.board.clear_full_rows();
        let k = cleared.len() as u32;
        if k == 0 {
            return;
        }

        let mut adjacent_pairs = 0u32;
        for pair in cleared.windows(2) {
            // Indices arrive bottom-to-top (descending).
            if pair[0] - 1 == pair[1] {
                adjacent_pairs += 1;
            }
        }
        let m = adjacent_pairs + 1;
        self.points += ((1u32 << (m - 1)) + k) * self.level;

        if self.lines_to_go <= k {
            if self.level >= MAX_LEVEL {
                self.phase = Phase::Win;
                return;
            }
            self.level += 1;
            self.lines_to_go = self.level * INIT_LINES_PER_LEVEL;
            self.step_interval_ms =
                (self.step_interval_ms as f32 * TIME_FACTOR_PER_LEVEL) as u32;
        } else {
            self.lines_to_go -= k;
        }
    }

    /// Pace adjustment, clamped to [granularity, 2000] ms.
    fn change_step_time(&mut self, factor: f32) {
        let scaled = (self.step_interval_ms as f32 * factor) as u32;
        self.step_interval_ms = scaled.clamp(STEP_TIME_GRANULARITY_MS, STEP_TIME_MAX_MS);
    }

    fn random_piece(rng: &mut SimpleRng) -> Tetromino {
        let kind = rng.next_piece();
        let width = shape_width(kind, Rotation::North);
        let x = rng.next_range((FIELD_WIDTH - width) as u32) as i8;
        Tetromino {
            kind,
            rotation: Rotation::North,
            x,
            y: 0,
        }
    }
}
