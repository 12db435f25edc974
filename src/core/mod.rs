//! Core game engine: board, pieces, RNG and the session state machine.

pub mod board;
pub mod game;
pub mod pieces;
pub mod rng;

pub use board::{Board, Canvas};
pub use game::{Game, Tetromino};
pub use pieces::{get_shape, shape_width, PieceShape, Rotation};
pub use rng::SimpleRng;
